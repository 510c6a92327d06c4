//! One identity, many surfaces: every path must report the same values.

use crate::test_utils::{RecordingTransport, TestEnv};
use mirage_policy::{OutboundRequest, Payload};
use mirage_session::Session;
use serde_json::{json, Value};

fn rewritten_hostname(session: &mut Session) -> String {
    let mut transport = RecordingTransport::default();
    let request = OutboundRequest::new("https://example.com/api/device/register", "POST")
        .with_payload(json!({"hostname": "dev-box-01"}));
    session.dispatch(request, &mut transport).unwrap();

    match &transport.sent[0].payload {
        Payload::Json(value) => value["hostname"].as_str().unwrap().to_string(),
        other => panic!("unexpected payload {:?}", other),
    }
}

#[test]
fn test_hostname_matches_across_query_and_rewrite() {
    let env = TestEnv::new();
    let mut session = env.session();

    let queried = session.query("hostname", &Value::Null).unwrap();
    let os_info = session.query("osInfo", &Value::Null).unwrap();
    let rewritten = rewritten_hostname(&mut session);

    assert_eq!(queried, json!(rewritten));
    assert_eq!(os_info["hostname"], json!(rewritten));
    assert_eq!(rewritten, session.get_profile().system.hostname);
}

#[test]
fn test_consistency_holds_after_reset() {
    let env = TestEnv::new();
    let mut session = env.session();
    let old_hostname = rewritten_hostname(&mut session);

    session.reset_identity();

    let queried = session.query("hostname", &Value::Null).unwrap();
    let rewritten = rewritten_hostname(&mut session);
    assert_ne!(rewritten, old_hostname);
    assert_eq!(queried, json!(rewritten));

    let system = session.query("system", &Value::Null).unwrap();
    assert_eq!(system["uuid"], json!(session.get_profile().identifiers.machine_id));
}

#[test]
fn test_username_matches_across_user_info_and_rewrite() {
    let env = TestEnv::new();
    let mut session = env.session();
    let mut transport = RecordingTransport::default();

    let request = OutboundRequest::new("https://example.com/api/user", "POST")
        .with_payload("login=jordan");
    session.dispatch(request, &mut transport).unwrap();

    let info = session.query("userInfo", &Value::Null).unwrap();
    let username = info["username"].as_str().unwrap();
    assert_eq!(transport.sent[0].payload, Payload::Text(format!("login={}", username)));
    assert_eq!(info["homedir"], json!(format!("/home/{}", username)));
}

#[test]
fn test_serials_agree_between_surfaces() {
    let env = TestEnv::new();
    let session = env.session();
    let profile = session.get_profile();

    let bios = session.query("bios", &Value::Null).unwrap();
    let all = session.query("getAllData", &Value::Null).unwrap();
    let disks = session.query("diskLayout", &Value::Null).unwrap();
    let uuid = session.query("uuid", &Value::Null).unwrap();

    assert_eq!(bios["serial"], json!(profile.hardware.bios_info.serial));
    assert_eq!(all["bios"]["serial"], bios["serial"]);
    assert_eq!(all["uuid"]["hardware"], uuid["hardware"]);
    assert_eq!(disks[0]["serialNum"], json!(profile.hardware.disk_serials[0]));
    assert_eq!(uuid["macs"], json!(profile.hardware.mac_addresses));
}

#[test]
fn test_inode_surface_uses_profile_values() {
    let env = TestEnv::new();
    let session = env.session();
    let profile = session.get_profile();

    let stat = session
        .query("stat", &json!({"path": "/home/jordan/project", "ino": 1}))
        .unwrap();
    assert_eq!(stat["ino"], json!(profile.filesystem.home_directory_ino));
}
