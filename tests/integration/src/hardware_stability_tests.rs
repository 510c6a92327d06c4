//! Template selection stays fixed for a profile while sensor readings move.

use crate::test_utils::TestEnv;
use proptest::prelude::*;
use serde_json::Value;
use std::collections::HashSet;

#[test]
fn test_template_stable_across_calls_and_restarts() {
    let env = TestEnv::new();
    let session = env.session();
    let template = session.hardware().template_name().to_string();

    let mut used = HashSet::new();
    for _ in 0..25 {
        let mem = session.query("mem", &Value::Null).unwrap();
        used.insert(mem["used"].as_u64().unwrap());
        let cpu = session.query("cpu", &Value::Null).unwrap();
        assert_eq!(cpu["brand"], Value::String(session.hardware().template().cpu.brand.clone()));
    }
    assert!(used.len() > 1);

    drop(session);
    assert_eq!(env.session().hardware().template_name(), template);
}

#[test]
fn test_status_reports_bound_template() {
    let env = TestEnv::new();
    let session = env.session();
    let status = session.get_status();
    assert_eq!(status.profile.hardware_template, session.hardware().template_name());
    assert_eq!(status.components.catalog_templates, 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn jittered_surfaces_keep_static_fields(_round in 0u8..4) {
        let env = TestEnv::new();
        let session = env.session();
        let first = session.query("diskLayout", &Value::Null).unwrap();
        let second = session.query("diskLayout", &Value::Null).unwrap();
        prop_assert_eq!(&first[0]["serialNum"], &second[0]["serialNum"]);
        prop_assert_eq!(&first[0]["name"], &second[0]["name"]);
        let temp = second[0]["temperature"].as_u64().unwrap();
        prop_assert!((35..55).contains(&temp));
    }
}
