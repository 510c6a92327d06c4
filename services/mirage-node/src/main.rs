use anyhow::{anyhow, bail, Context};
use mirage_core::{logging, LogFormat, MirageConfig};
use mirage_policy::{destination_host, Payload};
use mirage_session::Session;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;

const NODE_PROTOCOL_VERSION: u32 = 1;

const USAGE: &str = "usage: mirage-node [--config <path>] [--json-logs] <command>

commands:
  status                          session status
  profile                         full identity profile
  stats                           interception counters and profile field counts
  reset                           re-seed the identity and print the new summary
  query <surface> [args-json]     answer one surface query
  classify <destination> [body]   policy decision for a request
  hardware                        bound hardware template and aggregate report";

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    protocol_version: u32,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Status,
    Profile,
    Stats,
    Reset,
    Query { surface: String, args: Value },
    Classify { destination: String, payload: Payload },
    Hardware,
}

#[derive(Debug, Clone, PartialEq)]
struct Cli {
    config: Option<PathBuf>,
    json_logs: bool,
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--version-json") {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            protocol_version: NODE_PROTOCOL_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    if args.is_empty() || args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let cli = parse_args(&args)?;
    let config = load_config(&cli)?;
    logging::init_from(&config.logging);

    let mut session = Session::start(config);
    let output = run(&mut session, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    session.shutdown();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<MirageConfig> {
    let config = match &cli.config {
        Some(path) => MirageConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => MirageConfig::default(),
    };

    let mut config = config.with_env_overrides();
    if cli.json_logs {
        config.logging.format = LogFormat::Json;
    }
    config.validate()?;
    Ok(config)
}

fn run(session: &mut Session, command: Command) -> anyhow::Result<Value> {
    let value = match command {
        Command::Status => serde_json::to_value(session.get_status())?,
        Command::Profile => serde_json::to_value(&*session.get_profile())?,
        Command::Stats => serde_json::to_value(session.get_stats())?,
        Command::Reset => {
            session.reset_identity();
            info!("Identity reset from command line");
            serde_json::to_value(session.get_status().profile)?
        }
        Command::Query { surface, args } => session.query(&surface, &args)?,
        Command::Classify {
            destination,
            payload,
        } => {
            let classification = session.rewriter().engine().explain(&destination, &payload);
            json!({
                "destination": destination,
                "host": destination_host(&destination),
                "decision": classification.decision,
                "tier": classification.tier,
            })
        }
        Command::Hardware => json!({
            "template": session.hardware().template_name(),
            "data": session.surface().all_data(),
        }),
    };
    Ok(value)
}

fn parse_args(args: &[String]) -> anyhow::Result<Cli> {
    let mut config = None;
    let mut json_logs = false;
    let mut positional: Vec<&str> = Vec::new();

    let mut args_iter = args.iter();
    while let Some(arg) = args_iter.next() {
        match arg.as_str() {
            "--config" => match args_iter.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("--config was provided without a path"),
            },
            "--json-logs" => json_logs = true,
            flag if flag.starts_with("--") => bail!("unknown flag {}", flag),
            other => positional.push(other),
        }
    }

    let (name, rest) = positional
        .split_first()
        .ok_or_else(|| anyhow!("missing command\n\n{}", USAGE))?;

    let command = match (*name, rest) {
        ("status", []) => Command::Status,
        ("profile", []) => Command::Profile,
        ("stats", []) => Command::Stats,
        ("reset", []) => Command::Reset,
        ("hardware", []) => Command::Hardware,
        ("query", [surface]) => Command::Query {
            surface: surface.to_string(),
            args: Value::Null,
        },
        ("query", [surface, raw]) => Command::Query {
            surface: surface.to_string(),
            args: serde_json::from_str(raw).context("query arguments must be JSON")?,
        },
        ("classify", [destination]) => Command::Classify {
            destination: destination.to_string(),
            payload: Payload::Empty,
        },
        ("classify", [destination, body]) => Command::Classify {
            destination: destination.to_string(),
            payload: parse_body(body),
        },
        (other, _) => bail!("unrecognized command `{}`\n\n{}", other, USAGE),
    };

    Ok(Cli {
        config,
        json_logs,
        command,
    })
}

/// JSON bodies are classified as structured payloads, anything else as text.
fn parse_body(body: &str) -> Payload {
    serde_json::from_str::<Value>(body)
        .map(Payload::Json)
        .unwrap_or_else(|_| Payload::Text(body.to_string()))
}
