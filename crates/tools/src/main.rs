use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use interaction::DragConfig;
use tools::{Scenario, replay};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a drag gesture over a scripted globe scene")]
struct Args {
    /// Scenario JSON: globe, camera, optional terrain tile, placemark, events
    scenario: PathBuf,

    /// Drag tuning JSON; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), String> {
    let scenario = Scenario::from_json_str(&read(&args.scenario)?)
        .map_err(|e| format!("{:?}: {e}", args.scenario))?;
    let config = match &args.config {
        Some(path) => {
            DragConfig::from_json_str(&read(path)?).map_err(|e| format!("{path:?}: {e}"))?
        }
        None => DragConfig::default(),
    };

    let steps = replay(&scenario, config).map_err(|e| e.to_string())?;

    let mut out = io::stdout().lock();
    for step in &steps {
        let line = serde_json::to_string(step).map_err(|e| format!("json: {e}"))?;
        writeln!(out, "{line}").map_err(|e| format!("write stdout: {e}"))?;
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))
}
