//! B-Roll plan CLI
//!
//! Command-line front end for the engine driver: accepts an a-roll video
//! and a set of candidate b-roll clips, drives the analysis engine, and
//! prints the resulting insertion plan as JSON.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use broll_engine::{generate_plan, EngineConfig, PlanRequest};

#[derive(Parser)]
#[command(
    name = "broll-plan",
    version,
    about = "Generate a b-roll insertion plan for an a-roll video",
    long_about = "Drives the Python analysis engine against an a-roll video and a set of\n\
                  candidate b-roll clips, and prints the resulting insertion plan as JSON.\n\n\
                  Inputs are treated as transient uploads: every supplied file is DELETED\n\
                  once the invocation concludes, whatever the outcome.",
    after_help = "EXAMPLES:\n  \
                  # Plan b-roll insertions for a talking-head video\n  \
                  broll-plan --a-roll talk.mp4 --b-rolls coffee.mp4 street.mp4\n\n  \
                  # Use a specific interpreter and also render the composite\n  \
                  broll-plan --python /opt/venv/bin/python3 --a-roll talk.mp4 \\\n      \
                  --b-rolls coffee.mp4 --render-to final.mp4"
)]
struct Cli {
    /// Primary (a-roll) video file
    #[arg(long = "a-roll")]
    a_roll: PathBuf,

    /// Candidate (b-roll) clips, in priority order
    #[arg(long = "b-rolls", num_args = 1.., required = true)]
    b_rolls: Vec<PathBuf>,

    /// Explicit Python interpreter (overrides PYTHON_PATH and venv search)
    #[arg(long)]
    python: Option<String>,

    /// Engine script path
    #[arg(long)]
    script: Option<PathBuf>,

    /// Deadline for the engine run in seconds (0 disables)
    #[arg(long, default_value_t = 600)]
    timeout_secs: u64,

    /// Also render the composited video to this path
    #[arg(long)]
    render_to: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = EngineConfig::default();
    if let Some(script) = cli.script {
        config.script = script;
    }
    config.python = cli.python;
    config.timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));

    let mut request = PlanRequest::new(cli.a_roll, cli.b_rolls);
    request.render_to = cli.render_to;

    let plan = generate_plan(&request, &config).await?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
