//! B-Roll plan engine driver
//!
//! Drives the external Python analysis engine: resolves an interpreter,
//! launches the engine with the uploaded a-roll and b-roll paths, collects
//! its interleaved output, extracts the embedded JSON plan, and removes
//! the uploads whatever the outcome.
//!
//! Each invocation is fully independent: it owns its child process, its
//! output accumulators, and its set of transient files, so concurrent
//! invocations need no coordination.

pub mod cleanup;
pub mod extract;
pub mod process;
pub mod resolver;

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

pub use broll_common::{EngineError, Insertion, Plan, Result};
pub use process::ProcessOutcome;

/// Environment variable naming an explicit interpreter, bypassing the
/// platform search order
pub const PYTHON_PATH_ENV: &str = "PYTHON_PATH";

/// Default location of the engine script
const DEFAULT_ENGINE_SCRIPT: &str = "src/python/broll_engine.py";

/// Default deadline for one engine run
const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// One end-to-end analysis request.
///
/// The caller owns the referenced files for the duration of the call; the
/// driver deletes all of them as a terminal side effect, regardless of
/// outcome.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Primary (a-roll) video
    pub a_roll: PathBuf,
    /// Candidate (b-roll) clips, in upload order
    pub b_rolls: Vec<PathBuf>,
    /// When set, the engine also composites the final video to this path
    pub render_to: Option<PathBuf>,
}

impl PlanRequest {
    /// Request analysis of `a_roll` against `b_rolls` without rendering
    #[must_use]
    pub fn new(a_roll: PathBuf, b_rolls: Vec<PathBuf>) -> Self {
        Self {
            a_roll,
            b_rolls,
            render_to: None,
        }
    }

    /// All transient inputs subject to cleanup
    fn upload_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(self.b_rolls.len() + 1);
        paths.push(self.a_roll.clone());
        paths.extend(self.b_rolls.iter().cloned());
        paths
    }
}

/// Engine driver configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the engine script
    pub script: PathBuf,
    /// Explicit interpreter override; takes precedence over `PYTHON_PATH`
    pub python: Option<String>,
    /// Deadline for one engine run; `None` disables the deadline
    pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from(DEFAULT_ENGINE_SCRIPT),
            python: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

/// Run one analysis: resolve the interpreter, drive the engine to
/// completion, extract the plan from its stdout, and delete the uploads.
///
/// Cleanup runs exactly once on every exit path, including spawn failures
/// and timeouts; its own failures are logged and never surface here.
pub async fn generate_plan(request: &PlanRequest, config: &EngineConfig) -> Result<Plan> {
    let result = run_engine(request, config).await;
    cleanup::remove_uploads(&request.upload_paths()).await;
    result
}

async fn run_engine(request: &PlanRequest, config: &EngineConfig) -> Result<Plan> {
    let override_path = config
        .python
        .clone()
        .or_else(|| env::var(PYTHON_PATH_ENV).ok());
    let python = resolver::resolve(override_path.as_deref());

    let args = build_args(request, &config.script);

    info!("Spawning engine process: {}", python);
    info!("Engine script path: {}", config.script.display());
    info!("Args: {:?}", args);

    let outcome = process::launch(&python, args, config.timeout).await?;

    if !outcome.success() {
        let code = outcome.exit_code.unwrap_or(-1);
        error!("Engine process exited with code {}", code);
        return Err(EngineError::EngineFailed {
            code,
            stderr: outcome.stderr,
        });
    }

    match extract::extract_plan(&outcome.stdout) {
        Ok(plan) => {
            info!("Generated plan with {} insertions.", plan.insertions.len());
            Ok(plan)
        }
        Err(e) => {
            error!("Plan extraction failed: {}", e);
            Err(e)
        }
    }
}

/// Engine argument protocol:
/// `<script> --a_roll <aRoll> --b_rolls <b1> <b2> ...`, with the render
/// pass-through appended when requested.
fn build_args(request: &PlanRequest, script: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        script.as_os_str().to_os_string(),
        OsString::from("--a_roll"),
        request.a_roll.as_os_str().to_os_string(),
        OsString::from("--b_rolls"),
    ];
    args.extend(request.b_rolls.iter().map(|p| p.as_os_str().to_os_string()));
    if let Some(output) = &request.render_to {
        args.push(OsString::from("--output"));
        args.push(output.as_os_str().to_os_string());
        args.push(OsString::from("--render"));
    }
    args
}
