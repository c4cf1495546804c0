//! Integration tests for the engine driver
//!
//! The Python engine is stood in for by small shell scripts run through
//! `sh`, so every terminal condition (clean exit, nonzero exit, spawn
//! failure, missing payload, hang) can be exercised without Python or any
//! real media files.
#![cfg(unix)]

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use broll_engine::{cleanup, generate_plan, EngineConfig, EngineError, PlanRequest};
use tempfile::TempDir;

fn write_script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("fake_engine.sh");
    fs::write(&path, body).unwrap();
    path
}

fn make_uploads(dir: &TempDir) -> PlanRequest {
    let a_roll = dir.path().join("a.mp4");
    fs::write(&a_roll, b"a-roll bytes").unwrap();
    let b1 = dir.path().join("b1.mp4");
    fs::write(&b1, b"b-roll bytes").unwrap();
    let b2 = dir.path().join("b2.mp4");
    fs::write(&b2, b"b-roll bytes").unwrap();
    PlanRequest::new(a_roll, vec![b1, b2])
}

fn sh_config(script: PathBuf) -> EngineConfig {
    EngineConfig {
        script,
        python: Some("sh".to_string()),
        timeout: Some(Duration::from_secs(10)),
    }
}

fn assert_uploads_deleted(request: &PlanRequest) {
    assert!(!request.a_roll.exists(), "a-roll should be deleted");
    for b_roll in &request.b_rolls {
        assert!(!b_roll.exists(), "b-roll should be deleted");
    }
}

#[tokio::test]
async fn end_to_end_plan_with_interleaved_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        &dir,
        r#"echo "[Engine] Processing A-Roll: a.mp4"
echo "JSON_PLAN_START"
echo '{"insertions":[{"start_sec":1.0,"duration_sec":2.5,"broll_id":"broll_0","reason":"match","confidence":0.9}]}'
echo "JSON_PLAN_END"
"#,
    );
    let request = make_uploads(&dir);

    let plan = generate_plan(&request, &sh_config(script)).await.unwrap();

    assert_eq!(plan.insertions.len(), 1);
    let insertion = &plan.insertions[0];
    assert_eq!(insertion.start_sec, Some(1.0));
    assert_eq!(insertion.broll_id.as_deref(), Some("broll_0"));
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn empty_plan_is_valid() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        &dir,
        "echo \"JSON_PLAN_START\"\necho '{\"insertions\":[]}'\necho \"JSON_PLAN_END\"\n",
    );
    let request = make_uploads(&dir);

    let plan = generate_plan(&request, &sh_config(script)).await.unwrap();

    assert!(plan.is_empty());
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn nonzero_exit_carries_stderr_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "echo boom >&2\nexit 1\n");
    let request = make_uploads(&dir);

    let err = generate_plan(&request, &sh_config(script))
        .await
        .unwrap_err();

    match err {
        EngineError::EngineFailed { code, stderr } => {
            assert_eq!(code, 1);
            assert!(stderr.contains("boom"), "stderr was: {stderr:?}");
        }
        other => panic!("expected EngineFailed, got {other:?}"),
    }
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn spawn_failure_still_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "exit 0\n");
    let request = make_uploads(&dir);
    let config = EngineConfig {
        python: Some("/nonexistent/broll-python".to_string()),
        ..sh_config(script)
    };

    let err = generate_plan(&request, &config).await.unwrap_err();

    assert!(matches!(err, EngineError::Spawn(_)), "got {err:?}");
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn clean_exit_without_markers_is_distinct_failure() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "echo \"diagnostics only, no payload\"\n");
    let request = make_uploads(&dir);

    let err = generate_plan(&request, &sh_config(script))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::MarkersNotFound), "got {err:?}");
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn malformed_payload_is_parse_failure() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        &dir,
        "echo \"JSON_PLAN_START\"\necho notjson\necho \"JSON_PLAN_END\"\n",
    );
    let request = make_uploads(&dir);

    let err = generate_plan(&request, &sh_config(script))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::PlanParse(_)), "got {err:?}");
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn hung_engine_times_out_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(&dir, "echo started\nsleep 30\n");
    let request = make_uploads(&dir);
    let config = EngineConfig {
        timeout: Some(Duration::from_secs(1)),
        ..sh_config(script)
    };

    let err = generate_plan(&request, &config).await.unwrap_err();

    assert!(matches!(err, EngineError::Timeout(1)), "got {err:?}");
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn full_stdout_reaches_extractor_at_exit() {
    // Payload written in many separate writes right before exit must still
    // be assembled in full.
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        &dir,
        r#"i=0
while [ $i -lt 50 ]; do
  echo "log line $i"
  i=$((i + 1))
done
printf 'JSON_PLAN_START'
printf '{"insertions":['
printf '{"start_sec":1.0},'
printf '{"start_sec":2.0}'
printf ']}'
printf 'JSON_PLAN_END\n'
"#,
    );
    let request = make_uploads(&dir);

    let plan = generate_plan(&request, &sh_config(script)).await.unwrap();

    assert_eq!(plan.insertions.len(), 2);
    assert_uploads_deleted(&request);
}

#[tokio::test]
async fn cleanup_twice_never_raises() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.mp4");
    fs::write(&path, b"x").unwrap();

    let paths = vec![path.clone()];
    cleanup::remove_uploads(&paths).await;
    cleanup::remove_uploads(&paths).await;
    assert!(!path.exists());
}
