use crust::error::CrustError;
use crust::plan::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_command_stdout_is_the_plan() {
    let plan = run_plan_command("echo 'Plan: 1 to add, 0 to change, 0 to destroy.'")
        .await
        .unwrap();
    assert_eq!(plan, "Plan: 1 to add, 0 to change, 0 to destroy.\n");
}

#[tokio::test]
async fn test_command_runs_through_shell() {
    let plan = run_plan_command("printf 'a\\n' && printf 'b'").await.unwrap();
    assert_eq!(plan, "a\nb");
}

#[tokio::test]
async fn test_failing_command_reports_status_and_stderr() {
    let result = run_plan_command("echo 'no credentials' >&2; exit 3").await;

    match result {
        Err(CrustError::PlanExecution { command, reason }) => {
            assert!(command.contains("exit 3"));
            assert!(reason.contains('3'));
            assert!(reason.contains("no credentials"));
        }
        other => panic!("expected PlanExecution, got {:?}", other),
    }
}

#[tokio::test]
async fn test_file_source() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plan.txt");
    tokio::fs::write(&path, "~ resource \"aws_instance\" \"web\"").await.unwrap();

    let source = PlanSource::File(path.clone());
    assert_eq!(source.read().await.unwrap(), "~ resource \"aws_instance\" \"web\"");
    assert_eq!(source.describe(), path.display().to_string());
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let source = PlanSource::File(dir.path().join("missing.txt"));

    assert!(matches!(source.read().await, Err(CrustError::Io(_))));
}

#[test]
fn test_describe() {
    assert_eq!(PlanSource::File("-".into()).describe(), "standard input");
    assert_eq!(PlanSource::Command("terraform plan".to_string()).describe(), "terraform plan");
}
