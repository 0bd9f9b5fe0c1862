use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::process::Child;

use pygate::executor::{ConfirmationGate, Executor, InterpreterLauncher};
use pygate::tool::{definition, was_cancelled, CodeExecutorTool, ExecutionRequest, TOOL_NAME};

struct DeclineAll;

impl ConfirmationGate for DeclineAll {
    fn confirm(&mut self) -> bool {
        false
    }
}

struct PanicGate;

impl ConfirmationGate for PanicGate {
    fn confirm(&mut self) -> bool {
        panic!("confirmation must not be requested");
    }
}

struct CountingLauncher {
    launches: Arc<AtomicUsize>,
}

impl InterpreterLauncher for CountingLauncher {
    fn launch(&self, _source: &str) -> io::Result<Child> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Err(io::Error::new(io::ErrorKind::Other, "launch attempted"))
    }
}

fn tool_with_gate(gate: Box<dyn ConfirmationGate + Send>) -> (CodeExecutorTool, Arc<AtomicUsize>) {
    let launches = Arc::new(AtomicUsize::new(0));
    let executor = Executor::new(
        Box::new(CountingLauncher {
            launches: launches.clone(),
        }),
        gate,
        Duration::from_secs(1),
        None,
    );
    (CodeExecutorTool::new(executor), launches)
}

#[test]
fn definition_requires_code_parameter() {
    let def = definition();
    assert_eq!(def.name, TOOL_NAME);
    assert_eq!(def.parameters["required"][0], "code");
    assert_eq!(def.parameters["properties"]["code"]["type"], "string");
}

#[tokio::test]
async fn cancelled_report_is_machine_recognizable() -> Result<()> {
    let (mut tool, launches) = tool_with_gate(Box::new(DeclineAll));
    let report = tool
        .run(&ExecutionRequest {
            code: "```python\nprint(1)\n```".to_string(),
        })
        .await;

    assert_eq!(report, "Code execution CANCELED by user.");
    assert!(was_cancelled(&report));
    assert_eq!(launches.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn fence_only_input_reports_empty() -> Result<()> {
    let (mut tool, launches) = tool_with_gate(Box::new(PanicGate));
    let report = tool
        .run(&ExecutionRequest {
            code: "```\n```".to_string(),
        })
        .await;

    assert!(report.contains("No valid Python code"));
    assert!(!was_cancelled(&report));
    assert_eq!(launches.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn run_json_parses_arguments() -> Result<()> {
    let (mut tool, _) = tool_with_gate(Box::new(PanicGate));
    let report = tool.run_json(r#"{"code": "   "}"#).await?;
    assert!(report.contains("No valid Python code"));
    Ok(())
}

#[tokio::test]
async fn run_json_rejects_malformed_arguments() -> Result<()> {
    let (mut tool, _) = tool_with_gate(Box::new(PanicGate));
    assert!(tool.run_json("not json").await.is_err());
    assert!(tool.run_json(r#"{"script": "print(1)"}"#).await.is_err());
    Ok(())
}
