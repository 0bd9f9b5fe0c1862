//! Tool boundary consumed by the agent orchestrator.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::config::Config;
use crate::executor::{
    default_python_program, Executor, PythonLauncher, TerminalGate, CANCELLED_MESSAGE,
    DEFAULT_TIMEOUT_SECS,
};
use crate::normalizer::normalize;

pub const TOOL_NAME: &str = "python_code_executor";
pub const TOOL_DESCRIPTION: &str = "Executes a given snippet of Python code and returns its standard output and standard error. \
Use this tool ONLY for running Python code. \
The input 'code' MUST be raw Python code only, without any surrounding text, explanations, or markdown \
fences (like ```python or ```). \
Ensure the Python code is self-contained and prints any results to standard output (e.g., using `print(result)`).";

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: TOOL_NAME,
        description: TOOL_DESCRIPTION,
        parameters: json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "The Python code to execute. It should be a complete, runnable script without any markdown formatting."
                }
            },
            "required": ["code"]
        }),
    }
}

/// One tool invocation's payload, as sent by the orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
}

/// The cancellation sentence drives a distinct branch in the orchestrator's
/// control flow; it is matched exactly.
pub fn was_cancelled(report: &str) -> bool {
    report == CANCELLED_MESSAGE
}

pub struct CodeExecutorTool {
    executor: Executor,
}

impl CodeExecutorTool {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Production wiring: real interpreter, real terminal gate.
    pub fn from_config(cfg: &Config) -> Self {
        let program = cfg
            .get("PYTHON_BIN")
            .unwrap_or_else(default_python_program);
        let secs = cfg
            .get_u64("EXECUTION_TIMEOUT")
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(Executor::new(
            Box::new(PythonLauncher { program }),
            Box::new(TerminalGate),
            Duration::from_secs(secs),
            cfg.get("DEFAULT_COLOR"),
        ))
    }

    /// Normalize, gate, execute, render. Every failure mode comes back as a
    /// report string; nothing propagates past this call.
    pub async fn run(&mut self, request: &ExecutionRequest) -> String {
        let source = normalize(&request.code);
        let outcome = self.executor.execute(&source).await;
        self.executor.render(&outcome)
    }

    /// Entry point for raw JSON tool arguments.
    pub async fn run_json(&mut self, args_json: &str) -> Result<String> {
        let request: ExecutionRequest = serde_json::from_str(args_json)
            .with_context(|| format!("invalid tool args json: {}", args_json))?;
        Ok(self.run(&request).await)
    }
}
