//! Gated execution of untrusted code in a fresh interpreter process.

use std::io::{self, Write};
use std::process::Stdio;
use std::time::Duration;

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use tokio::process::{Child, Command};
use tokio::time::timeout;

use crate::printer::TextPrinter;

/// Wall-clock deadline applied when no override is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const CANCELLED_MESSAGE: &str = "Code execution CANCELED by user.";
pub const EMPTY_MESSAGE: &str =
    "Error: No valid Python code provided after cleaning. The input might have been empty or only markdown.";

/// Exactly one outcome is produced per request. A failing program is
/// `Completed` with a nonzero exit code; `SystemFailure` is reserved for the
/// execution mechanism itself breaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Cancelled,
    Empty,
    Completed {
        stdout: String,
        stderr: String,
        exit_code: i32,
    },
    TimedOut,
    SystemFailure {
        message: String,
    },
}

/// Spawns a fresh interpreter for one source payload.
///
/// Injected so tests can assert that a declined confirmation never creates a
/// process.
pub trait InterpreterLauncher {
    fn launch(&self, source: &str) -> io::Result<Child>;
}

/// Runs `<python> -c <source>`: the source travels as a complete program
/// argument, never via the filesystem or an interactive stdin feed.
pub struct PythonLauncher {
    pub program: String,
}

impl InterpreterLauncher for PythonLauncher {
    fn launch(&self, source: &str) -> io::Result<Child> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-c")
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd.spawn()
    }
}

/// Interpreter used when neither `--python` nor `PYTHON_BIN` is set.
pub fn default_python_program() -> String {
    if cfg!(windows) { "python" } else { "python3" }.to_string()
}

/// The only authorization boundary in front of the interpreter. There is no
/// auto-approve path; every run goes through a gate decision.
pub trait ConfirmationGate {
    fn confirm(&mut self) -> bool;
}

/// Production gate: one-line prompt on the operator's terminal. Only a
/// single-letter affirmative approves; anything else, a read error, or a
/// non-terminal stdin declines.
pub struct TerminalGate;

impl ConfirmationGate for TerminalGate {
    fn confirm(&mut self) -> bool {
        if !io::stdin().is_terminal() {
            return false;
        }
        print!("Do you want to execute this cleaned code? [y/N]: ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        line.trim().eq_ignore_ascii_case("y")
    }
}

pub struct Executor {
    launcher: Box<dyn InterpreterLauncher + Send + Sync>,
    gate: Box<dyn ConfirmationGate + Send>,
    deadline: Duration,
    printer: TextPrinter,
}

impl Executor {
    pub fn new(
        launcher: Box<dyn InterpreterLauncher + Send + Sync>,
        gate: Box<dyn ConfirmationGate + Send>,
        deadline: Duration,
        code_color: Option<String>,
    ) -> Self {
        Self {
            launcher,
            gate,
            deadline,
            printer: TextPrinter { color: code_color },
        }
    }

    /// Run one payload to a single outcome. Never panics, never returns an
    /// error: every failure mode is an outcome variant.
    pub async fn execute(&mut self, source: &str) -> ExecutionOutcome {
        if source.is_empty() {
            return ExecutionOutcome::Empty;
        }

        self.display(source);
        if !self.gate.confirm() {
            return ExecutionOutcome::Cancelled;
        }

        let child = match self.launcher.launch(source) {
            Ok(child) => child,
            Err(e) => {
                return ExecutionOutcome::SystemFailure {
                    message: format!("failed to launch interpreter: {}", e),
                }
            }
        };

        // On deadline expiry the future owning the child is dropped and
        // kill_on_drop reaps it; partial output is discarded.
        match timeout(self.deadline, child.wait_with_output()).await {
            Ok(Ok(out)) => ExecutionOutcome::Completed {
                stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                exit_code: out.status.code().unwrap_or(-1),
            },
            Ok(Err(e)) => ExecutionOutcome::SystemFailure {
                message: e.to_string(),
            },
            Err(_) => ExecutionOutcome::TimedOut,
        }
    }

    /// Show the exact source awaiting authorization on the operator channel.
    fn display(&self, source: &str) {
        println!();
        println!("{}", "--- PROPOSED CLEANED CODE ---".cyan());
        self.printer.print(source);
        println!("{}", "---------------------------".cyan());
        println!();
    }

    /// One deterministic report string per outcome; the orchestrator has no
    /// other channel.
    pub fn render(&self, outcome: &ExecutionOutcome) -> String {
        match outcome {
            ExecutionOutcome::Cancelled => CANCELLED_MESSAGE.to_string(),
            ExecutionOutcome::Empty => EMPTY_MESSAGE.to_string(),
            ExecutionOutcome::TimedOut => format!(
                "Error: Code execution timed out after {} seconds.",
                self.deadline.as_secs()
            ),
            ExecutionOutcome::SystemFailure { message } => format!(
                "An unexpected error occurred during Python code execution: {}",
                message
            ),
            ExecutionOutcome::Completed {
                stdout,
                stderr,
                exit_code,
            } => {
                let stdout = stdout.trim();
                let stderr = stderr.trim();
                let mut parts: Vec<String> = Vec::new();
                if !stdout.is_empty() {
                    parts.push(format!("Standard Output:\n{}", stdout));
                }
                if !stderr.is_empty() {
                    parts.push(format!("Standard Error:\n{}", stderr));
                }
                let mut message = parts.join("\n");

                if message.is_empty() && *exit_code == 0 {
                    message = "Code executed successfully with no output to stdout or stderr."
                        .to_string();
                } else if message.is_empty() {
                    message = format!(
                        "Code execution failed with return code {} and no specific error message.",
                        exit_code
                    );
                } else if *exit_code != 0 && stderr.is_empty() {
                    // stderr was silent; the exit code still must surface.
                    message.push_str(&format!(
                        "\nCode execution finished with return code: {}",
                        exit_code
                    ));
                }
                message
            }
        }
    }
}
