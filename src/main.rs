use anyhow::Result;
use is_terminal::IsTerminal;
use std::io::{self, Read};
use std::time::Duration;

use pygate::{
    cli::Cli,
    config::Config,
    executor::{default_python_program, Executor, PythonLauncher, TerminalGate, DEFAULT_TIMEOUT_SECS},
    tool::{self, CodeExecutorTool, ExecutionRequest},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if args.schema {
        println!("{}", serde_json::to_string_pretty(&tool::definition())?);
        return Ok(());
    }

    // Load config
    let cfg = Config::load();

    // stdin handling (pipe support); a piped stdin cannot answer the
    // confirmation prompt, so the gate will decline on its own.
    let mut code_from_stdin = String::new();
    if !io::stdin().is_terminal() {
        io::stdin().read_to_string(&mut code_from_stdin)?;
    }
    let raw_code = match args.code {
        Some(code) if !code_from_stdin.is_empty() => {
            format!("{}\n\n{}", code_from_stdin, code)
        }
        Some(code) => code,
        None => code_from_stdin,
    };

    // Resolve interpreter and deadline: CLI overrides config
    let program = args
        .python
        .or_else(|| cfg.get("PYTHON_BIN"))
        .unwrap_or_else(default_python_program);
    let secs = args
        .timeout
        .or_else(|| cfg.get_u64("EXECUTION_TIMEOUT"))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let executor = Executor::new(
        Box::new(PythonLauncher { program }),
        Box::new(TerminalGate),
        Duration::from_secs(secs),
        cfg.get("DEFAULT_COLOR"),
    );
    let mut tool = CodeExecutorTool::new(executor);

    let report = tool.run(&ExecutionRequest { code: raw_code }).await;
    println!("{}", report);
    Ok(())
}
