use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "pygate", about = "Human-gated Python code execution", version)]
pub struct Cli {
    /// The Python code to execute (markdown fences are stripped).
    #[arg(value_name = "CODE")]
    pub code: Option<String>,

    /// Python interpreter to launch.
    #[arg(long)]
    pub python: Option<String>,

    /// Wall-clock execution deadline in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the tool definition as JSON (hidden).
    #[arg(long, hide = true)]
    pub schema: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
