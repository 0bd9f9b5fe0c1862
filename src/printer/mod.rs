//! Operator-facing text printer with optional named color.

use owo_colors::OwoColorize;

pub struct TextPrinter {
    pub color: Option<String>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        match self.color.as_deref() {
            Some("green") => println!("{}", text.green()),
            Some("cyan") => println!("{}", text.cyan()),
            Some("magenta") => println!("{}", text.magenta()),
            Some("yellow") => println!("{}", text.yellow()),
            _ => println!("{}", text),
        }
    }
}
