//! @acp:module "Output Formatting"
//! @acp:summary "One-line status markers shared by all commands"
//! @acp:domain cli
//! @acp:layer utility

use std::fmt::Display;

use console::style;

pub fn ok(message: impl Display) {
    println!("{} {}", style("[OK]").green(), message);
}

pub fn warn(message: impl Display) {
    println!("{} {}", style("[WARN]").yellow(), message);
}

/// Failure marker; goes to stderr like the other error output
pub fn fail(message: impl Display) {
    eprintln!("{} {}", style("[FAIL]").red().bold(), message);
}
