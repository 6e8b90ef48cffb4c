//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_error, display_release_plan, display_run_report, display_status, display_success,
    display_warning, format_release_plan,
};

/// Whether a user is attached to the terminal to answer prompts
pub fn is_interactive() -> bool {
    console::Term::stdout().is_term()
}

/// Prompts the user with a yes/no question; anything but `y`/`yes` is a no.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let stdin = io::stdin();
    read_confirmation(&mut stdin.lock())
}

/// Read one answer line from `input`. End of input counts as no.
pub fn read_confirmation<R: BufRead>(input: &mut R) -> Result<bool> {
    let mut line = String::new();
    input.read_line(&mut line)?;

    let response = line.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
