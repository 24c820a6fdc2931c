//! Interactive prompts for inputs not supplied on the command line.

use console::{style, Term};
use std::io;

/// Ask a question on the terminal and return the trimmed answer.
pub fn prompt_line(question: &str) -> io::Result<String> {
    let term = Term::stdout();
    term.write_str(&format!("{} ", style(format!("[*] {}", question)).cyan()))?;
    let answer = term.read_line()?;
    Ok(answer.trim().to_string())
}

/// Return `value` when present, otherwise prompt for it.
pub fn prompt_missing(value: Option<&str>, question: &str) -> io::Result<String> {
    match value {
        Some(v) => Ok(v.to_string()),
        None => prompt_line(question),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_value_skips_prompt() {
        assert_eq!(prompt_missing(Some("22,80"), "unused").unwrap(), "22,80");
    }
}
