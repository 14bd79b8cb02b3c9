//! Line prompts for form fields not given on the command line.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Reads missing field values line by line.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter reading from `input` and writing prompts to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns `value` if present, otherwise prompts for `label`.
    ///
    /// End of input yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the prompt or reading the answer fails.
    pub fn value_or_prompt(&mut self, value: Option<String>, label: &str) -> Result<String> {
        if let Some(value) = value {
            return Ok(value);
        }
        write!(self.output, "{label}: ").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .with_context(|| format!("failed to read {label}"))?;
        Ok(String::from(line.trim_end_matches(['\r', '\n'])))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_given_value_skips_prompt() {
        // Arrange
        let mut output = Vec::new();
        let mut prompter = Prompter::new("ignored\n".as_bytes(), &mut output);

        // Act
        let value = prompter
            .value_or_prompt(Some(String::from("alice")), "Username")
            .unwrap();

        // Assert
        assert_eq!(value, "alice");
        assert!(output.is_empty());
    }

    #[test]
    fn test_prompts_in_order() {
        // Arrange
        let mut output = Vec::new();
        let mut prompter = Prompter::new("alice\r\ns3cret\n".as_bytes(), &mut output);

        // Act
        let username = prompter.value_or_prompt(None, "Username").unwrap();
        let password = prompter.value_or_prompt(None, "Password").unwrap();

        // Assert
        assert_eq!(username, "alice");
        assert_eq!(password, "s3cret");
        assert_eq!(String::from_utf8(output).unwrap(), "Username: Password: ");
    }

    #[test]
    fn test_end_of_input_is_empty() {
        // Arrange
        let mut prompter = Prompter::new("".as_bytes(), Vec::new());

        // Act
        let value = prompter.value_or_prompt(None, "Email").unwrap();

        // Assert
        assert_eq!(value, "");
    }
}
