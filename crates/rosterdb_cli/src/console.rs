//! Line-oriented prompting over any reader and writer.

use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

/// Result type for console operations.
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Errors that end an interactive session.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Reading or writing the terminal failed.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input stream was closed.
    #[error("end of input")]
    EndOfInput,
}

/// A prompt-and-read wrapper around an input and an output stream.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// The output stream, for rendering.
    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Reads one line without its line terminator.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::EndOfInput`] once the input is exhausted.
    pub fn read_line(&mut self) -> ConsoleResult<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::EndOfInput);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Writes `label` and reads the answer.
    pub fn prompt(&mut self, label: &str) -> ConsoleResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Writes `label` and reads an integer, asking again until one is given.
    pub fn prompt_integer<T: FromStr>(&mut self, label: &str) -> ConsoleResult<T> {
        loop {
            let answer = self.prompt(label)?;
            match answer.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }

    /// Asks a yes/no question. Only `y` or `Y` counts as yes.
    pub fn confirm(&mut self, question: &str) -> ConsoleResult<bool> {
        let answer = self.prompt(&format!("{question} (y/n): "))?;
        Ok(matches!(answer.trim(), "y" | "Y"))
    }

    /// Waits for the user to press Enter.
    pub fn pause(&mut self) -> ConsoleResult<()> {
        self.prompt("\nPress Enter to continue...")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new())
    }

    fn written(console: Console<&[u8], Vec<u8>>) -> String {
        String::from_utf8(console.output).unwrap()
    }

    #[test]
    fn read_line_strips_terminators_only() {
        let mut c = console("  padded \r\nlast");
        assert_eq!(c.read_line().unwrap(), "  padded ");
        assert_eq!(c.read_line().unwrap(), "last");
        assert!(matches!(c.read_line(), Err(ConsoleError::EndOfInput)));
    }

    #[test]
    fn prompt_writes_label() {
        let mut c = console("Ann\n");
        assert_eq!(c.prompt("Name: ").unwrap(), "Ann");
        assert_eq!(written(c), "Name: ");
    }

    #[test]
    fn prompt_integer_retries() {
        let mut c = console("abc\n\n 42 \n");
        let value: i64 = c.prompt_integer("Age: ").unwrap();
        assert_eq!(value, 42);
        assert_eq!(
            written(c),
            "Age: Please enter a valid number.\nAge: Please enter a valid number.\nAge: "
        );
    }

    #[test]
    fn prompt_integer_at_end_of_input() {
        let mut c = console("nope\n");
        let result: ConsoleResult<i32> = c.prompt_integer("Age: ");
        assert!(matches!(result, Err(ConsoleError::EndOfInput)));
    }

    #[test]
    fn confirm_accepts_only_y() {
        assert!(console("y\n").confirm("Sure?").unwrap());
        assert!(console(" Y \n").confirm("Sure?").unwrap());
        assert!(!console("yes\n").confirm("Sure?").unwrap());
        assert!(!console("n\n").confirm("Sure?").unwrap());
        assert!(!console("\n").confirm("Sure?").unwrap());
    }
}
