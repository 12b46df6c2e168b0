//! Line-based prompts over any reader/writer pair

use amm_model::parse_amount;
use colored::Colorize;
use std::io::{self, BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Input reached end of file
    #[error("input closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type PromptResult<T> = Result<T, PromptError>;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `message` and read one trimmed line.
    pub fn ask(&mut self, message: &str) -> PromptResult<String> {
        write!(self.output, "{} {} ", "?".bright_green(), message.bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Err(PromptError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the answer parses as a number greater than zero.
    pub fn amount(&mut self, message: &str) -> PromptResult<f64> {
        loop {
            let answer = self.ask(message)?;
            match parse_amount(&answer) {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(
                    self.output,
                    "{}",
                    ">> Please enter a number greater than zero".bright_red()
                )?,
            }
        }
    }

    /// Ask until one of `choices` is picked, by number or by label.
    pub fn select<T: Copy, L: AsRef<str>>(
        &mut self,
        message: &str,
        choices: &[(T, L)],
    ) -> PromptResult<T> {
        loop {
            writeln!(self.output, "{} {}", "?".bright_green(), message.bold())?;
            for (i, (_, label)) in choices.iter().enumerate() {
                writeln!(self.output, "  {} {}", format!("{})", i + 1).bright_cyan(), label.as_ref())?;
            }

            let answer = self.ask(&format!("Choice [1-{}]:", choices.len()))?;
            if let Some(value) = pick(&answer, choices) {
                return Ok(value);
            }
            writeln!(
                self.output,
                "{}",
                format!(">> '{}' is not one of the options", answer).bright_red()
            )?;
        }
    }

    /// Yes/no question; an empty answer takes `default`.
    pub fn confirm(&mut self, message: &str, default: bool) -> PromptResult<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        loop {
            let answer = self.ask(&format!("{} {}", message, hint))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "{}", ">> Please answer y or n".bright_red())?,
            }
        }
    }
}

fn pick<T: Copy, L: AsRef<str>>(answer: &str, choices: &[(T, L)]) -> Option<T> {
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| choices.get(i)).map(|(v, _)| *v);
    }
    choices
        .iter()
        .find(|(_, label)| label.as_ref().eq_ignore_ascii_case(answer))
        .map(|(v, _)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(script: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.output).unwrap()
    }

    #[test]
    fn test_amount_reprompts_until_valid() {
        let mut p = prompter("abc\n-3\n0\n12.5\n");
        assert_eq!(p.amount("Amount:").unwrap(), 12.5);
        let text = output(p);
        assert_eq!(text.matches("Please enter a number greater than zero").count(), 3);
    }

    #[test]
    fn test_amount_eof() {
        let mut p = prompter("");
        assert!(matches!(p.amount("Amount:"), Err(PromptError::Closed)));
    }

    #[test]
    fn test_select_by_number_and_label() {
        let choices = [(1u8, "First"), (2u8, "Second")];
        let mut p = prompter("3\nnope\n2\nfirst\n");
        assert_eq!(p.select("Pick:", &choices).unwrap(), 2);
        assert_eq!(p.select("Pick:", &choices).unwrap(), 1);
        assert_eq!(output(p).matches("is not one of the options").count(), 2);
    }

    #[test]
    fn test_select_rejects_zero() {
        let choices = [(1u8, "First")];
        let mut p = prompter("0\n1\n");
        assert_eq!(p.select("Pick:", &choices).unwrap(), 1);
    }

    #[test]
    fn test_confirm() {
        let mut p = prompter("\nmaybe\ny\nNO\n");
        assert!(!p.confirm("Proceed?", false).unwrap());
        assert!(p.confirm("Proceed?", false).unwrap());
        assert!(!p.confirm("Proceed?", true).unwrap());
        assert!(output(p).contains("Please answer y or n"));
    }
}
