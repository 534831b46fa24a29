use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Print `prompt`, read one line and return it trimmed. EOF reads as "".
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?; // Make sure the prompt is displayed before blocking
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask_stdin(prompt: &str) -> io::Result<String> {
    ask(&mut io::stdin().lock(), &mut io::stdout(), prompt)
}

pub fn submissions_dir() -> io::Result<PathBuf> {
    let answer = ask_stdin("Enter submissions folder path (or press Enter for current directory): ")?;
    dir_or_cwd(&answer)
}

pub fn deadline() -> io::Result<String> {
    ask_stdin("Enter submission deadline (YYYY-MM-DD HH:MM:SS): ")
}

fn dir_or_cwd(answer: &str) -> io::Result<PathBuf> {
    if answer.is_empty() {
        std::env::current_dir()
    } else {
        Ok(PathBuf::from(answer))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_ask_trims_and_echoes_prompt() {
        let mut input = Cursor::new("  2024-03-01 23:59:59 \n");
        let mut output = Vec::new();
        let answer = ask(&mut input, &mut output, "Deadline: ").unwrap();
        assert_eq!(answer, "2024-03-01 23:59:59");
        assert_eq!(output, b"Deadline: ");
    }

    #[test]
    fn test_ask_at_eof_is_empty() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(ask(&mut input, &mut output, "> ").unwrap(), "");
    }

    #[test]
    fn test_empty_dir_answer_means_cwd() {
        assert_eq!(dir_or_cwd("").unwrap(), std::env::current_dir().unwrap());
        assert_eq!(dir_or_cwd("subs").unwrap(), PathBuf::from("subs"));
    }
}
