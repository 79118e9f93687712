//! Text arguments that may name a file or stdin.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Resolve a text argument: `-` reads stdin, an existing file path reads
/// the file, anything else is the text itself.
pub fn read_text(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }

    let path = Path::new(input);
    if path.is_file() {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    Ok(input.to_string())
}

/// Non-blank lines of a file or of stdin (`-`).
pub fn read_lines(source: &str) -> Result<Vec<String>> {
    let text = if source == "-" {
        read_text(source)?
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))?
    };

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_literal_text() {
        assert_eq!(read_text("Squats are great").unwrap(), "Squats are great");
    }

    #[test]
    fn test_file_text_and_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Great post!\n\n  Too long  ").unwrap();
        let path = file.path().to_str().unwrap();

        assert!(read_text(path).unwrap().starts_with("Great post!"));
        assert_eq!(read_lines(path).unwrap(), vec!["Great post!", "Too long"]);
    }

    #[test]
    fn test_missing_lines_file() {
        assert!(read_lines("/definitely/not/here.txt").is_err());
    }
}
