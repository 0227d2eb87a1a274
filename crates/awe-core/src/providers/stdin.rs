use super::Provider;
use crate::Result;
use crate::config::Config;
use awe_types::Candidate;
use std::io::BufRead;

/// Lines piped into the launcher (dmenu mode).
#[derive(Debug, Clone, Default)]
pub struct StdinProvider {
    lines: Vec<String>,
}

impl StdinProvider {
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Read all lines up front; blank lines are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails.
    pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        Ok(lines)
    }
}

impl Provider for StdinProvider {
    fn scan(&self, _config: &Config) -> Result<Vec<Candidate>> {
        Ok(self
            .lines
            .iter()
            .map(|line| Candidate::new(line.clone(), line.clone()).with_exec(line.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_lines_skips_blank() {
        let lines = StdinProvider::read_lines(Cursor::new("alpha\n\n  beta  \n\t\n")).unwrap();
        assert_eq!(lines, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_line_is_id_primary_and_exec() {
        let provider = StdinProvider::new(vec!["echo hi".to_string()]);
        let candidates = provider.scan(&Config::default()).unwrap();
        assert_eq!(candidates[0].id, "echo hi");
        assert_eq!(candidates[0].primary_text, "echo hi");
        assert_eq!(candidates[0].exec_command, "echo hi");
    }
}
