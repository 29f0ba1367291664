//! Line-oriented `key=value` configuration file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Key of the table path in a configuration file.
pub const DB_NAME_KEY: &str = "db_name";

/// Entries of a configuration file, in file order.
#[derive(Debug, Default)]
pub struct Config {
    entries: Vec<(String, String)>,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// One entry per line. Leading `=` are skipped, the key runs up to the
    /// next `=`, and the value up to the `=` after that or the line end.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let mut tokens = line
                    .trim_end_matches('\r')
                    .split('=')
                    .filter(|token| !token.is_empty());
                let key = tokens.next()?;
                let value = tokens.next().unwrap_or_default();
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        Self { entries }
    }

    /// Value of the first entry named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
