//! Environment-selected key/value settings.
//!
//! Settings live in `<config-dir>/<env>-config.properties`, one `key = value`
//! per line. Blank lines, `#` comments and lines without `=` are ignored; keys
//! and values are trimmed.

use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const DEFAULT_ENV: &str = "dev";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    /// Parse properties text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let values = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                let key = key.trim();
                if key.is_empty() {
                    None
                } else {
                    Some((key.to_string(), value.trim().to_string()))
                }
            })
            .collect();
        Self { values }
    }

    /// Load the properties file for `env` from `dir`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn load(dir: &Path, env: &str) -> Result<Self> {
        let path = settings_path(dir, env);
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings = Self::parse(&text);
        debug!(
            path = %path.display(),
            keys = settings.values.len(),
            "settings loaded"
        );
        Ok(settings)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[must_use]
pub fn settings_path(dir: &Path, env: &str) -> PathBuf {
    dir.join(format!("{env}-config.properties"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_key_values() {
        let settings = Settings::parse(
            "# comment\nport = 6161\n\njson_web_token_expiration_as_seconds=10\nnot a pair\n = orphan\nempty=\n",
        );
        assert_eq!(settings.get("port"), Some("6161"));
        assert_eq!(settings.get("json_web_token_expiration_as_seconds"), Some("10"));
        assert_eq!(settings.get("empty"), Some(""));
        assert_eq!(settings.get("not a pair"), None);
        assert_eq!(settings.get(""), None);
    }

    #[test]
    fn value_may_contain_equals() {
        let settings = Settings::parse("secret=a=b");
        assert_eq!(settings.get("secret"), Some("a=b"));
    }

    #[test]
    fn load_selects_file_by_env() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut file = fs::File::create(dir.path().join("test-config.properties"))?;
        writeln!(file, "log_level = trace")?;

        let settings = Settings::load(dir.path(), "test")?;
        assert_eq!(settings.get("log_level"), Some("trace"));

        let missing = Settings::load(dir.path(), "prod");
        assert!(missing.is_err());
        Ok(())
    }

    #[test]
    fn settings_path_format() {
        assert_eq!(
            settings_path(Path::new("config"), DEFAULT_ENV),
            PathBuf::from("config/dev-config.properties")
        );
    }
}
