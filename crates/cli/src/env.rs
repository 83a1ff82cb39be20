use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CliError;

/// Variable holding the connection string when `--conn-str` is not given.
pub const CONN_STR_VAR: &str = "SIMPLE_STATS_CONN_STR";

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    vars: HashMap<String, String>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Process environment plus `env_file`, or the default env file when
    /// none is given and it exists.
    pub fn load(env_file: Option<&str>) -> Result<Self, CliError> {
        let mut env = Self::new();
        match env_file {
            Some(path) => env.load_from_file(path)?,
            None => {
                if let Some(path) = default_env_file().filter(|p| p.is_file()) {
                    env.load_from_file(path)?;
                }
            }
        }
        Ok(env)
    }

    /// Load variables from a .env file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        debug!("Loaded env file {}", path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// An explicit connection string wins over the environment.
    pub fn conn_str(&self, explicit: Option<String>) -> Result<String, CliError> {
        explicit
            .or_else(|| self.get(CONN_STR_VAR).map(str::to_string))
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                CliError::Config(format!(
                    "No connection string: pass --conn-str or set {CONN_STR_VAR}"
                ))
            })
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim().trim_start_matches("export ").trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid env file: empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars
                .insert(key.to_string(), Self::unquote_value(value));
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

/// `<config dir>/simple-stats/.env`
fn default_env_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("simple-stats").join(".env"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> EnvManager {
        EnvManager::default()
    }

    #[test]
    fn test_parse_basic_env() {
        let mut env = empty();
        let content = r#"
# Comment
KEY1=value1
export KEY2=value2
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("KEY1"), Some("value1"));
        assert_eq!(env.get("KEY2"), Some("value2"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let mut env = empty();
        let content = r#"
QUOTED="value with spaces"
SINGLE='single quoted'
UNQUOTED=no_spaces
URL=postgres://u:p@localhost/db?sslmode=disable
        "#;

        env.parse_env_content(content).unwrap();
        assert_eq!(env.get("QUOTED"), Some("value with spaces"));
        assert_eq!(env.get("SINGLE"), Some("single quoted"));
        assert_eq!(env.get("UNQUOTED"), Some("no_spaces"));
        assert_eq!(
            env.get("URL"),
            Some("postgres://u:p@localhost/db?sslmode=disable")
        );
    }

    #[test]
    fn test_invalid_env_format() {
        let mut env = empty();
        assert!(env.parse_env_content("INVALID LINE WITHOUT EQUALS").is_err());
        assert!(env.parse_env_content("=value").is_err());
    }

    #[test]
    fn test_conn_str_resolution() {
        let mut env = empty();
        assert!(matches!(env.conn_str(None), Err(CliError::Config(_))));

        env.parse_env_content("SIMPLE_STATS_CONN_STR=postgres://from-env")
            .unwrap();
        assert_eq!(env.conn_str(None).unwrap(), "postgres://from-env");
        assert_eq!(
            env.conn_str(Some("postgres://explicit".into())).unwrap(),
            "postgres://explicit"
        );
    }

    #[test]
    fn test_missing_env_file_is_a_config_error() {
        let mut env = empty();
        let err = env
            .load_from_file("/definitely/not/here/.env")
            .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
