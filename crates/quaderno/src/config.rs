//! Configuration loading from environment variables.

use std::path::PathBuf;

/// Used when `QUADERNO_DB` is not set.
pub const DEFAULT_DB_PATH: &str = ".quaderno/preferences.db";
/// Used when neither `--output` nor `QUADERNO_OUTPUT` is given.
pub const DEFAULT_OUTPUT_DIR: &str = "site";

/// Paths the CLI works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// Reads `QUADERNO_DB` and `QUADERNO_OUTPUT`, either from the environment
    /// or from a `.env` file; unset variables fall back to the defaults.
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(
            std::env::var("QUADERNO_DB").ok(),
            std::env::var("QUADERNO_OUTPUT").ok(),
        )
    }

    fn from_vars(db: Option<String>, output: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            db_path: PathBuf::from(non_empty(db).unwrap_or_else(|| DEFAULT_DB_PATH.to_string())),
            output_dir: PathBuf::from(
                non_empty(output).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
        }
    }

    /// Apply command-line overrides.
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        if let Some(output) = output {
            self.output_dir = output;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_vars(None, None);
        assert_eq!(settings.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }

    #[test]
    fn test_values_from_vars() {
        let settings = Settings::from_vars(
            Some("/tmp/prefs.db".to_string()),
            Some("public".to_string()),
        );
        assert_eq!(settings.db_path, PathBuf::from("/tmp/prefs.db"));
        assert_eq!(settings.output_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_blank_values_ignored() {
        let settings = Settings::from_vars(Some("  ".to_string()), Some(String::new()));
        assert_eq!(settings, Settings::from_vars(None, None));
    }

    #[test]
    fn test_cli_output_wins() {
        let settings = Settings::from_vars(None, Some("public".to_string()))
            .with_output(Some(PathBuf::from("dist")));
        assert_eq!(settings.output_dir, PathBuf::from("dist"));

        let settings = Settings::from_vars(None, Some("public".to_string())).with_output(None);
        assert_eq!(settings.output_dir, PathBuf::from("public"));
    }
}
