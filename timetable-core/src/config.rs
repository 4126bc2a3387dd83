//! User configuration at ~/.config/timetable/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MINUTE_STEP, DEFAULT_STUDENT};
use crate::error::{TimetableError, TimetableResult};
use crate::policy::Policy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub policy: Policy,

    /// Subject label for student files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
}

impl Config {
    pub fn config_path() -> TimetableResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TimetableError::Config("Could not determine config directory".into()))?
            .join("timetable");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location. A missing file means defaults.
    pub fn load() -> TimetableResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> TimetableResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TimetableError::Config(e.to_string()))
    }

    pub fn student(&self) -> &str {
        self.student.as_deref().unwrap_or(DEFAULT_STUDENT)
    }

    /// Create a config file with every option commented out.
    pub fn create_default_config(path: &Path) -> TimetableResult<()> {
        let contents = format!(
            "\
# timetable configuration

# Treat every advisory finding (weekday mismatch, overlap, suspicious email,
# off-grid minutes, byte-order mark) as an error:
# strict = false

# Or promote only some of them:
# escalate = [\"TimeOverlap\", \"WeekdayMismatch\"]

# Require start and end minutes on this grid:
# minute_step = {}

# Subject label for student schedule files:
# student = \"{}\"
",
            DEFAULT_MINUTE_STEP, DEFAULT_STUDENT
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimetableError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TimetableError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.student(), "student");
    }

    #[test]
    fn test_default_config_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timetable/config.toml");
        Config::create_default_config(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_load_policy_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "escalate = [\"TimeOverlap\"]\nminute_step = 30\nstudent = \"zhang.san\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.policy.strict);
        assert_eq!(config.policy.escalate, vec![DiagnosticCode::TimeOverlap]);
        assert_eq!(config.policy.minute_step, Some(30));
        assert_eq!(config.student(), "zhang.san");
    }

    #[test]
    fn test_unknown_code_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "escalate = [\"Typo\"]\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(TimetableError::Config(_))
        ));
    }
}
