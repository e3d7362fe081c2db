//! Env file loading
//!
//! Reads `KEY=VALUE` files without touching the process environment, so
//! several files can be loaded side by side (and tests stay isolated).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::ConfigError;

/// Env file used when none is given on the command line
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Parsed contents of an env file
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: Option<PathBuf>,
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Load an env file; a missing file is an error
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            vars.insert(key, value);
        }

        debug!(path = %path.display(), vars = vars.len(), "Loaded env file");

        Ok(Self {
            path: Some(path.to_path_buf()),
            vars,
        })
    }

    /// Load an env file if it exists, otherwise return an empty one
    ///
    /// Used for the implicit `.env` default, where the process environment
    /// may already carry the credentials.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match Self::load(path) {
            Err(ConfigError::EnvFile(e)) if e.not_found() => {
                warn!(
                    path = %path.display(),
                    "Env file not found, using process environment only"
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parse env file contents from a string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut vars = HashMap::new();
        for item in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        Ok(Self { path: None, vars })
    }

    /// Value defined in the file itself
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Value from the file, falling back to the process environment
    ///
    /// Empty values count as absent.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::to_owned)
            .or_else(|| std::env::var(key).ok())
            .filter(|value| !value.trim().is_empty())
    }

    /// Path the file was loaded from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "
# credentials for the smoke run
USER_KEY=abc123

USER_SEED=s3cr3t
HOST_DNS=example.iotics.space
";

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let env = EnvFile::parse(SAMPLE).unwrap();
        assert_eq!(env.len(), 3);
        assert_eq!(env.get("USER_KEY"), Some("abc123"));
        assert_eq!(env.get("USER_SEED"), Some("s3cr3t"));
        assert_eq!(env.get("HOST_DNS"), Some("example.iotics.space"));
        assert!(env.path().is_none());
    }

    #[test]
    fn test_value_may_contain_equals() {
        let env = EnvFile::parse("TOKEN=a=b=c\n").unwrap();
        assert_eq!(env.get("TOKEN"), Some("a=b=c"));
    }

    #[test]
    fn test_values_follow_dotenv_quoting() {
        // Unquoted values expand `$VAR` and stop at ` #`
        let env = EnvFile::parse("USER_SEED=ab$SPARQL_SMOKE_UNSET_VAR\n").unwrap();
        assert_eq!(env.get("USER_SEED"), Some("ab"));
        let env = EnvFile::parse("USER_SEED=ab #cd\n").unwrap();
        assert_eq!(env.get("USER_SEED"), Some("ab"));
        let env = EnvFile::parse("USER_SEED='ab'cd\n").unwrap();
        assert_eq!(env.get("USER_SEED"), Some("abcd"));

        // Single quotes keep the value literal
        let env = EnvFile::parse("USER_SEED='ab$cd #ef'\n").unwrap();
        assert_eq!(env.get("USER_SEED"), Some("ab$cd #ef"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let env = EnvFile::load(file.path()).unwrap();
        assert_eq!(env.get("USER_KEY"), Some("abc123"));
        assert_eq!(env.path(), Some(file.path()));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = EnvFile::load(dir.path().join("absent.env"));
        assert!(matches!(result, Err(ConfigError::EnvFile(_))));
    }

    #[test]
    fn test_load_optional_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let env = EnvFile::load_optional(dir.path().join("absent.env")).unwrap();
        assert!(env.is_empty());
    }

    #[test]
    fn test_lookup_ignores_empty_values() {
        let env = EnvFile::parse("SPARQL_SMOKE_TEST_EMPTY=\n").unwrap();
        assert_eq!(env.get("SPARQL_SMOKE_TEST_EMPTY"), Some(""));
        assert_eq!(env.lookup("SPARQL_SMOKE_TEST_EMPTY"), None);
    }

    #[test]
    fn test_lookup_falls_back_to_process_env() {
        // PATH is set in any reasonable test environment
        let env = EnvFile::default();
        assert_eq!(env.lookup("PATH"), std::env::var("PATH").ok());
    }
}
