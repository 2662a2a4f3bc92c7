use crate::secret_string::SecretString;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::{env, fs, path::Path};
use tracing::{debug, info};

pub static DEFAULT_API_URL: &str = "https://hub.docker.com/v2";

static ENV_USER: &str = "DOCKER_USER";
static ENV_PASS: &str = "DOCKER_PASS";
static ENV_API_URL: &str = "SONAR_API_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url", rename = "apiUrl")]
    pub api_url: String,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub pass: SecretString,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: default_api_url(),
            credentials: None,
        }
    }
}

impl Credentials {
    /// Both halves must be non-empty to count as configured.
    fn from_parts(user: String, pass: String) -> Option<Self> {
        if user.is_empty() || pass.is_empty() {
            return None;
        }
        Some(Credentials {
            user,
            pass: SecretString::new(pass),
        })
    }
}

impl Config {
    /// Reads the optional config file, then lets the process environment
    /// override it.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        Ok(config.with_overrides(|key| env::var(key).ok()))
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_url) = lookup(ENV_API_URL).filter(|url| !url.is_empty()) {
            debug!("Using API URL {} from {}", api_url, ENV_API_URL);
            self.api_url = api_url;
        }

        let user = lookup(ENV_USER).unwrap_or_default();
        let pass = lookup(ENV_PASS).unwrap_or_default();
        if let Some(credentials) = Credentials::from_parts(user, pass) {
            debug!("Using Docker Hub credentials for user {} from environment", credentials.user);
            self.credentials = Some(credentials);
        }

        // A file may carry blank values after ${VAR} expansion.
        self.credentials = self
            .credentials
            .and_then(|c| Credentials::from_parts(c.user, c.pass.expose_secret().to_string()));
        self
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    info!("Loading config from file {}", path.as_ref().display());
    let yaml_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

    let expanded = expand_env_vars(&yaml_str)?;

    let config = serde_yaml_ng::from_str(&expanded)
        .context("Failed to parse YAML config after environment variable expansion")?;

    Ok(config)
}

/// Replaces `${VAR}` placeholders with environment variables values.
/// Returns an error naming the first variable that is not set.
fn expand_env_vars(input: &str) -> Result<String> {
    let re =
        Regex::new(r"\$\{([^}]+)}").context("Invalid regex pattern for env var substitution")?;

    let mut missing = None;
    let result = re.replace_all(input, |caps: &regex::Captures| {
        let var_name = &caps[1];
        env::var(var_name).unwrap_or_else(|_| {
            missing.get_or_insert_with(|| var_name.to_string());
            String::new()
        })
    });

    if let Some(var_name) = missing {
        anyhow::bail!("Missing environment variable: {}", var_name);
    }

    Ok(result.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_expand_env_vars_success() {
        unsafe {
            env::set_var("SONAR_TEST_VAR", "value123");
        }
        let input = "This is a test: ${SONAR_TEST_VAR}";
        let expanded = expand_env_vars(input).expect("Expansion should succeed");
        assert_eq!(expanded, "This is a test: value123");
        unsafe {
            env::remove_var("SONAR_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_var() {
        let input = "This will fail: ${SONAR_MISSING_VAR}";
        let err = expand_env_vars(input).unwrap_err();
        assert_eq!(err.to_string(), "Missing environment variable: SONAR_MISSING_VAR");
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let input = "No variables here";
        let expanded = expand_env_vars(input).expect("Expansion should succeed");
        assert_eq!(expanded, input);
    }

    #[test]
    fn test_load_config_file() {
        unsafe {
            env::set_var("SONAR_TEST_PASS", "secret_token");
        }
        let yaml_content = r#"
        apiUrl: http://localhost:1234/v2
        credentials:
          user: someone
          pass: ${SONAR_TEST_PASS}
        "#;

        let tmp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let path = tmp_file.path();
        fs::write(path, yaml_content).expect("Failed to write to temp file");

        let config = load_config(path).expect("Should load config");
        unsafe {
            env::remove_var("SONAR_TEST_PASS");
        }

        assert_eq!(config.api_url, "http://localhost:1234/v2");
        let credentials = config.credentials.expect("Should have credentials");
        assert_eq!(credentials.user, "someone");
        assert_eq!(credentials.pass.expose_secret(), "secret_token");
    }

    #[test]
    fn test_load_config_file_defaults() {
        let tmp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        fs::write(tmp_file.path(), "{}").expect("Failed to write to temp file");

        let config = load_config(tmp_file.path()).expect("Should load config");
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/sonar.yaml").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }

    #[test]
    fn test_env_overrides_credentials_and_url() {
        let config = Config::default().with_overrides(lookup(&[
            ("DOCKER_USER", "alice"),
            ("DOCKER_PASS", "pw"),
            ("SONAR_API_URL", "http://127.0.0.1:9/v2"),
        ]));
        assert_eq!(config.api_url, "http://127.0.0.1:9/v2");
        let credentials = config.credentials.expect("Should have credentials");
        assert_eq!(credentials.user, "alice");
        assert_eq!(credentials.pass.expose_secret(), "pw");
    }

    #[test]
    fn test_partial_credentials_are_ignored() {
        let config = Config::default().with_overrides(lookup(&[("DOCKER_USER", "alice")]));
        assert_eq!(config.credentials, None);

        let config = Config::default()
            .with_overrides(lookup(&[("DOCKER_USER", "alice"), ("DOCKER_PASS", "")]));
        assert_eq!(config.credentials, None);
    }

    #[test]
    fn test_blank_file_credentials_are_dropped() {
        let config = Config {
            api_url: default_api_url(),
            credentials: Some(Credentials {
                user: "bob".to_string(),
                pass: SecretString::new(""),
            }),
        };
        assert_eq!(config.with_overrides(lookup(&[])).credentials, None);
    }
}
