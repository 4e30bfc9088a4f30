//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SyncConfig
/// 4. Applies environment variable overrides (LOGSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use logsync::config::loader::load_config;
///
/// let config = load_config("logsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

/// Like [`load_config`], but a missing file yields the defaults
///
/// Environment overrides and validation still apply.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    finish(SyncConfig::default())
}

fn finish(mut config: SyncConfig) -> Result<SyncConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns one error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in ENV_PLACEHOLDER.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the LOGSYNC_* prefix
///
/// Variables follow the pattern `LOGSYNC_<SECTION>_<KEY>`, e.g.
/// `LOGSYNC_JOB_PAGE_SIZE`.
fn apply_env_overrides(config: &mut SyncConfig) -> Result<()> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

fn apply_overrides(
    config: &mut SyncConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(val) = lookup("LOGSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = lookup("LOGSYNC_JOB_PAGE_SIZE") {
        config.job.page_size = parse_override("LOGSYNC_JOB_PAGE_SIZE", &val)?;
    }
    if let Some(val) = lookup("LOGSYNC_JOB_MAX_CONCURRENCY") {
        config.job.max_concurrency = parse_override("LOGSYNC_JOB_MAX_CONCURRENCY", &val)?;
    }
    if let Some(val) = lookup("LOGSYNC_JOB_DRY_RUN") {
        config.job.dry_run = parse_override("LOGSYNC_JOB_DRY_RUN", &val)?;
    }

    if let Some(val) = lookup("LOGSYNC_STATE_HISTORY_PATH") {
        config.state.history_path = val;
    }

    Ok(())
}

fn parse_override<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        SyncError::Configuration(format!("Invalid value for {name}: '{value}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LOGSYNC_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${LOGSYNC_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("LOGSYNC_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_reports_all_missing() {
        let input = "a = \"${LOGSYNC_MISSING_ONE}\"\nb = \"${LOGSYNC_MISSING_TWO}\"";
        let err = substitute_env_vars(input).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("LOGSYNC_MISSING_ONE"));
        assert!(message.contains("LOGSYNC_MISSING_TWO"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# key = \"${LOGSYNC_ONLY_IN_COMMENT}\"\n";
        assert_eq!(substitute_env_vars(input).unwrap(), input);
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("nonexistent-logsync.toml").is_err());
    }

    #[test]
    fn test_load_config_or_default_missing_file() {
        let config = load_config_or_default("nonexistent-logsync.toml").unwrap();
        assert_eq!(config.application.log_level, "info");
    }

    #[test]
    fn test_load_config_valid() {
        let temp_file = write_config(
            r#"
[application]
log_level = "debug"

[job]
page_size = 100
max_concurrency = 8

[storage]
endpoint = "http://127.0.0.1:10000/devstoreaccount1"

[settings]
DOMAIN = "example.eu.auth0.com"
STORAGE_CONTAINER_NAME = "auth0-logs"
"#,
        );

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.job.page_size, 100);
        assert_eq!(config.job.max_concurrency, 8);
        assert_eq!(
            config.storage.endpoint.as_deref(),
            Some("http://127.0.0.1:10000/devstoreaccount1")
        );
        assert_eq!(config.settings["STORAGE_CONTAINER_NAME"], "auth0-logs");
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let temp_file = write_config("[job]\npage_size = 5000\n");
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("job.page_size"));
    }

    #[test]
    fn test_overrides_apply() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LOGSYNC_JOB_PAGE_SIZE", "50"),
            ("LOGSYNC_JOB_DRY_RUN", "true"),
            ("LOGSYNC_STATE_HISTORY_PATH", "/tmp/history.jsonl"),
        ]);
        let mut config = SyncConfig::default();

        apply_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(config.job.page_size, 50);
        assert!(config.job.dry_run);
        assert_eq!(config.job.max_concurrency, 5);
        assert_eq!(config.state.history_path, "/tmp/history.jsonl");
    }

    #[test]
    fn test_unparsable_override_is_an_error() {
        let mut config = SyncConfig::default();
        let err = apply_overrides(&mut config, |name| {
            (name == "LOGSYNC_JOB_MAX_CONCURRENCY").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("LOGSYNC_JOB_MAX_CONCURRENCY"));
    }
}
