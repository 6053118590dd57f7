//! Configuration loader with TOML parsing and environment substitution
//!
//! Tokens are usually injected through the environment, so the loader
//! substitutes `${VAR}` placeholders before parsing. Comment lines are
//! left untouched.

use super::schema::HarvestConfig;
use crate::domain::{HarvestError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file.
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`HarvestConfig`]
/// 4. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is missing, parsing fails or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<HarvestConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HarvestError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HarvestError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: HarvestConfig = toml::from_str(&contents)
        .map_err(|e| HarvestError::Configuration(format!("Failed to parse TOML: {e}")))?;

    config.validate().map_err(|e| {
        HarvestError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`.
fn substitute_env_vars(input: &str) -> Result<String> {
    let placeholder = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid placeholder pattern");
    let mut result = String::with_capacity(input.len());
    let mut missing = Vec::new();

    for line in input.lines() {
        // Skip comment lines - don't substitute env vars in comments
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed = line.to_string();
        for capture in placeholder.captures_iter(line) {
            let name = &capture[1];
            match std::env::var(name) {
                Ok(value) => {
                    processed = processed.replace(&format!("${{{name}}}"), &value);
                }
                Err(_) => {
                    if !missing.contains(&name.to_string()) {
                        missing.push(name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing.is_empty() {
        return Err(HarvestError::Configuration(format!(
            "Missing environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(result)
}
