use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{CrustError, Result};
use crate::prompts::DEFAULT_LANGUAGE;

pub const CONFIG_FILE_NAME: &str = ".crust.json";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Contents of `~/.crust.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub openai_key: String,
    pub terraform_plan_command: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    pub fn new(openai_key: String, terraform_plan_command: String, language: String) -> Self {
        Self {
            openai_key,
            terraform_plan_command,
            language,
            model: None,
            base_url: None,
            timeout: None,
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CrustError::ConfigInvalid("could not find home directory".to_string()))?;
        Ok(home.join(CONFIG_FILE_NAME))
    }

    /// `Ok(None)` when there is no file at `path`.
    pub async fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).await?;
        let config = serde_json::from_str(&content)
            .map_err(|e| CrustError::ConfigInvalid(format!("{}: {}", path.display(), e)))?;
        Ok(Some(config))
    }

    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;

        Ok(())
    }
}

/// Per-invocation values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub language: Option<String>,
    pub plan_command: Option<String>,
    pub model: Option<String>,
    /// Plan text comes from a file or stdin, so no command is needed
    pub has_plan_input: bool,
}

/// Fully resolved configuration for one command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub plan_command: Option<String>,
    pub language: String,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout: u64,
}

impl Settings {
    /// Merges the file (if any) with the overrides.
    ///
    /// Without a file the overrides must name an API key and a way to get the
    /// plan, otherwise the result is [`CrustError::ConfigMissing`].
    pub fn resolve(file: Option<Config>, overrides: &ConfigOverrides, path: &Path) -> Result<Self> {
        let file = match file {
            Some(file) => file,
            None => {
                let runnable = overrides.api_key.is_some()
                    && (overrides.plan_command.is_some() || overrides.has_plan_input);
                if !runnable {
                    return Err(CrustError::ConfigMissing {
                        path: path.to_path_buf(),
                    });
                }
                Config::new(String::new(), String::new(), String::new())
            }
        };

        let api_key = overrides
            .api_key
            .clone()
            .unwrap_or(file.openai_key);
        if api_key.trim().is_empty() {
            return Err(CrustError::ConfigInvalid("no OpenAI API key configured".to_string()));
        }

        let plan_command = overrides
            .plan_command
            .clone()
            .or(Some(file.terraform_plan_command))
            .filter(|command| !command.trim().is_empty());
        if plan_command.is_none() && !overrides.has_plan_input {
            return Err(CrustError::ConfigInvalid("no terraform plan command configured".to_string()));
        }

        let language = overrides
            .language
            .clone()
            .unwrap_or(file.language);
        let language = if language.trim().is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language
        };

        let model = overrides
            .model
            .clone()
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            plan_command,
            language,
            model,
            base_url: file.base_url,
            timeout: file.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}
