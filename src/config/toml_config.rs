use crate::config::{LogFormat, Profile, Settings};
use crate::utils::error::{PathplanError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub service: Option<ServiceConfig>,
    pub session: Option<SessionConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PathplanError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PathplanError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PATHPLAN_API})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PathplanError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// An explicit base URL in the file beats a profile named in the same file.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(service) = &self.service {
            if let Some(profile) = service.profile {
                settings.api_base_url = profile.base_url().to_string();
            }
            if let Some(url) = &service.base_url {
                settings.api_base_url = url.clone();
            }
        }
        if let Some(file) = self.session.as_ref().and_then(|s| s.file.as_ref()) {
            settings.session_file = file.clone();
        }
        if let Some(logging) = &self.logging {
            if let Some(verbose) = logging.verbose {
                settings.verbose = verbose;
            }
            if let Some(format) = logging.format {
                settings.log_format = format;
            }
        }
    }
}
