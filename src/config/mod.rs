pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_optional_url, validate_path, validate_url, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_SESSION_FILE: &str = ".pathplan/session.json";

/// Where the analysis service lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Local,
    Hosted,
}

impl Profile {
    pub fn base_url(&self) -> &'static str {
        match self {
            Profile::Local => "http://127.0.0.1:8000",
            Profile::Hosted => "https://pathplan-ai-backend-1.onrender.com",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pathplan")]
#[command(about = "Resume to roadmap career planning against the PathPlan analysis service")]
pub struct CliConfig {
    /// Base URL of the analysis service (overrides --profile)
    #[arg(long, env = "PATHPLAN_API_BASE_URL", global = true)]
    pub api_base_url: Option<String>,

    /// Deployment to talk to when no base URL is given
    #[arg(long, value_enum, global = true)]
    pub profile: Option<Profile>,

    /// JSON file holding this session's stored results
    #[arg(long, env = "PATHPLAN_SESSION_FILE", global = true)]
    pub session_file: Option<String>,

    /// Optional TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upload a resume and assess capabilities
    Analyze {
        /// Resume document (PDF)
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Leave blank to let the service infer suitable roles
        #[arg(long, default_value = "")]
        target_role: String,
        #[arg(long)]
        github: Option<String>,
        #[arg(long)]
        linkedin: Option<String>,
    },
    /// Show safe, stretch and aspirational opportunities
    Opportunities,
    /// Choose the role the roadmap should target
    Select { role: String },
    /// Generate a roadmap for a specific role
    Plan {
        #[arg(long)]
        goal: Option<String>,
    },
    /// Show the active roadmap
    Roadmap,
    /// Review GitHub and LinkedIn presence
    Insight {
        #[arg(long, default_value = "")]
        github: String,
        #[arg(long, default_value = "")]
        linkedin: String,
        #[arg(long, default_value = "")]
        target_role: String,
    },
    /// Show which session slots are filled
    Status,
    /// Go back to intake
    Restart {
        /// Also drop every stored result
        #[arg(long)]
        clear: bool,
    },
}

/// Effective settings after merging defaults, the TOML file and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub session_file: String,
    pub verbose: bool,
    pub log_format: LogFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: Profile::default().base_url().to_string(),
            session_file: DEFAULT_SESSION_FILE.to_string(),
            verbose: false,
            log_format: LogFormat::default(),
        }
    }
}

impl CliConfig {
    pub fn resolve(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };
        Ok(self.resolve_with(file.as_ref()))
    }

    /// Flags beat the file, the file beats built-in defaults.
    pub fn resolve_with(&self, file: Option<&TomlConfig>) -> Settings {
        let mut settings = Settings::default();

        if let Some(file) = file {
            file.apply_to(&mut settings);
        }

        if let Some(profile) = self.profile {
            settings.api_base_url = profile.base_url().to_string();
        }
        if let Some(url) = &self.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(path) = &self.session_file {
            settings.session_file = path.clone();
        }
        if let Some(format) = self.log_format {
            settings.log_format = format;
        }
        settings.verbose |= self.verbose;

        settings
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Analyze {
                github, linkedin, ..
            } => {
                validate_optional_url("github", github.as_deref())?;
                validate_optional_url("linkedin", linkedin.as_deref())
            }
            Command::Insight {
                github, linkedin, ..
            } => {
                validate_optional_url("github", Some(github))?;
                validate_optional_url("linkedin", Some(linkedin))
            }
            _ => Ok(()),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_path("session_file", &self.session_file)
    }
}

impl ConfigProvider for Settings {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn session_file(&self) -> &str {
        &self.session_file
    }
}
