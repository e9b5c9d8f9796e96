use rolemap_core::{DEFAULT_ATTRIBUTES_KEY, Result, RoleError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_environment_file")]
    pub environment_file: String,
    #[serde(default = "default_attributes_key")]
    pub attributes_key: String,
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_environment_file() -> String {
    "environment.yml".to_string()
}

fn default_attributes_key() -> String {
    DEFAULT_ATTRIBUTES_KEY.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment_file: default_environment_file(),
            attributes_key: default_attributes_key(),
            format: OutputFormat::default(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional file, overridden by `ROLEMAP_*`
    /// environment variables.
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(::config::Environment::with_prefix("ROLEMAP"))
            .build()
            .map_err(|e| RoleError::Config(e.to_string()))?;

        let settings: Settings = settings
            .try_deserialize()
            .map_err(|e| RoleError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.environment_file.trim().is_empty() {
            return Err(RoleError::Config(
                "environment_file cannot be empty".to_string(),
            ));
        }
        if self.attributes_key.trim().is_empty() {
            return Err(RoleError::Config(
                "attributes_key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
