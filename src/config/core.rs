use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Toml, Yaml},
};

use super::PairgitConfig;

// Embed the default config at compile time
pub const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

impl PairgitConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        let config: PairgitConfig = Self::figment(custom_config)
            .extract()
            .context("Failed to parse pairgit configuration")?;

        config.validate()?;
        Ok(config)
    }

    fn figment(custom_config: Option<&str>) -> Figment {
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            figment = if custom_path.ends_with(".json") {
                figment.merge(Json::file(custom_path))
            } else if custom_path.ends_with(".yaml") || custom_path.ends_with(".yml") {
                figment.merge(Yaml::file(custom_path))
            } else {
                figment.merge(Toml::file(custom_path))
            };
        } else {
            let user_config = Self::user_config_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(&user_config))
                .merge(Json::file(user_config.replace(".toml", ".json")))
                .merge(Yaml::file(user_config.replace(".toml", ".yaml")))
                .merge(Yaml::file(user_config.replace(".toml", ".yml")))
                // Repository config - support multiple formats
                .merge(Toml::file("pairgit.toml"))
                .merge(Json::file("pairgit.json"))
                .merge(Yaml::file("pairgit.yaml"))
                .merge(Yaml::file("pairgit.yml"));
        }

        // Environment variables always have highest priority
        figment.merge(Env::prefixed("PAIRGIT_").split("__"))
    }

    /// Render the merged configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/pairgit/config.toml"),
            Err(_) => "~/.config/pairgit/config.toml".to_string(),
        }
    }
}
