use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Base configuration file
            .add_source(config::File::with_name("config/default").required(false))
            // Environment-specific overrides, defaulting to 'development'
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SKYLANE__DATABASE__URL=...`
            .add_source(config::Environment::with_prefix("SKYLANE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
