use std::fmt::{Debug, Formatter};

use config::{Config, ConfigBuilder, ConfigError, Environment};
use config::builder::DefaultState;
use serde::Deserialize;
use url::Url;

/// Process configuration, read once at startup from the environment
/// (`DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, ...).
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    /// Takes precedence over the `db_*` parts when set.
    pub database_url: Option<String>,
    pub db_workers: usize,
    pub db_pool_size: u32,
    pub bind_address: String,
    pub templates_dir: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_builder(Config::builder().add_source(Environment::default()))
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("db_port", 5432)?
            .set_default("db_workers", 5)?
            .set_default("db_pool_size", 10)?
            .set_default("bind_address", "127.0.0.1:8080")?
            .set_default("templates_dir", "templates")?
            .build()?
            .try_deserialize()
    }

    pub fn database_url(&self) -> Result<String, ConfigError> {
        if let Some(db_url) = &self.database_url {
            return Ok(db_url.clone());
        }

        let invalid = |what: &str| ConfigError::Message(format!("invalid database {what}"));

        let mut url = Url::parse(&format!("postgres://{}:{}", self.db_host, self.db_port))
            .map_err(|_| invalid("host"))?;
        url.set_username(&self.db_user)
            .map_err(|_| invalid("user"))?;
        url.set_password(Some(&self.db_password))
            .map_err(|_| invalid("password"))?;
        url.set_path(&self.db_name);

        Ok(url.to_string())
    }
}

impl Debug for Settings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .field("db_name", &self.db_name)
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("db_workers", &self.db_workers)
            .field("db_pool_size", &self.db_pool_size)
            .field("bind_address", &self.bind_address)
            .field("templates_dir", &self.templates_dir)
            .finish()
    }
}
