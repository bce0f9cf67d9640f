//! Connection settings for the tabular serializer.
//!
//! Settings are read once at start-up and then handed by reference to every
//! serializer call. Sources, later ones overriding earlier ones:
//! * an optional settings file (TOML, YAML, JSON, INI, ... by extension);
//! * environment variables prefixed `SHAPELESS_`, with `__` separating
//!   sections from keys, e.g. `SHAPELESS_CONNECTION__URL`.
//!
//! ```toml
//! [connection]
//! driver = "sqlite"
//! url = "data/app.db"
//! username = "app"
//! password = "secret"
//!
//! [render]
//! escape = false
//! ```

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::serializer::Rendering;

pub const ENV_PREFIX: &str = "SHAPELESS";

/// Driver identifier, endpoint, principal and secret.
#[derive(Clone, Deserialize)]
pub struct ConnectionSettings {
    pub driver: String,
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("driver", &self.driver)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderSettings {
    /// Escape quotes, backslashes and control characters in record text.
    #[serde(default)]
    pub escape: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub connection: ConnectionSettings,
    #[serde(default)]
    pub render: RenderSettings,
}

impl Settings {
    pub fn new(driver: &str, url: &str, username: &str, password: &str) -> Self {
        Self {
            connection: ConnectionSettings {
                driver: driver.to_string(),
                url: url.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            },
            render: RenderSettings::default(),
        }
    }

    /// SQLite settings for a database file (or `:memory:`).
    pub fn sqlite(url: &str) -> Self {
        Self::new("sqlite", url, "", "")
    }

    pub fn with_rendering(mut self, rendering: Rendering) -> Self {
        self.render.escape = rendering == Rendering::Escaped;
        self
    }

    /// Loads settings from an optional file, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );
        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn rendering(&self) -> Rendering {
        if self.render.escape { Rendering::Escaped } else { Rendering::Raw }
    }
}
