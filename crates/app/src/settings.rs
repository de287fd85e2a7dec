//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` next to the binary, then from
//! `PLEDGEWISE__<SECTION>__<KEY>` environment variables, e.g.
//! `PLEDGEWISE__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "PLEDGEWISE";

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("pledgewise.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    /// Empty allows any origin.
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3002,
            database: Database::default(),
            cors_origins: Vec::new(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_sources(File::with_name("settings").required(false), environment())
    }

    fn from_sources<S>(file: S, env: Environment) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
}

#[cfg(test)]
mod tests {
    use config::{FileFormat, Map};

    use super::*;

    fn load(toml: &str, vars: &[(&str, &str)]) -> Settings {
        let env: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_sources(
            File::from_str(toml, FileFormat::Toml),
            environment().source(Some(env)),
        )
        .unwrap()
    }

    #[test]
    fn empty_config_uses_defaults() {
        let settings = load("", &[]);
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 3002);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("pledgewise.db".to_string())
        );
        assert!(settings.server.cors_origins.is_empty());
        assert_eq!(settings.server.max_body_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn file_selects_database() {
        let settings = load(
            r#"
            [app]
            level = "debug"

            [server]
            port = 8080
            database = "memory"
            "#,
            &[],
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database, Database::Memory);

        let settings = load(
            r#"
            [server]
            database = { sqlite = "/var/lib/pledgewise/data.db" }
            "#,
            &[],
        );
        assert_eq!(
            settings.server.database,
            Database::Sqlite("/var/lib/pledgewise/data.db".to_string())
        );
    }

    #[test]
    fn environment_overrides_file() {
        let settings = load(
            "[server]\nport = 8080\n",
            &[
                ("PLEDGEWISE__SERVER__PORT", "9090"),
                (
                    "PLEDGEWISE__SERVER__CORS_ORIGINS",
                    "http://localhost:5173,https://pledgewise.ug",
                ),
            ],
        );
        assert_eq!(settings.server.port, 9090);
        assert_eq!(
            settings.server.cors_origins,
            vec!["http://localhost:5173", "https://pledgewise.ug"]
        );
    }
}
