use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::catalog::Domain;

pub const CONFIG_FILE_NAME: &str = "concierge.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub action_groups: ActionGroupConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Logical table name; records of different tables never collide.
    pub table: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

/// Action-group name the agent runtime uses for each domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionGroupConfig {
    pub restaurant: String,
    pub reservation: String,
    pub leave: String,
    pub shortlet: String,
    pub ticket: String,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    Sqlite,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub store_backend: Option<StoreBackend>,
    pub store_table: Option<String>,
    pub database_url: Option<String>,
    pub server_port: Option<u16>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: StoreBackend::Sqlite,
                table: "steakhouse_bookings".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://concierge.db?mode=rwc".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
            },
            action_groups: ActionGroupConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl Default for ActionGroupConfig {
    fn default() -> Self {
        Self {
            restaurant: "RestaurantActionGroup".to_string(),
            reservation: "ReservationActionGroup".to_string(),
            leave: "HrActionGroup".to_string(),
            shortlet: "ShortletActionGroup".to_string(),
            ticket: "TicketActionGroup".to_string(),
        }
    }
}

impl ActionGroupConfig {
    pub fn name_for(&self, domain: Domain) -> &str {
        match domain {
            Domain::Restaurant => &self.restaurant,
            Domain::Reservation => &self.reservation,
            Domain::Leave => &self.leave,
            Domain::Shortlet => &self.shortlet,
            Domain::Ticket => &self.ticket,
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unsupported store backend `{other}` (expected memory|sqlite)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(store) = patch.store {
            if let Some(backend) = store.backend {
                self.store.backend = backend;
            }
            if let Some(table) = store.table {
                self.store.table = table;
            }
        }

        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(groups) = patch.action_groups {
            let slots = [
                (groups.restaurant, &mut self.action_groups.restaurant),
                (groups.reservation, &mut self.action_groups.reservation),
                (groups.leave, &mut self.action_groups.leave),
                (groups.shortlet, &mut self.action_groups.shortlet),
                (groups.ticket, &mut self.action_groups.ticket),
            ];
            for (value, slot) in slots {
                if let Some(value) = value {
                    *slot = value;
                }
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CONCIERGE_STORE_BACKEND") {
            self.store.backend = value.parse()?;
        }
        if let Some(value) = read_env("CONCIERGE_STORE_TABLE") {
            self.store.table = value;
        }

        if let Some(value) = read_env("CONCIERGE_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("CONCIERGE_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("CONCIERGE_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("CONCIERGE_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("CONCIERGE_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CONCIERGE_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("CONCIERGE_SERVER_PORT") {
            self.server.port = parse_u16("CONCIERGE_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("CONCIERGE_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("CONCIERGE_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        for domain in Domain::ALL {
            let key = action_group_env_key(domain);
            if let Some(value) = read_env(&key) {
                *self.action_groups.slot_mut(domain) = value;
            }
        }

        let log_level =
            read_env("CONCIERGE_LOGGING_LEVEL").or_else(|| read_env("CONCIERGE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("CONCIERGE_LOGGING_FORMAT").or_else(|| read_env("CONCIERGE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(backend) = overrides.store_backend {
            self.store.backend = backend;
        }
        if let Some(table) = overrides.store_table {
            self.store.table = table;
        }
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_store(&self.store)?;
        validate_database(&self.database)?;
        validate_server(&self.server)?;
        validate_action_groups(&self.action_groups)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

impl ActionGroupConfig {
    fn slot_mut(&mut self, domain: Domain) -> &mut String {
        match domain {
            Domain::Restaurant => &mut self.restaurant,
            Domain::Reservation => &mut self.reservation,
            Domain::Leave => &mut self.leave,
            Domain::Shortlet => &mut self.shortlet,
            Domain::Ticket => &mut self.ticket,
        }
    }
}

pub fn action_group_env_key(domain: Domain) -> String {
    format!("CONCIERGE_ACTION_GROUP_{}", domain.slug().to_ascii_uppercase())
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), PathBuf::from("config").join(CONFIG_FILE_NAME)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_store(store: &StoreConfig) -> Result<(), ConfigError> {
    let table = store.table.trim();
    if table.is_empty() {
        return Err(ConfigError::Validation("store.table must not be empty".to_string()));
    }

    let valid = table.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'));
    if !valid {
        return Err(ConfigError::Validation(format!(
            "store.table `{table}` may only contain ASCII letters, digits, `_`, `-` and `.`"
        )));
    }

    Ok(())
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_action_groups(groups: &ActionGroupConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for domain in Domain::ALL {
        let name = groups.name_for(domain).trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(format!(
                "action_groups.{} must not be empty",
                domain.slug()
            )));
        }
        if !seen.insert(name) {
            return Err(ConfigError::Validation(format!(
                "action_groups.{} reuses action group name `{name}`",
                domain.slug()
            )));
        }
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    store: Option<StorePatch>,
    database: Option<DatabasePatch>,
    server: Option<ServerPatch>,
    action_groups: Option<ActionGroupPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    backend: Option<StoreBackend>,
    table: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ActionGroupPatch {
    restaurant: Option<String>,
    reservation: Option<String>,
    leave: Option<String>,
    shortlet: Option<String>,
    ticket: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, StoreBackend,
    };
    use crate::domain::catalog::Domain;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_validate_without_any_file() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.store.backend == StoreBackend::Sqlite, "sqlite should be the default")?;
        ensure(config.store.table == "steakhouse_bookings", "default table name")?;
        ensure(
            config.action_groups.name_for(Domain::Leave) == "HrActionGroup",
            "leave domain should default to the HR action group",
        )?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "compact log format")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_CONCIERGE_TABLE", "hotel_bookings");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("concierge.toml");
            fs::write(
                &path,
                r#"
[store]
backend = "memory"
table = "${TEST_CONCIERGE_TABLE}"

[action_groups]
ticket = "SupportTicketGroup"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.store.table == "hotel_bookings", "table should be interpolated")?;
            ensure(config.store.backend == StoreBackend::Memory, "backend from file")?;
            ensure(
                config.action_groups.ticket == "SupportTicketGroup",
                "ticket group name from file",
            )?;
            ensure(
                config.action_groups.reservation == "ReservationActionGroup",
                "untouched groups keep defaults",
            )
        })();

        clear_vars(&["TEST_CONCIERGE_TABLE"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CONCIERGE_DATABASE_URL", "sqlite://from-env.db");
        env::set_var("CONCIERGE_ACTION_GROUP_SHORTLET", "StaysFromEnv");
        env::set_var("CONCIERGE_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("concierge.toml");
            fs::write(
                &path,
                r#"
[database]
url = "sqlite://from-file.db"

[action_groups]
shortlet = "StaysFromFile"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    database_url: Some("sqlite://from-override.db".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.database.url == "sqlite://from-override.db",
                "override database url should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "env log format alias should win over default",
            )?;
            ensure(
                config.action_groups.shortlet == "StaysFromEnv",
                "env action group should win over file",
            )
        })();

        clear_vars(&[
            "CONCIERGE_DATABASE_URL",
            "CONCIERGE_ACTION_GROUP_SHORTLET",
            "CONCIERGE_LOG_FORMAT",
        ]);
        result
    }

    #[test]
    fn validation_rejects_unsafe_table_names() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                store_table: Some("bookings; drop table record".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".into()),
            Err(error) => error,
        };

        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("store.table")
        );
        ensure(has_message, "validation failure should mention store.table")
    }

    #[test]
    fn validation_rejects_duplicate_action_group_names() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CONCIERGE_ACTION_GROUP_TICKET", "HrActionGroup");

        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("duplicate action group names should be rejected".to_string()),
            Err(ConfigError::Validation(message)) => {
                ensure(message.contains("action_groups.ticket"), "message names the slot")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
        };

        clear_vars(&["CONCIERGE_ACTION_GROUP_TICKET"]);
        result
    }

    #[test]
    fn invalid_numeric_env_override_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("CONCIERGE_SERVER_PORT", "eighty");

        let result = match AppConfig::load(LoadOptions::default()) {
            Err(ConfigError::InvalidEnvOverride { key, .. }) => {
                ensure(key == "CONCIERGE_SERVER_PORT", "error should name the variable")
            }
            Err(other) => Err(format!("unexpected error: {other}")),
            Ok(_) => Err("non-numeric port should fail".to_string()),
        };

        clear_vars(&["CONCIERGE_SERVER_PORT"]);
        result
    }

    #[test]
    fn missing_required_file_is_an_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let result = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "absent required file should fail",
        )
    }
}
