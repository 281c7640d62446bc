use std::env;
use std::fs;
use std::path::Path;

use concierge_core::config::{
    action_group_env_key, resolve_config_path, AppConfig, LoadOptions,
};
use concierge_core::Domain;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "store.backend",
        &format!("{:?}", config.store.backend),
        source("store.backend", &["CONCIERGE_STORE_BACKEND"]),
    ));
    lines.push(render_line(
        "store.table",
        &config.store.table,
        source("store.table", &["CONCIERGE_STORE_TABLE"]),
    ));

    lines.push(render_line(
        "database.url",
        &config.database.url,
        source("database.url", &["CONCIERGE_DATABASE_URL"]),
    ));
    lines.push(render_line(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        source("database.max_connections", &["CONCIERGE_DATABASE_MAX_CONNECTIONS"]),
    ));
    lines.push(render_line(
        "database.timeout_secs",
        &config.database.timeout_secs.to_string(),
        source("database.timeout_secs", &["CONCIERGE_DATABASE_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["CONCIERGE_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["CONCIERGE_SERVER_PORT"]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", &["CONCIERGE_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ));

    for domain in Domain::ALL {
        let key_path = format!("action_groups.{}", domain.slug());
        let env_key = action_group_env_key(domain);
        lines.push(render_line(
            &key_path,
            config.action_groups.name_for(domain),
            source(&key_path, &[env_key.as_str()]),
        ));
    }

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["CONCIERGE_LOGGING_LEVEL", "CONCIERGE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["CONCIERGE_LOGGING_FORMAT", "CONCIERGE_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
