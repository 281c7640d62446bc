use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use concierge_agent::ActionGroupRegistry;
use concierge_core::config::{AppConfig, LoadOptions};
use concierge_core::{Domain, Invocation};
use concierge_db::open_store;

use crate::commands::CommandResult;

/// Reads one invocation document from `file`, or stdin when no file is given,
/// and dispatches it against `domain` using the configured record store.
pub fn run(domain: &str, file: Option<&Path>) -> CommandResult {
    let raw = match read_input(file) {
        Ok(raw) => raw,
        Err(error) => {
            return CommandResult::failure(
                "invoke",
                "input_read",
                format!("failed to read invocation: {error:#}"),
                8,
            );
        }
    };

    run_with_input(domain, &raw)
}

pub fn run_with_input(domain: &str, raw: &str) -> CommandResult {
    let domain = match domain.parse::<Domain>() {
        Ok(domain) => domain,
        Err(error) => return CommandResult::failure("invoke", "unknown_domain", error.to_string(), 7),
    };

    let invocation: Invocation = match serde_json::from_str(raw) {
        Ok(invocation) => invocation,
        Err(error) => {
            return CommandResult::failure(
                "invoke",
                "malformed_invocation",
                format!("invocation is not valid JSON: {error}"),
                9,
            );
        }
    };

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "invoke",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "invoke",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let handle = open_store(&config)
            .await
            .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
        let registry = ActionGroupRegistry::from_config(&config.action_groups, handle.store.clone());
        let envelope: Result<_, (&'static str, String, u8)> = match registry.for_domain(domain) {
            Some(handler) => Ok(handler.handle(&invocation).await),
            None => Err(("unknown_domain", format!("no handler registered for {domain}"), 7u8)),
        };
        handle.close().await;
        envelope
    });

    match result {
        Ok(envelope) => match serde_json::to_string(&envelope) {
            Ok(output) => CommandResult { exit_code: 0, output },
            Err(error) => CommandResult::failure("invoke", "serialization", error.to_string(), 10),
        },
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("invoke", error_class, message, exit_code)
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("cannot read `{}`", path.display())),
        None => {
            let mut raw = String::new();
            io::stdin().read_to_string(&mut raw).context("cannot read stdin")?;
            Ok(raw)
        }
    }
}
