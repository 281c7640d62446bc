use concierge_core::config::{AppConfig, LoadOptions};
use concierge_core::{ActionGroupDefinition, Domain};

use crate::commands::CommandResult;

/// Prints the action-group definition of one domain, or of all of them as a
/// JSON array, using the configured action-group names.
pub fn run(domain: Option<&str>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "schema",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let definition = |domain: Domain| -> ActionGroupDefinition {
        domain.table().definition(config.action_groups.name_for(domain))
    };

    let rendered = match domain {
        Some(raw) => match raw.parse::<Domain>() {
            Ok(domain) => serde_json::to_string_pretty(&definition(domain)),
            Err(error) => {
                return CommandResult::failure("schema", "unknown_domain", error.to_string(), 7);
            }
        },
        None => {
            let all: Vec<ActionGroupDefinition> = Domain::ALL.into_iter().map(definition).collect();
            serde_json::to_string_pretty(&all)
        }
    };

    match rendered {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("schema", "serialization", error.to_string(), 10),
    }
}
