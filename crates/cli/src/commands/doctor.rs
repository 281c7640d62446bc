use concierge_agent::ActionGroupRegistry;
use concierge_core::config::{AppConfig, LoadOptions};
use concierge_core::Domain;
use concierge_db::open_store;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_store_and_routing(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["store_connectivity", "action_group_routing"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_store_and_routing(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return vec![DoctorCheck {
                name: "store_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            }];
        }
    };

    runtime.block_on(async {
        let handle = match open_store(config).await {
            Ok(handle) => handle,
            Err(error) => {
                return vec![
                    DoctorCheck {
                        name: "store_connectivity",
                        status: CheckStatus::Fail,
                        details: format!("failed to open record store: {error}"),
                    },
                    DoctorCheck {
                        name: "action_group_routing",
                        status: CheckStatus::Skipped,
                        details: "skipped because the record store did not open".to_string(),
                    },
                ];
            }
        };

        let store_check = match handle.store.ping().await {
            Ok(()) => DoctorCheck {
                name: "store_connectivity",
                status: CheckStatus::Pass,
                details: format!(
                    "{:?} store reachable (table `{}`)",
                    config.store.backend, config.store.table
                ),
            },
            Err(error) => DoctorCheck {
                name: "store_connectivity",
                status: CheckStatus::Fail,
                details: format!("record store check failed: {error}"),
            },
        };

        let registry = ActionGroupRegistry::from_config(&config.action_groups, handle.store.clone());
        let unrouted: Vec<&str> = Domain::ALL
            .into_iter()
            .filter(|domain| registry.route(config.action_groups.name_for(*domain)).is_none())
            .map(|domain| domain.slug())
            .collect();
        let routing_check = if unrouted.is_empty() {
            DoctorCheck {
                name: "action_group_routing",
                status: CheckStatus::Pass,
                details: format!("{} action groups routed", registry.len()),
            }
        } else {
            DoctorCheck {
                name: "action_group_routing",
                status: CheckStatus::Fail,
                details: format!("no route for domains: {}", unrouted.join(", ")),
            }
        };

        handle.close().await;
        vec![store_check, routing_check]
    })
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
