pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "concierge",
    about = "Concierge operator CLI",
    long_about = "Inspect configuration, check store readiness, apply migrations, export action-group schemas and dispatch invocations by hand.",
    after_help = "Examples:\n  concierge doctor --json\n  concierge schema --domain ticket\n  concierge invoke --domain restaurant --file invocation.json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, record store connectivity and action-group routing")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Print action-group definitions for the agent runtime as JSON")]
    Schema {
        #[arg(long, help = "Only print the definition for this domain")]
        domain: Option<String>,
    },
    #[command(about = "Dispatch one invocation document and print the response envelope")]
    Invoke {
        #[arg(long, help = "Domain whose operation table handles the invocation")]
        domain: String,
        #[arg(long, help = "Read the invocation from this file instead of stdin")]
        file: Option<PathBuf>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Schema { domain } => commands::schema::run(domain.as_deref()),
        Command::Invoke { domain, file } => commands::invoke::run(&domain, file.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
