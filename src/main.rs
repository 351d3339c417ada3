//! Servex CLI - expose build-settings server credentials as session properties.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use servex::cli::{Cli, Commands, ServerCommands};
use servex::commands::{self, Output};

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = run_command(cli.command, cli.settings, human) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run_command(
    command: Commands,
    settings: Option<PathBuf>,
    human: bool,
) -> Result<(), servex::Error> {
    match command {
        Commands::Resolve {
            define,
            show_secrets,
        } => {
            let result = commands::resolve(settings, &define, show_secrets)?;
            output(&result, human);
        }
        Commands::Servers { command } => match command {
            ServerCommands::List => {
                let result = commands::servers_list(settings)?;
                output(&result, human);
            }
            ServerCommands::Show { id, show_secrets } => {
                let result = commands::servers_show(settings, &id, show_secrets)?;
                output(&result, human);
            }
        },
    }
    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
