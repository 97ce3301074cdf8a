//! Rule Manager CLI - threshold checks and rule tooling.

use clap::Parser;
use rule_manager_cli::commands;
use rule_manager_cli::logging::init_logging;
use rule_manager_cli::{Cli, Command, Config, Formatter};
use tracing::{info, warn};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> rule_manager_cli::Result<()> {
    // Bare invocation runs the sample check and never touches config
    let Some(command) = cli.command else {
        return commands::execute_sample(&Formatter::plain());
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable config, using defaults");
            Config::default()
        }),
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);
    let catalog = config.catalog();

    info!(command = ?command, "dispatching");

    match command {
        Command::Check(args) => commands::execute_check(args, &formatter),
        Command::Validate(args) => commands::execute_validate(args, &catalog, &formatter),
        Command::Describe(args) => commands::execute_describe(args, &catalog, &formatter),
        Command::Draft(args) => commands::execute_draft(args, &catalog, &formatter),
        Command::Fields => commands::execute_fields(&catalog, &formatter),
        Command::Ruleset(args) => commands::execute_ruleset(args, &formatter),
    }
}
