use clap::Parser;

mod cli;
mod commands;
mod domain;
mod error;
mod logging;
mod services;

use cli::Cli;
use services::policy::{load_policy, Rules};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        let code = error::error_code(&e);
        tracing::debug!(code, error = ?e, "command failed");
        services::output::print_error(cli.json, code, &e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let policy = load_policy(cli.policy.as_deref())?;
    let rules = Rules::from_policy(&policy)?;

    if commands::handle_inspect_commands(cli, &rules)? {
        return Ok(());
    }
    if commands::handle_env_commands(cli, &rules)? {
        return Ok(());
    }
    commands::handle_deploy_commands(cli, &rules)?;
    Ok(())
}
