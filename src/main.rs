use anyhow::Result;
use clap::Parser;
use treepaste::workflow::{self, Outcome};
use treepaste::{cli, clipboard};

fn main() -> Result<()> {
    // Handle daemon mode first. This should stay in main.rs as it's an early exit.
    if clipboard::check_and_run_daemon_if_requested()? {
        return Ok(());
    }

    let cli_args = cli::Cli::parse();
    cli_args.setup_logging();

    // Delegate the main application logic to the workflow module
    if let Outcome::NothingSelected = workflow::run_treepaste(cli_args)? {
        std::process::exit(1);
    }
    Ok(())
}
