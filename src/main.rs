use std::process::ExitCode;

use dirserve::{config, logger, server};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg)?;

    let root = std::env::current_dir()?;

    // One thread: connections are accepted and served strictly in sequence
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(server::serve(server::DEFAULT_PORT, &root, &cfg))?;
    Ok(())
}
