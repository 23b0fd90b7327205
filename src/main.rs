use clap::Parser;
use pipeshell::cli::ShellArgs;
use pipeshell::config::ShellConfig;
use pipeshell::{logging, run_shell};
use std::process;

fn main() {
    let args = ShellArgs::parse();
    let config = ShellConfig::from_env().apply_args(&args);

    if let Err(e) = logging::init_logging(&config) {
        eprintln!("{}", e);
    }

    match run_shell(&config) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
