//! figura - inspect settings and exercise a configuration bus from the shell.

use std::{error::Error, process};

use clap::Parser;
use figura::{
    cli::{self, Cli, formatting::format_error},
    tracing_config,
};
use tracing::{Level, span};

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    tracing_config::init(settings.general.log_level)?;
    let _span = span!(Level::INFO, "figura_cli").entered();

    match cli::execute(&args.command, &settings) {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
