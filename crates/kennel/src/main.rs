//! `kennel` - CLI for the kennel record service
//!
//! Runs the HTTP service and offers a few offline commands for inspecting
//! configuration and records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use anyhow::Context;
use clap::Parser;

use kennel::cli::{Cli, Command, ConfigCommand, RecordCommand};
use kennel::{init_logging, Config, Record, RecordName, RecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Serve(serve_cmd) => {
            serve_cmd.apply(&mut config);
            config.validate()?;
            kennel::serve(&config).await?;
        }
        Command::Record(record_cmd) => handle_record(&config, record_cmd)?,
        Command::Config(config_cmd) => handle_config(&config, config_cmd)?,
    }
    Ok(())
}

fn handle_record(config: &Config, cmd: RecordCommand) -> anyhow::Result<()> {
    let store = RecordStore::open(
        config.data_dir(),
        config.storage.extension.clone(),
        config.storage.write_mode,
    )?;

    match cmd {
        RecordCommand::Show { name } => {
            let name = RecordName::parse(name)?;
            let record = store.load(&name)?;
            std::io::stdout().write_all(&record.body)?;
        }
        RecordCommand::Save { name, body } => {
            let name = RecordName::parse(name)?;
            let path = store.path_for(&name);
            store.save(&Record::new(name, body))?;
            println!("Saved {}", path.display());
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Bind address:       {}", config.server.bind_address);
                println!("  Max body bytes:     {}", config.server.max_body_bytes);
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Extension:          {}", config.storage.extension);
                println!("  Write mode:         {:?}", config.storage.write_mode);
                println!();
                println!("[Render]");
                match &config.render.templates_dir {
                    Some(dir) => println!("  Templates:          {}", dir.display()),
                    None => println!("  Templates:          built-in"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
