//! High Aura CLI - a private, offline personal log.
//!
//! This is the presentation layer: it routes commands to the core
//! library and formats the results. All persistence, crypto, and mode
//! logic lives in `aura-core`.

mod app;
mod cli;
mod commands;
mod config;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{
    AudioCommands, Cli, Commands, ContractCommands, EventCommands, PhotoCommands,
    SettingsCommands, StrictCommands,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init => {
            let path = config::resolve_db_path(cli.db.as_deref())?;
            let db = app::open_db(&cli)?;
            // Materialize the default settings record on first run.
            db.settings().read()?;

            let config_path = config::default_config_path()?;
            if !config_path.exists() {
                config::write_config(&config_path, &config::AuraConfig::new(path.clone()))?;
            }

            if !cli.quiet {
                println!("Initialized High Aura at {}", path.display());
            }
        }

        Commands::Status => {
            let db = app::open_db(&cli)?;
            commands::status::run(&db, cli.quiet)?;
        }

        Commands::Event(command) => {
            let db = app::open_db(&cli)?;
            match command {
                EventCommands::Add { event_type, data } => {
                    commands::events::add(&db, event_type, data.as_deref(), cli.quiet)?;
                }
                EventCommands::List { since, json } => {
                    commands::events::list(&db, since.as_deref(), *json)?;
                }
            }
        }

        Commands::Mood {
            energy,
            stress,
            focus,
            libido,
        } => {
            let db = app::open_db(&cli)?;
            commands::events::mood(&db, *energy, *stress, *focus, *libido, cli.quiet)?;
        }

        Commands::Strict(command) => {
            let db = app::open_db(&cli)?;
            match command {
                StrictCommands::On => commands::strict::on(&db, cli.quiet)?,
                StrictCommands::Exit { pin } => {
                    commands::strict::exit(&db, pin.as_deref(), cli.quiet)?;
                }
                StrictCommands::SetPin { pin } => {
                    commands::strict::set_pin(&db, pin.as_deref(), cli.quiet)?;
                }
            }
        }

        Commands::Violation { kind } => {
            let db = app::open_db(&cli)?;
            commands::strict::violation(&db, kind, cli.quiet)?;
        }

        Commands::Contract(command) => {
            let db = app::open_db(&cli)?;
            match command {
                ContractCommands::Sign => commands::contract::sign(&db, cli.quiet)?,
                ContractCommands::Renew => commands::contract::renew(&db, cli.quiet)?,
                ContractCommands::Status => commands::contract::status(&db)?,
            }
        }

        Commands::Audio(command) => {
            let db = app::open_db(&cli)?;
            match command {
                AudioCommands::Upload { file, mime } => {
                    commands::media::audio_upload(&db, file, mime.as_deref(), cli.quiet)?;
                }
                AudioCommands::Arm => commands::media::audio_arm(&db, cli.quiet)?,
                AudioCommands::Toggle => commands::media::audio_toggle(&db, cli.quiet)?,
            }
        }

        Commands::Photo(command) => {
            let db = app::open_db(&cli)?;
            match command {
                PhotoCommands::Add { kind, file } => {
                    commands::media::photo_add(&db, kind, file, cli.quiet)?;
                }
                PhotoCommands::Timeline { kind, limit } => {
                    commands::media::photo_timeline(&db, kind, *limit)?;
                }
            }
        }

        Commands::Settings(command) => {
            let db = app::open_db(&cli)?;
            match command {
                SettingsCommands::Show => commands::settings::show(&db)?,
                SettingsCommands::Set { field, value } => {
                    commands::settings::set(&db, field, value, cli.quiet)?;
                }
            }
        }

        Commands::Export { out } => {
            let db = app::open_db(&cli)?;
            commands::backup::export(&db, out.as_deref(), cli.quiet)?;
        }

        Commands::Import { file } => {
            let db = app::open_db(&cli)?;
            commands::backup::import(&db, file, cli.quiet)?;
        }

        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            generate(*shell, &mut command, name, &mut std::io::stdout());
        }
    }

    Ok(())
}
