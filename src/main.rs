// main.rs
mod cli;
mod status;

use anyhow::Result;
use clap::Parser;

use cli::{Args, Commands, SpeciesCommands, UserCommands};
use petkeeper::{Clock, ManualClock, SpeciesDraft, SystemClock};

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let clock: Box<dyn Clock> = match args.at {
        Some(at) => Box::new(ManualClock::new(at)),
        None => Box::new(SystemClock),
    };
    let data_dir = args.data_dir;

    match args.command {
        Commands::User { command } => match command {
            UserCommands::Add { display_name } => cli::handle_user_add(&display_name, data_dir),
            UserCommands::List => cli::handle_user_list(data_dir),
        },
        Commands::Species { command } => match command {
            SpeciesCommands::Add {
                type_name,
                hunger_rate,
                sadness_rate,
                max_hunger,
                min_hunger,
                min_happiness,
                max_happiness,
            } => {
                let draft = SpeciesDraft {
                    type_name,
                    hunger_per_second: hunger_rate,
                    sadness_per_second: sadness_rate,
                    max_hunger,
                    min_hunger,
                    min_happiness,
                    max_happiness,
                };
                cli::handle_species_add(draft, data_dir)
            }
            SpeciesCommands::List => cli::handle_species_list(data_dir),
        },
        Commands::Adopt {
            user_id,
            animal_id,
            name,
        } => cli::handle_adopt(user_id, animal_id, name, data_dir, clock.as_ref()),
        Commands::Release { user_id, animal_id } => {
            cli::handle_release(user_id, animal_id, data_dir)
        }
        Commands::Show {
            user_id,
            animal_id,
            json,
        } => status::handle_show(user_id, animal_id, json, data_dir, clock.as_ref()),
        Commands::Feed {
            user_id,
            animal_id,
            amount,
        } => cli::handle_feed(user_id, animal_id, amount, data_dir, clock.as_ref()),
        Commands::Stroke {
            user_id,
            animal_id,
            amount,
        } => cli::handle_stroke(user_id, animal_id, amount, data_dir, clock.as_ref()),
    }
}
