use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "petkeeper")]
#[command(version, about = "Keep virtual pets fed and happy")]
pub struct Args {
    /// Data directory holding config.json and registry.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Evaluate at this RFC 3339 instant instead of the system clock
    #[arg(long, global = true)]
    pub at: Option<DateTime<Utc>>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage animal species
    Species {
        #[command(subcommand)]
        command: SpeciesCommands,
    },
    /// Give a user an animal of the given species
    Adopt {
        user_id: u32,
        animal_id: u32,
        /// Display name for the pet
        #[arg(long)]
        name: Option<String>,
    },
    /// Take an animal away from a user
    Release { user_id: u32, animal_id: u32 },
    /// Show current hunger and happiness
    Show {
        user_id: u32,
        animal_id: Option<u32>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Lower a pet's hunger
    Feed {
        user_id: u32,
        animal_id: u32,
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },
    /// Raise a pet's happiness
    Stroke {
        user_id: u32,
        animal_id: u32,
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user by display name
    Add { display_name: String },
    /// List all users
    List,
}

#[derive(Subcommand)]
pub enum SpeciesCommands {
    /// Register a species
    Add {
        type_name: String,
        /// Hunger gained per second
        #[arg(long)]
        hunger_rate: Decimal,
        /// Happiness lost per second
        #[arg(long)]
        sadness_rate: Decimal,
        #[arg(long, allow_negative_numbers = true)]
        max_hunger: Decimal,
        /// Lowest hunger feeding can reach (defaults from config, then -max_hunger)
        #[arg(long, allow_negative_numbers = true)]
        min_hunger: Option<Decimal>,
        #[arg(long, allow_negative_numbers = true)]
        min_happiness: Decimal,
        #[arg(long, allow_negative_numbers = true)]
        max_happiness: Decimal,
    },
    /// List all species
    List,
}
