use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;
use rust_decimal::Decimal;

use petkeeper::config::Config;
use petkeeper::{Clock, Registry, SpeciesDraft};

pub use commands::{Args, Commands, SpeciesCommands, UserCommands};

mod commands;

/// Config plus the registry it points at, loaded for one command.
pub struct Session {
    config: Config,
    pub registry: Registry,
}

impl Session {
    pub fn open(data_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::new(data_dir)?;
        let path = config.registry_file();
        let mut registry = Registry::load(&path)
            .with_context(|| format!("Failed to load registry from {}", path.display()))?;

        let seeded = registry
            .seed_species(&config.starter_species, config.default_min_hunger)
            .context("Invalid starter species in config.json")?;
        if seeded > 0 {
            log::info!("seeded {seeded} starter species");
            registry.save(&path).context("Failed to write registry")?;
        }

        Ok(Self { config, registry })
    }

    pub fn save(&self) -> Result<()> {
        let path = self.config.registry_file();
        self.registry
            .save(&path)
            .with_context(|| format!("Failed to write registry to {}", path.display()))
    }
}

pub fn handle_user_add(display_name: &str, data_dir: Option<PathBuf>) -> Result<()> {
    let mut session = Session::open(data_dir)?;
    let user = session.registry.add_user(display_name)?.clone();
    session.save()?;

    println!("{} {} ({})", "Added user".green(), user.display_name, user.id);
    Ok(())
}

pub fn handle_user_list(data_dir: Option<PathBuf>) -> Result<()> {
    let session = Session::open(data_dir)?;
    let users: Vec<_> = session.registry.users().collect();

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("{} ({}):", "Users".cyan().bold(), users.len());
    for user in users {
        println!("  {:>4}  {}", user.id, user.display_name);
    }
    Ok(())
}

pub fn handle_species_add(draft: SpeciesDraft, data_dir: Option<PathBuf>) -> Result<()> {
    let mut session = Session::open(data_dir)?;
    let default_min_hunger = session.config.default_min_hunger;
    let species = session
        .registry
        .add_species(draft, default_min_hunger)?
        .clone();
    session.save()?;

    println!("{} {} ({})", "Added species".green(), species.type_name(), species.id());
    Ok(())
}

pub fn handle_species_list(data_dir: Option<PathBuf>) -> Result<()> {
    let session = Session::open(data_dir)?;

    println!("{}", "Species".cyan().bold());
    for species in session.registry.all_species() {
        println!(
            "  {:>4}  {:<12} hunger +{}/s [{}, {}]  happiness -{}/s [{}, {}]",
            species.id(),
            species.type_name(),
            species.hunger_per_second(),
            species.min_hunger(),
            species.max_hunger(),
            species.sadness_per_second(),
            species.min_happiness(),
            species.max_happiness()
        );
    }
    Ok(())
}

pub fn handle_adopt(
    user_id: u32,
    animal_id: u32,
    name: Option<String>,
    data_dir: Option<PathBuf>,
    clock: &dyn Clock,
) -> Result<()> {
    let mut session = Session::open(data_dir)?;
    let pet = session.registry.adopt(user_id, animal_id, name, clock.now())?;
    session.save()?;

    println!(
        "{} {}",
        "Adopted".green(),
        crate::status::pet_label(&pet.view(clock.now()))
    );
    Ok(())
}

pub fn handle_release(user_id: u32, animal_id: u32, data_dir: Option<PathBuf>) -> Result<()> {
    let mut session = Session::open(data_dir)?;
    session.registry.release(user_id, animal_id)?;
    session.save()?;

    println!("{} animal {animal_id} from user {user_id}", "Released".yellow());
    Ok(())
}

pub fn handle_feed(
    user_id: u32,
    animal_id: u32,
    amount: Decimal,
    data_dir: Option<PathBuf>,
    clock: &dyn Clock,
) -> Result<()> {
    let mut session = Session::open(data_dir)?;
    let now = clock.now();
    let before = session.registry.pet(user_id, animal_id)?.hunger(now);
    let pet = session.registry.feed(user_id, animal_id, amount, now)?;
    session.save()?;

    println!(
        "{} {}: hunger {} -> {}",
        "Fed".green(),
        crate::status::pet_label(&pet.view(now)),
        before,
        pet.hunger(now)
    );
    Ok(())
}

pub fn handle_stroke(
    user_id: u32,
    animal_id: u32,
    amount: Decimal,
    data_dir: Option<PathBuf>,
    clock: &dyn Clock,
) -> Result<()> {
    let mut session = Session::open(data_dir)?;
    let now = clock.now();
    let before = session.registry.pet(user_id, animal_id)?.happiness(now);
    let pet = session.registry.stroke(user_id, animal_id, amount, now)?;
    session.save()?;

    println!(
        "{} {}: happiness {} -> {}",
        "Stroked".green(),
        crate::status::pet_label(&pet.view(now)),
        before,
        pet.happiness(now)
    );
    Ok(())
}
