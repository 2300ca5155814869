use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::*;

use petkeeper::{Clock, PetView};

use crate::cli::Session;

pub fn pet_label(view: &PetView) -> String {
    match &view.animal_name {
        Some(name) => format!("{} the {} ({})", name, view.type_name, view.animal_id),
        None => format!("{} ({})", view.type_name, view.animal_id),
    }
}

pub fn handle_show(
    user_id: u32,
    animal_id: Option<u32>,
    json: bool,
    data_dir: Option<PathBuf>,
    clock: &dyn Clock,
) -> Result<()> {
    let session = Session::open(data_dir)?;
    let now = clock.now();

    let pets = match animal_id {
        Some(animal_id) => vec![session.registry.pet(user_id, animal_id)?],
        None => session.registry.pets_of(user_id)?,
    };
    let views: Vec<PetView> = pets.iter().map(|pet| pet.view(now)).collect();

    if json {
        let out = serde_json::to_string_pretty(&views).context("Failed to serialize pets")?;
        println!("{out}");
        return Ok(());
    }

    let owner = session
        .registry
        .user(user_id)
        .map_or_else(|| user_id.to_string(), |u| u.display_name.clone());
    println!("{} {}", "Pets of".cyan().bold(), owner);

    if views.is_empty() {
        println!("No pets found.");
        return Ok(());
    }

    for (pet, view) in pets.iter().zip(&views) {
        let species = pet.species();
        let hunger = if view.hunger >= species.max_hunger() {
            view.hunger.to_string().red()
        } else {
            view.hunger.to_string().normal()
        };
        let happiness = if view.happiness <= species.min_happiness() {
            view.happiness.to_string().red()
        } else if view.happiness >= species.max_happiness() {
            view.happiness.to_string().green()
        } else {
            view.happiness.to_string().normal()
        };

        println!("  {}", pet_label(view).bold());
        println!("    Hunger:    {} / {}", hunger, species.max_hunger());
        println!(
            "    Happiness: {} [{}, {}]",
            happiness, species.min_happiness(), species.max_happiness()
        );
    }

    Ok(())
}
