use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{OwnershipRecord, Pet, PetError, Result, SpeciesDraft, SpeciesProfile};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub display_name: String,
}

/// Users, species and ownership records, persisted as one JSON document.
///
/// This is the collaborator that loads [`Pet`]s and writes their snapshots
/// back. Every mutation goes through `&mut self`, so one registry is one writer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    users: BTreeMap<u32, User>,
    #[serde(default)]
    species: BTreeMap<u32, SpeciesProfile>,
    #[serde(default)]
    ownerships: Vec<OwnershipRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no registry at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let registry: Registry = serde_json::from_str(&content)?;
        log::debug!(
            "loaded registry: {} users, {} species, {} pets",
            registry.users.len(),
            registry.species.len(),
            registry.ownerships.len()
        );
        Ok(registry)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    // Users

    pub fn add_user(&mut self, display_name: &str) -> Result<&User> {
        // Don't want odd spaces at the end
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(PetError::invalid("Display name cannot be empty"));
        }

        let lowered = display_name.to_lowercase();
        if self
            .users
            .values()
            .any(|u| u.display_name.to_lowercase() == lowered)
        {
            return Err(PetError::duplicate("User already exists"));
        }

        let id = next_id(&self.users)?;
        log::info!("added user {id} ({display_name})");
        Ok(&*self.users.entry(id).or_insert(User {
            id,
            display_name: display_name.to_string(),
        }))
    }

    pub fn user(&self, id: u32) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    // Species

    pub fn add_species(
        &mut self,
        draft: SpeciesDraft,
        default_min_hunger: Option<Decimal>,
    ) -> Result<&SpeciesProfile> {
        let id = next_id(&self.species)?;
        let profile = SpeciesProfile::from_draft(id, draft, default_min_hunger)?;

        if self.species.values().any(|s| s.is_type(profile.type_name())) {
            return Err(PetError::duplicate("Animal of this type already exists"));
        }

        log::info!("added species {id} ({})", profile.type_name());
        Ok(&*self.species.entry(id).or_insert(profile))
    }

    /// Register every draft whose type is not known yet. Returns how many were added.
    pub fn seed_species(
        &mut self,
        drafts: &[SpeciesDraft],
        default_min_hunger: Option<Decimal>,
    ) -> Result<usize> {
        let mut added = 0;
        for draft in drafts {
            if self.species.values().any(|s| s.is_type(&draft.type_name)) {
                continue;
            }
            self.add_species(draft.clone(), default_min_hunger)?;
            added += 1;
        }
        Ok(added)
    }

    pub fn species(&self, id: u32) -> Option<&SpeciesProfile> {
        self.species.get(&id)
    }

    pub fn all_species(&self) -> impl Iterator<Item = &SpeciesProfile> {
        self.species.values()
    }

    // Ownership

    pub fn adopt(
        &mut self,
        user_id: u32,
        animal_id: u32,
        animal_name: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Pet> {
        if !self.users.contains_key(&user_id) {
            return Err(PetError::not_found("User ID does not exist"));
        }
        let species = self
            .species
            .get(&animal_id)
            .ok_or_else(|| PetError::not_found("Animal ID does not exist"))?;

        if self.position(user_id, animal_id).is_some() {
            return Err(PetError::duplicate(format!(
                "User already owns '{}'",
                species.type_name()
            )));
        }

        let animal_name = animal_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        let record = OwnershipRecord::new(user_id, animal_id, animal_name, now);
        log::info!("user {user_id} adopted a {} ({animal_id})", species.type_name());

        let pet = Pet::new(species.clone(), record.clone());
        self.ownerships.push(record);
        Ok(pet)
    }

    /// Load one pet with its species profile attached.
    pub fn pet(&self, user_id: u32, animal_id: u32) -> Result<Pet> {
        let index = self
            .position(user_id, animal_id)
            .ok_or_else(|| PetError::not_found("User/Animal combination does not exist"))?;
        self.join(&self.ownerships[index])
    }

    /// Every pet a user owns, ordered by animal id.
    pub fn pets_of(&self, user_id: u32) -> Result<Vec<Pet>> {
        if !self.users.contains_key(&user_id) {
            return Err(PetError::not_found("User ID does not exist"));
        }

        let mut records: Vec<&OwnershipRecord> = self
            .ownerships
            .iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        records.sort_by_key(|r| r.animal_id);
        records.into_iter().map(|r| self.join(r)).collect()
    }

    /// Write a pet's two snapshots back to its stored record.
    ///
    /// Fails with [`PetError::Conflict`] when the record was persisted since
    /// `pet` was loaded. Returns the record's new version.
    pub fn persist(&mut self, pet: &Pet) -> Result<u64> {
        let incoming = pet.record();
        let index = self
            .position(incoming.user_id, incoming.animal_id)
            .ok_or_else(|| PetError::not_found("User/Animal combination does not exist"))?;

        let stored = &mut self.ownerships[index];
        if stored.version != incoming.version {
            log::warn!(
                "rejecting stale write to {}/{}: version {} != {}",
                incoming.user_id,
                incoming.animal_id,
                incoming.version,
                stored.version
            );
            return Err(PetError::Conflict {
                user_id: incoming.user_id,
                animal_id: incoming.animal_id,
                expected: stored.version,
                found: incoming.version,
            });
        }

        stored.hunger = incoming.hunger;
        stored.happiness = incoming.happiness;
        stored.version += 1;
        log::debug!(
            "persisted {}/{} at version {}",
            stored.user_id,
            stored.animal_id,
            stored.version
        );
        Ok(stored.version)
    }

    pub fn release(&mut self, user_id: u32, animal_id: u32) -> Result<OwnershipRecord> {
        let index = self
            .position(user_id, animal_id)
            .ok_or_else(|| PetError::not_found("User/Animal combination does not exist"))?;
        log::info!("user {user_id} released animal {animal_id}");
        Ok(self.ownerships.remove(index))
    }

    pub fn feed(
        &mut self,
        user_id: u32,
        animal_id: u32,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Pet> {
        let mut pet = self.pet(user_id, animal_id)?;
        pet.feed(amount, now)?;
        self.persist(&pet)?;
        self.pet(user_id, animal_id)
    }

    pub fn stroke(
        &mut self,
        user_id: u32,
        animal_id: u32,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Pet> {
        let mut pet = self.pet(user_id, animal_id)?;
        pet.stroke(amount, now)?;
        self.persist(&pet)?;
        self.pet(user_id, animal_id)
    }

    fn position(&self, user_id: u32, animal_id: u32) -> Option<usize> {
        self.ownerships
            .iter()
            .position(|r| r.key() == (user_id, animal_id))
    }

    fn join(&self, record: &OwnershipRecord) -> Result<Pet> {
        let species = self
            .species
            .get(&record.animal_id)
            .ok_or(PetError::MissingSpecies {
                user_id: record.user_id,
                animal_id: record.animal_id,
            })?;
        Ok(Pet::new(species.clone(), record.clone()))
    }
}

fn next_id<T>(map: &BTreeMap<u32, T>) -> Result<u32> {
    match map.keys().next_back() {
        None => Ok(1),
        Some(last) => last
            .checked_add(1)
            .ok_or_else(|| PetError::invalid("No ids left to assign")),
    }
}
