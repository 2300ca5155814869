use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::{PetError, Result};

/// Unvalidated species input, as it arrives from the CLI or `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDraft {
    pub type_name: String,
    pub hunger_per_second: Decimal,
    pub sadness_per_second: Decimal,
    pub max_hunger: Decimal,
    /// Lower bound feeding can push hunger to. Falls back to the configured
    /// default, then to `-max_hunger`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_hunger: Option<Decimal>,
    pub min_happiness: Decimal,
    pub max_happiness: Decimal,
}

/// Decay rates and bounds shared by every animal of one type.
///
/// Built through [`SpeciesProfile::from_draft`] or checked the same way when
/// deserialized, so rates are always positive and zero always lies inside
/// both ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredSpecies")]
pub struct SpeciesProfile {
    id: u32,
    type_name: String,
    hunger_per_second: Decimal,
    sadness_per_second: Decimal,
    max_hunger: Decimal,
    min_hunger: Decimal,
    min_happiness: Decimal,
    max_happiness: Decimal,
}

/// On-disk shape of a profile, before validation.
#[derive(Deserialize)]
struct StoredSpecies {
    id: u32,
    type_name: String,
    hunger_per_second: Decimal,
    sadness_per_second: Decimal,
    max_hunger: Decimal,
    min_hunger: Decimal,
    min_happiness: Decimal,
    max_happiness: Decimal,
}

impl TryFrom<StoredSpecies> for SpeciesProfile {
    type Error = PetError;

    fn try_from(stored: StoredSpecies) -> Result<Self> {
        let draft = SpeciesDraft {
            type_name: stored.type_name,
            hunger_per_second: stored.hunger_per_second,
            sadness_per_second: stored.sadness_per_second,
            max_hunger: stored.max_hunger,
            min_hunger: Some(stored.min_hunger),
            min_happiness: stored.min_happiness,
            max_happiness: stored.max_happiness,
        };
        SpeciesProfile::from_draft(stored.id, draft, None)
    }
}

impl SpeciesProfile {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn hunger_per_second(&self) -> Decimal {
        self.hunger_per_second
    }

    pub fn sadness_per_second(&self) -> Decimal {
        self.sadness_per_second
    }

    pub fn max_hunger(&self) -> Decimal {
        self.max_hunger
    }

    /// Lowest value feeding can bring hunger down to.
    pub fn min_hunger(&self) -> Decimal {
        self.min_hunger
    }

    pub fn min_happiness(&self) -> Decimal {
        self.min_happiness
    }

    pub fn max_happiness(&self) -> Decimal {
        self.max_happiness
    }

    /// Case-insensitive type comparison used for duplicate detection.
    pub fn is_type(&self, type_name: &str) -> bool {
        self.type_name.to_lowercase() == type_name.trim().to_lowercase()
    }
}
