use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::error::{PetError, Result};
use crate::core::level::{round_reading, Level};
use crate::core::species::SpeciesProfile;

/// Stored decay state for one (user, animal) pair.
///
/// Only snapshots are kept here; current readings are derived through [`Pet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub user_id: u32,
    pub animal_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_name: Option<String>,
    pub hunger: Level,
    pub happiness: Level,
    /// Bumped on every persist; used to reject lost updates.
    #[serde(default)]
    pub version: u64,
}

impl OwnershipRecord {
    /// A freshly adopted animal: both snapshots at zero, stamped at `now`.
    pub fn new(user_id: u32, animal_id: u32, animal_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            animal_id,
            animal_name,
            hunger: Level::zero(now),
            happiness: Level::zero(now),
            version: 0,
        }
    }

    pub fn key(&self) -> (u32, u32) {
        (self.user_id, self.animal_id)
    }
}

/// An ownership record joined with its species profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    species: SpeciesProfile,
    record: OwnershipRecord,
}

impl Pet {
    pub fn new(species: SpeciesProfile, record: OwnershipRecord) -> Self {
        Self { species, record }
    }

    pub fn species(&self) -> &SpeciesProfile {
        &self.species
    }

    pub fn record(&self) -> &OwnershipRecord {
        &self.record
    }

    /// Hunger at `now`, capped at the species maximum.
    pub fn hunger(&self, now: DateTime<Utc>) -> Decimal {
        round_reading(self.projected_hunger(now))
    }

    /// Happiness at `now`, floored at the species minimum.
    pub fn happiness(&self, now: DateTime<Utc>) -> Decimal {
        round_reading(self.projected_happiness(now))
    }

    /// Lower hunger by `amount`, never below the species `min_hunger`.
    /// Returns the new hunger reading.
    pub fn feed(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<Decimal> {
        ensure_positive(amount)?;

        // Start from the unrounded value so split feeds compose exactly
        let current = self.projected_hunger(now);
        let fed = current.saturating_sub(amount).max(self.species.min_hunger());
        self.record.hunger.reset(fed, now);

        log::info!(
            "fed {}/{} by {amount}: hunger {current} -> {fed}",
            self.record.user_id,
            self.record.animal_id
        );
        Ok(self.hunger(now))
    }

    /// Raise happiness by `amount`, never above the species maximum.
    /// Returns the new happiness reading.
    pub fn stroke(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<Decimal> {
        ensure_positive(amount)?;

        let current = self.projected_happiness(now);
        let stroked = current.saturating_add(amount).min(self.species.max_happiness());
        self.record.happiness.reset(stroked, now);

        log::info!(
            "stroked {}/{} by {amount}: happiness {current} -> {stroked}",
            self.record.user_id,
            self.record.animal_id
        );
        Ok(self.happiness(now))
    }

    fn projected_hunger(&self, now: DateTime<Utc>) -> Decimal {
        self.record
            .hunger
            .drifted(self.species.hunger_per_second(), now)
            .min(self.species.max_hunger())
    }

    fn projected_happiness(&self, now: DateTime<Utc>) -> Decimal {
        self.record
            .happiness
            .drifted(-self.species.sadness_per_second(), now)
            .max(self.species.min_happiness())
    }

    /// The externally visible shape: identity plus derived readings.
    pub fn view(&self, now: DateTime<Utc>) -> PetView {
        PetView {
            user_id: self.record.user_id,
            animal_id: self.record.animal_id,
            animal_name: self.record.animal_name.clone(),
            type_name: self.species.type_name().to_string(),
            hunger: self.hunger(now),
            happiness: self.happiness(now),
        }
    }
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(PetError::invalid("amount must be positive"));
    }
    Ok(())
}

/// Transport shape of a pet. Snapshot fields never leave the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetView {
    pub user_id: u32,
    pub animal_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_name: Option<String>,
    pub type_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub hunger: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub happiness: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::species::SpeciesDraft;
    use chrono::{Duration, TimeZone};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn at_ms(ms: i64) -> DateTime<Utc> {
        t0() + Duration::milliseconds(ms)
    }

    fn species(hunger_rate: &str, sadness_rate: &str) -> SpeciesProfile {
        SpeciesProfile::from_draft(
            1,
            SpeciesDraft {
                type_name: "Test Animal".to_string(),
                hunger_per_second: d(hunger_rate),
                sadness_per_second: d(sadness_rate),
                max_hunger: d("1"),
                min_hunger: None,
                min_happiness: d("-1"),
                max_happiness: d("1"),
            },
            None,
        )
        .unwrap()
    }

    fn fresh_pet(hunger_rate: &str, sadness_rate: &str) -> Pet {
        Pet::new(
            species(hunger_rate, sadness_rate),
            OwnershipRecord::new(7, 1, Some("Rex".to_string()), t0()),
        )
    }

    #[test]
    fn test_fresh_record_reads_zero() {
        let pet = fresh_pet("0.5", "0.25");
        assert_eq!(pet.hunger(t0()), Decimal::ZERO);
        assert_eq!(pet.happiness(t0()), Decimal::ZERO);
    }

    #[test]
    fn test_hunger_increases() {
        let pet = fresh_pet("0.5", "0.25");

        assert_eq!(pet.hunger(at_ms(1000)), d("0.5"));
        // Half a second more is not counted yet
        assert_eq!(pet.hunger(at_ms(1500)), d("0.5"));
        assert_eq!(pet.hunger(at_ms(2000)), d("1.0"));
        // Capped at max_hunger
        assert_eq!(pet.hunger(at_ms(3000)), d("1"));
    }

    #[test]
    fn test_happiness_decreases() {
        let pet = fresh_pet("0.5", "0.25");

        assert_eq!(pet.happiness(at_ms(1000)), d("-0.25"));
        assert_eq!(pet.happiness(at_ms(1500)), d("-0.25"));
        assert_eq!(pet.happiness(at_ms(2000)), d("-0.5"));
        // Floored at min_happiness
        assert_eq!(pet.happiness(at_ms(6000)), d("-1"));
    }

    #[test]
    fn test_hunger_overshoot_is_clamped() {
        let pet = fresh_pet("0.7", "0.25");
        assert_eq!(pet.hunger(at_ms(2000)), d("1.0"));
    }

    #[test]
    fn test_reads_within_same_second_are_identical() {
        let pet = fresh_pet("0.3", "0.1");
        for base in [0, 1000, 4000] {
            assert_eq!(pet.hunger(at_ms(base)), pet.hunger(at_ms(base + 999)));
            assert_eq!(pet.happiness(at_ms(base)), pet.happiness(at_ms(base + 999)));
        }
    }

    #[test]
    fn test_fractional_rate_rounds_to_two_places() {
        let pet = fresh_pet("0.1", "0.1");
        assert_eq!(pet.hunger(at_ms(3000)), d("0.3"));
        assert_eq!(pet.hunger(at_ms(3000)).scale(), 1);
    }

    #[test]
    fn test_feed_lowers_hunger_from_current_reading() {
        let mut pet = fresh_pet("0.5", "0.25");
        let hunger = pet.feed(d("0.25"), at_ms(2000)).unwrap();

        assert_eq!(hunger, d("0.75"));
        assert_eq!(pet.record().hunger.value, d("0.75"));
        assert_eq!(pet.record().hunger.updated_at, at_ms(2000));
        // Drift resumes from the new snapshot
        assert_eq!(pet.hunger(at_ms(2999)), d("0.75"));
        assert_eq!(pet.hunger(at_ms(3000)), d("1"));
    }

    #[test]
    fn test_feed_respects_min_hunger() {
        let mut pet = fresh_pet("0.5", "0.25");
        let hunger = pet.feed(d("10"), t0()).unwrap();
        assert_eq!(hunger, d("-1"));
    }

    #[test]
    fn test_feed_twice_same_instant_equals_single_feed() {
        let mut twice = fresh_pet("0.5", "0.25");
        twice.feed(d("0.2"), at_ms(2000)).unwrap();
        twice.feed(d("0.3"), at_ms(2000)).unwrap();

        let mut once = fresh_pet("0.5", "0.25");
        once.feed(d("0.5"), at_ms(2000)).unwrap();

        assert_eq!(twice.record().hunger, once.record().hunger);
    }

    #[test]
    fn test_sub_hundredth_feeds_compose() {
        let mut split = fresh_pet("0.5", "0.25");
        split.feed(d("0.005"), at_ms(1000)).unwrap();
        split.feed(d("0.005"), at_ms(1000)).unwrap();

        let mut single = fresh_pet("0.5", "0.25");
        single.feed(d("0.010"), at_ms(1000)).unwrap();

        assert_eq!(split.record().hunger, single.record().hunger);
        assert_eq!(single.record().hunger.value, d("0.49"));
    }

    #[test]
    fn test_feed_starts_from_unrounded_hunger() {
        let mut pet = fresh_pet("0.333", "0.25");
        // Reads 0.67 but the stored projection is 0.666
        assert_eq!(pet.hunger(at_ms(2000)), d("0.67"));
        pet.feed(d("0.006"), at_ms(2000)).unwrap();
        assert_eq!(pet.record().hunger.value, d("0.660"));
    }

    #[test]
    fn test_stroke_raises_happiness_up_to_max() {
        let mut pet = fresh_pet("0.5", "0.25");
        let happiness = pet.stroke(d("0.5"), at_ms(2000)).unwrap();
        assert_eq!(happiness, d("0"));
        assert_eq!(pet.record().happiness.updated_at, at_ms(2000));

        let happiness = pet.stroke(d("5"), at_ms(2000)).unwrap();
        assert_eq!(happiness, d("1"));
        assert_eq!(pet.happiness(at_ms(3000)), d("0.75"));
    }

    #[test]
    fn test_non_positive_amounts_leave_record_untouched() {
        let mut pet = fresh_pet("0.5", "0.25");
        let before = pet.record().clone();

        for amount in [Decimal::ZERO, d("-1")] {
            assert!(matches!(
                pet.feed(amount, at_ms(5000)),
                Err(PetError::InvalidArgument(_))
            ));
            assert!(matches!(
                pet.stroke(amount, at_ms(5000)),
                Err(PetError::InvalidArgument(_))
            ));
        }

        assert_eq!(pet.record(), &before);
    }

    #[test]
    fn test_view_hides_snapshots() {
        let pet = fresh_pet("0.5", "0.25");
        let json = serde_json::to_value(pet.view(at_ms(1000))).unwrap();

        assert_eq!(json["user_id"], 7);
        assert_eq!(json["animal_id"], 1);
        assert_eq!(json["animal_name"], "Rex");
        assert_eq!(json["type_name"], "Test Animal");
        assert!(json["hunger"].is_number());
        assert_eq!(json["hunger"], 0.5);
        assert_eq!(json["happiness"], -0.25);
        assert!(json.get("version").is_none());
    }
}
