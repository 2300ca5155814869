//! Virtual pets whose hunger and happiness are derived lazily from stored
//! snapshots and the time elapsed since they were written.

pub mod config;
pub mod core;
pub mod registry;

pub use crate::core::{
    Clock, ManualClock, OwnershipRecord, Pet, PetError, PetView, SpeciesDraft, SpeciesProfile,
    SystemClock,
};
pub use registry::{Registry, User};
