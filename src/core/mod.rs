pub mod clock;
pub mod error;
pub mod level;
pub mod ownership;
pub mod species;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{PetError, Result};
pub use level::{elapsed_whole_seconds, Level};
pub use ownership::{OwnershipRecord, Pet, PetView};
pub use species::{SpeciesDraft, SpeciesProfile};
