use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// A stored ownership record points at a species that is no longer registered.
    #[error("Ownership {user_id}/{animal_id} has no species profile loaded")]
    MissingSpecies { user_id: u32, animal_id: u32 },

    #[error("Ownership {user_id}/{animal_id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        user_id: u32,
        animal_id: u32,
        expected: u64,
        found: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PetError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PetError::InvalidArgument(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        PetError::NotFound(message.into())
    }

    pub(crate) fn duplicate(message: impl Into<String>) -> Self {
        PetError::Duplicate(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PetError>;
