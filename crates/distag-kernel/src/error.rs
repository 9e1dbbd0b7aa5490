//! Error types for witness construction.
//!
//! Construction errors are caller bugs (wrong arity, wrong shape, mixed
//! universes) and are kept apart from capture failures, which callers may
//! choose to absorb with a weak witness.

use distag_universe::{CaptureError, Kind, MigrationError, UniverseError, UniverseId};

/// A witness could not be built from the given parts.
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    /// A constructor was applied to the wrong number of arguments.
    #[error("{constructor} takes {expected} type argument(s), got {actual}")]
    ArityMismatch {
        constructor: String,
        expected: usize,
        actual: usize,
    },

    /// An argument's kind differs from its parameter's kind.
    #[error("argument {position} of {constructor} must have kind {expected}, got {actual}")]
    KindMismatch {
        constructor: String,
        position: usize,
        expected: Kind,
        actual: Kind,
    },

    /// A constructor witness was declared with a kind its handle does not have.
    #[error("{constructor} has kind {actual}, not the declared {declared}")]
    ShapeMismatch {
        constructor: String,
        declared: Kind,
        actual: Kind,
    },

    /// A constructor was required but a proper type was given.
    #[error("{0} is not a type constructor")]
    NotAConstructor(String),

    /// An applied type was required in order to recover its constructor.
    #[error("{0} is not an applied nominal type")]
    NoConstructor(String),

    /// A proper type was required but a constructor was given.
    #[error("{0} is a type constructor, not a proper type")]
    NotAType(String),

    /// Witnesses taken from different universes were combined.
    #[error("cannot combine witnesses from universes {expected} and {actual}")]
    UniverseMismatch {
        expected: UniverseId,
        actual: UniverseId,
    },

    /// The structural remainder of an intersection is from an unrelated universe.
    #[error("remainder from universe {remainder} is unreachable from universe {parents}")]
    ForeignRemainder {
        parents: UniverseId,
        remainder: UniverseId,
    },

    /// The universe rejected the synthesized type.
    #[error("malformed type: {0}")]
    Malformed(#[from] UniverseError),
}

/// Any failure of a witness operation, by category.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

impl From<UniverseError> for TagError {
    fn from(err: UniverseError) -> Self {
        TagError::Construction(ConstructionError::Malformed(err))
    }
}
