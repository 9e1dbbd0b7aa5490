//! Error types for universe declaration, capture, and migration.

use crate::kind::Kind;
use crate::universe::UniverseId;

/// A universe declaration or a handle built against it is malformed.
#[derive(Debug, thiserror::Error)]
pub enum UniverseError {
    /// Two symbols share a qualified name.
    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    /// A symbol declares the same type parameter twice.
    #[error("duplicate type parameter {param} on {symbol}")]
    DuplicateParam { symbol: String, param: String },

    /// A name does not resolve in this universe.
    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    /// A parent expression mentions a parameter its symbol does not declare.
    #[error("unknown type parameter {param} in declaration of {symbol}")]
    UnknownParam { symbol: String, param: String },

    /// Parents must name symbols declared earlier, which rules out cycles.
    #[error("parent {parent} of {symbol} is not declared before it")]
    ParentNotDeclared { symbol: String, parent: String },

    /// A constructor is applied to the wrong number of arguments.
    #[error("{symbol} expects {expected} type argument(s), got {actual}")]
    ArityMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    /// A type argument has the wrong shape for its parameter position.
    #[error("kind mismatch for {symbol}: expected {expected}, got {actual}")]
    KindMismatch {
        symbol: String,
        expected: Kind,
        actual: Kind,
    },

    /// A handle from one universe was used to build a type in another.
    #[error("handle from universe {actual} used in universe {expected}")]
    ForeignHandle {
        expected: UniverseId,
        actual: UniverseId,
    },

    /// A type was used where an unapplied constructor was required.
    #[error("{0} is not a type constructor")]
    NotAConstructor(String),

    /// A TOML universe declaration could not be parsed.
    #[error("invalid universe declaration: {0}")]
    Declaration(#[from] toml::de::Error),
}

/// A fingerprint could not be derived for a handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// The handle mentions a generic parameter with no binding.
    #[error("unresolved type parameter {name} of {owner}")]
    Unresolved { owner: String, name: String },

    /// A symbol id that this universe never issued.
    #[error("symbol #{index} is not in universe {universe}")]
    UnknownSymbol { universe: UniverseId, index: usize },

    /// The handle was not produced by the universe asked to capture it.
    #[error("cannot capture a handle from universe {actual} in universe {expected}")]
    ForeignHandle {
        expected: UniverseId,
        actual: UniverseId,
    },
}

/// A handle or fingerprint has no equivalent in the target universe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The target universe has no symbol with this qualified name.
    #[error("universe {universe} has no symbol {name}")]
    MissingSymbol { universe: UniverseId, name: String },

    /// The target symbol exists but has a different parameter shape.
    #[error("{name} has kind {source_kind} here but {target_kind} in universe {universe}")]
    ShapeMismatch {
        universe: UniverseId,
        name: String,
        source_kind: Kind,
        target_kind: Kind,
    },

    /// Re-capturing the migrated handle produced a different fingerprint.
    #[error("fingerprint drifted during migration: {before} became {after}")]
    FingerprintDrift { before: String, after: String },

    /// The migrated handle could not be captured in the target.
    #[error(transparent)]
    Capture(#[from] CaptureError),
}
