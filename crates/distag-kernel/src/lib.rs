//! # distag-kernel
//!
//! Runtime type identity: witnesses that stand in for a type at runtime,
//! including the generic arguments and type constructors a host would
//! otherwise erase. A dependency-injection planner keys its bindings by
//! these witnesses, so `Service[Int]` and `Service[String]` stay distinct.
//!
//! ## Architecture
//!
//! ```text
//! Kind / TagFlavor      ← constructor shapes and their canonical names
//!     │
//! Tag                   ← proper types; application and intersection
//! HKTag                 ← unapplied constructors of a declared kind
//! WeakTag               ← fallback identity when no fingerprint exists
//!     │
//! Migrate               ← re-resolve any witness in another universe
//! ```
//!
//! Witnesses are built explicitly and passed down by the caller; nothing
//! here derives them implicitly. The reflective side (universes, handles,
//! fingerprints) lives in `distag-universe`.

pub mod error;
pub mod flavor;
pub mod hktag;
mod intersection;
pub mod migrate;
pub mod tag;
pub mod weak;

pub use distag_universe::{Fingerprint, Kind, RenderMode, TypeHandle, Universe};
pub use error::{ConstructionError, TagError};
pub use flavor::{TagFlavor, classify};
pub use hktag::{HKTag, constructor_of};
pub use migrate::Migrate;
pub use tag::{Tag, TypeArg};
pub use weak::WeakTag;
