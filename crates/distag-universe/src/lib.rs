//! # distag-universe
//!
//! Reflective type universes: the host-side model that type witnesses are
//! built on.
//!
//! ```text
//! Universe              ← symbol tables (name, params, parents), TOML-loadable
//!     │
//! TypeHandle            ← opaque type reference, valid only in its universe
//!     │  capture                    resolve
//! Fingerprint           ← structural identity, universe-independent
//!     │
//! is_subtype_of         ← decided from the fingerprint's own bases database
//! ```
//!
//! Capture and resolve are the two reflective primitives; each universe
//! serializes calls into them.

mod capture;
pub mod decl;
pub mod error;
pub mod fingerprint;
pub mod handle;
pub mod kind;
mod resolve;
mod subtype;
pub mod symbol;
pub mod universe;

pub use decl::{ParamDecl, SymbolDecl, TypeExprDecl, UniverseDecl};
pub use error::{CaptureError, MigrationError, UniverseError};
pub use fingerprint::{BasesDb, Fingerprint, FingerprintNode, MemberSig, RenderMode};
pub use handle::{Member, TypeHandle, TypeNode};
pub use kind::Kind;
pub use symbol::{Symbol, SymbolId, TypeParam, Variance};
pub use universe::{Universe, UniverseBuilder, UniverseId};
