//! Type-constructor symbols held in a universe's tables.

use crate::handle::TypeNode;
use crate::kind::Kind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Universe-local index of a symbol.
///
/// The same qualified name has unrelated ids in different universes; ids
/// never cross a universe boundary without migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub(crate) u32);

impl SymbolId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Declared variance of a type parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

/// A type parameter of a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub kind: Kind,
    pub variance: Variance,
}

/// A named type constructor.
///
/// Parents are nominal supertypes written over the symbol's own parameters
/// (as [`TypeNode::Param`] with `owner` set to this symbol's name).
#[derive(Debug, Clone)]
pub struct Symbol {
    pub(crate) name: String,
    pub(crate) params: Vec<TypeParam>,
    pub(crate) parents: Vec<Arc<TypeNode>>,
}

impl Symbol {
    /// Fully qualified name, e.g. `scala.collection.immutable.List`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last segment of the qualified name.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn params(&self) -> &[TypeParam] {
        &self.params
    }

    pub fn parents(&self) -> &[Arc<TypeNode>] {
        &self.parents
    }

    pub fn kind(&self) -> Kind {
        Kind::of(self.params.iter().map(|p| p.kind.clone()).collect())
    }

    pub fn variances(&self) -> Vec<Variance> {
        self.params.iter().map(|p| p.variance).collect()
    }
}

pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
