//! Declarative universe descriptions.
//!
//! A universe can be assembled in code through [`UniverseBuilder`] or loaded
//! from a TOML document:
//!
//! ```toml
//! id = "app"
//!
//! [[symbol]]
//! name = "scala.collection.immutable.List"
//! params = [{ name = "A", variance = "covariant" }]
//! parents = [{ name = "scala.collection.Seq", args = [{ param = "A" }] }]
//! ```
//!
//! [`UniverseBuilder`]: crate::universe::UniverseBuilder

use crate::kind::Kind;
use crate::symbol::Variance;
use serde::{Deserialize, Serialize};

/// A whole universe: an id and its symbols in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseDecl {
    pub id: String,
    #[serde(default, rename = "symbol")]
    pub symbols: Vec<SymbolDecl>,
}

/// One type constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default)]
    pub parents: Vec<TypeExprDecl>,
}

impl SymbolDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    pub fn parent(mut self, parent: TypeExprDecl) -> Self {
        self.parents.push(parent);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(default)]
    pub kind: Kind,
    #[serde(default)]
    pub variance: Variance,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, kind: Kind, variance: Variance) -> Self {
        Self {
            name: name.into(),
            kind,
            variance,
        }
    }

    pub fn invariant(name: impl Into<String>) -> Self {
        Self::new(name, Kind::star(), Variance::Invariant)
    }

    pub fn covariant(name: impl Into<String>) -> Self {
        Self::new(name, Kind::star(), Variance::Covariant)
    }

    pub fn contravariant(name: impl Into<String>) -> Self {
        Self::new(name, Kind::star(), Variance::Contravariant)
    }

    /// A parameter that is itself a type constructor, e.g. `F[_]`.
    pub fn higher(name: impl Into<String>, kind: Kind) -> Self {
        Self::new(name, kind, Variance::Invariant)
    }
}

/// A type expression inside a declaration.
///
/// A named expression with no args in a higher-kinded position denotes the
/// unapplied constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeExprDecl {
    Param {
        param: String,
    },
    Named {
        name: String,
        #[serde(default)]
        args: Vec<TypeExprDecl>,
    },
}

impl TypeExprDecl {
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param { param: name.into() }
    }

    pub fn named(name: impl Into<String>, args: Vec<TypeExprDecl>) -> Self {
        Self::Named {
            name: name.into(),
            args,
        }
    }

    pub fn simple(name: impl Into<String>) -> Self {
        Self::named(name, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_declaration() {
        let src = r#"
id = "app"

[[symbol]]
name = "scala.Any"

[[symbol]]
name = "cats.Functor"
params = [{ name = "F", kind = [[]] }]

[[symbol]]
name = "scala.collection.immutable.List"
params = [{ name = "A", variance = "covariant" }]
parents = [{ name = "scala.Any" }]
"#;
        let decl: UniverseDecl = toml::from_str(src).unwrap();
        assert_eq!(decl.id, "app");
        assert_eq!(decl.symbols.len(), 3);
        assert_eq!(
            decl.symbols[1].params[0],
            ParamDecl::higher("F", Kind::first_order(1))
        );
        assert_eq!(decl.symbols[2].params[0], ParamDecl::covariant("A"));
        assert_eq!(
            decl.symbols[2].parents,
            vec![TypeExprDecl::simple("scala.Any")]
        );
    }

    #[test]
    fn type_expressions_are_untagged() {
        let expr: TypeExprDecl = serde_json::from_value(serde_json::json!({
            "name": "scala.Either",
            "args": [{ "param": "A" }, { "name": "scala.Int" }]
        }))
        .unwrap();
        assert_eq!(
            expr,
            TypeExprDecl::named(
                "scala.Either",
                vec![TypeExprDecl::param("A"), TypeExprDecl::simple("scala.Int")]
            )
        );
    }
}
