//! Kind descriptors: the arity-and-nesting shape of a type constructor.
//!
//! A kind is a tree of parameter kinds. The empty tree is a proper type
//! (`*`); `Kind([*])` is a one-parameter constructor (`* -> *`);
//! `Kind([* -> *])` takes a constructor as its only parameter
//! (`(* -> *) -> *`). Parameter order is significant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a type constructor.
///
/// Serialized as nested arrays: `[]` is `*`, `[[]]` is `* -> *`,
/// `[[[]]]` is `(* -> *) -> *`.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Kind {
    params: Vec<Kind>,
}

impl Kind {
    /// The kind of proper (fully applied) types.
    pub fn star() -> Self {
        Self { params: Vec::new() }
    }

    /// A constructor taking parameters of the given kinds, in order.
    pub fn of(params: Vec<Kind>) -> Self {
        Self { params }
    }

    /// A constructor taking `arity` proper-type parameters.
    pub fn first_order(arity: usize) -> Self {
        Self {
            params: vec![Kind::star(); arity],
        }
    }

    pub fn params(&self) -> &[Kind] {
        &self.params
    }

    /// Number of parameters at the leading level.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn is_star(&self) -> bool {
        self.params.is_empty()
    }

    /// True when every parameter is itself a proper type.
    pub fn is_first_order(&self) -> bool {
        self.params.iter().all(Kind::is_star)
    }

    /// Nesting depth: 0 for `*`, 1 for first-order constructors, and so on.
    pub fn depth(&self) -> usize {
        self.params
            .iter()
            .map(|p| p.depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn param(f: &mut fmt::Formatter<'_>, k: &Kind) -> fmt::Result {
            if k.is_star() {
                write!(f, "*")
            } else {
                write!(f, "({k})")
            }
        }

        match self.params.as_slice() {
            [] => write!(f, "*"),
            [only] => {
                param(f, only)?;
                write!(f, " -> *")
            }
            many => {
                write!(f, "(")?;
                for (i, k) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    param(f, k)?;
                }
                write!(f, ") -> *")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shapes() {
        assert_eq!(Kind::star().to_string(), "*");
        assert_eq!(Kind::first_order(1).to_string(), "* -> *");
        assert_eq!(Kind::first_order(2).to_string(), "(*, *) -> *");
        assert_eq!(
            Kind::of(vec![Kind::first_order(1)]).to_string(),
            "(* -> *) -> *"
        );
        assert_eq!(
            Kind::of(vec![Kind::first_order(1), Kind::star()]).to_string(),
            "((* -> *), *) -> *"
        );
    }

    #[test]
    fn structural_equality_is_order_sensitive() {
        let a = Kind::of(vec![Kind::first_order(1), Kind::star()]);
        let b = Kind::of(vec![Kind::star(), Kind::first_order(1)]);
        assert_ne!(a, b);
        assert_eq!(a, Kind::of(vec![Kind::first_order(1), Kind::star()]));
    }

    #[test]
    fn depth_and_order() {
        assert_eq!(Kind::star().depth(), 0);
        assert_eq!(Kind::first_order(3).depth(), 1);
        let higher = Kind::of(vec![Kind::first_order(1)]);
        assert_eq!(higher.depth(), 2);
        assert!(!higher.is_first_order());
        assert!(Kind::first_order(2).is_first_order());
    }

    #[test]
    fn serializes_as_nested_arrays() {
        let k = Kind::of(vec![Kind::first_order(1), Kind::star()]);
        let json = serde_json::to_string(&k).unwrap();
        assert_eq!(json, "[[[]],[]]");
        let back: Kind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, k);
    }
}
