//! Weak witnesses: identity that degrades to reference equality when no
//! fingerprint can be captured.
//!
//! A weak tag is never a drop-in replacement for [`Tag`]. Two weak tags for
//! independently obtained unresolved parameters are distinct even when they
//! print the same; use [`WeakTag::promote`] to get a real tag when one
//! exists.

use crate::tag::Tag;
use distag_universe::{Fingerprint, TypeHandle};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone)]
pub struct WeakTag {
    pub(crate) handle: TypeHandle,
    pub(crate) fingerprint: Option<Fingerprint>,
}

impl WeakTag {
    /// Always succeeds; the fingerprint is captured when possible.
    pub fn from_handle(handle: TypeHandle) -> Self {
        let fingerprint = match handle.universe().capture(&handle) {
            Ok(fingerprint) => Some(fingerprint),
            Err(err) => {
                log::debug!("weak tag for {handle} has no fingerprint: {err}");
                None
            }
        };
        Self {
            handle,
            fingerprint,
        }
    }

    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }

    /// Whether identity is structural rather than by reference.
    pub fn is_precise(&self) -> bool {
        self.fingerprint.is_some()
    }

    /// A real witness, when a fingerprint was captured for a proper type.
    pub fn promote(&self) -> Option<Tag> {
        let fingerprint = self.fingerprint.clone()?;
        if !self.handle.kind().is_star() {
            return None;
        }
        Some(Tag {
            handle: self.handle.clone(),
            fingerprint,
        })
    }
}

impl From<Tag> for WeakTag {
    fn from(tag: Tag) -> Self {
        Self {
            handle: tag.handle,
            fingerprint: Some(tag.fingerprint),
        }
    }
}

impl PartialEq for WeakTag {
    fn eq(&self, other: &Self) -> bool {
        match (&self.fingerprint, &other.fingerprint) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.handle.same_ref(&other.handle),
            _ => false,
        }
    }
}

impl Eq for WeakTag {}

impl Hash for WeakTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.fingerprint {
            Some(fingerprint) => {
                0u8.hash(state);
                fingerprint.hash(state);
            }
            None => {
                1u8.hash(state);
                self.handle.hash_ref(state);
            }
        }
    }
}

impl fmt::Display for WeakTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fingerprint {
            Some(fingerprint) => fmt::Display::fmt(fingerprint, f),
            None => write!(f, "{}?", self.handle),
        }
    }
}

impl fmt::Debug for WeakTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fingerprint {
            Some(fingerprint) => write!(f, "WeakTag({fingerprint:#})"),
            None => write!(f, "WeakTag({}?)", self.handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distag_universe::{Kind, ParamDecl, SymbolDecl, Universe};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn universe() -> Arc<Universe> {
        let mut b = Universe::builder("weak");
        b.declare(SymbolDecl::new("scala.Int")).unwrap();
        b.declare(SymbolDecl::new("scala.List").param(ParamDecl::covariant("A")))
            .unwrap();
        b.build()
    }

    #[test]
    fn known_types_promote() {
        let u = universe();
        let h = u
            .named("scala.List", vec![u.named("scala.Int", vec![]).unwrap()])
            .unwrap();
        let weak = WeakTag::from_handle(h.clone());
        assert!(weak.is_precise());
        let tag = weak.promote().unwrap();
        assert_eq!(tag, Tag::from_handle(h).unwrap());
        assert_eq!(WeakTag::from(tag), weak);
    }

    #[test]
    fn unresolved_parameters_fall_back_to_reference_identity() {
        let u = universe();
        let t1 = u.named("scala.List", vec![u.param("f", "T", Kind::star())]).unwrap();
        let t2 = u.named("scala.List", vec![u.param("f", "T", Kind::star())]).unwrap();

        let w1 = WeakTag::from_handle(t1.clone());
        let w2 = WeakTag::from_handle(t2);
        assert!(!w1.is_precise());
        assert!(w1.promote().is_none());
        assert_eq!(w1.to_string(), w2.to_string());
        assert_ne!(w1, w2);
        assert_eq!(w1, WeakTag::from_handle(t1));

        let set: HashSet<WeakTag> = [w1.clone(), w1, w2].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn precise_and_imprecise_never_match() {
        let u = universe();
        let int = WeakTag::from_handle(u.named("scala.Int", vec![]).unwrap());
        let t = WeakTag::from_handle(u.param("f", "T", Kind::star()));
        assert_ne!(int, t);
        insta::assert_snapshot!(t.to_string(), @"T?");
    }

    #[test]
    fn constructors_do_not_promote() {
        let u = universe();
        let list = WeakTag::from_handle(u.constructor("scala.List").unwrap());
        assert!(list.is_precise());
        assert!(list.promote().is_none());
    }
}
