//! Constructor witnesses: identities of unapplied type constructors.

use crate::error::{ConstructionError, TagError};
use crate::flavor::{TagFlavor, classify};
use crate::tag::Tag;
use distag_universe::{Fingerprint, Kind, RenderMode, TypeHandle, TypeNode};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a type constructor of a given kind.
///
/// The fingerprint encodes the constructor itself (`List[_]`), never an
/// application of it.
#[derive(Clone)]
pub struct HKTag {
    pub(crate) handle: TypeHandle,
    pub(crate) kind: Kind,
    pub(crate) fingerprint: Fingerprint,
}

impl HKTag {
    /// Capture a constructor witness, asserting its kind.
    ///
    /// Only unapplied constructor handles qualify. A kind that does not
    /// match the handle's declared parameters is a construction error.
    pub fn from_handle(handle: TypeHandle, kind: Kind) -> Result<Self, TagError> {
        if !matches!(handle.node().as_ref(), TypeNode::Constructor { .. }) {
            return Err(ConstructionError::NotAConstructor(handle.to_string()).into());
        }
        let actual = handle.kind();
        if actual != kind {
            return Err(ConstructionError::ShapeMismatch {
                constructor: handle.to_string(),
                declared: kind,
                actual,
            }
            .into());
        }
        let fingerprint = handle.universe().capture(&handle)?;
        Ok(Self {
            handle,
            kind,
            fingerprint,
        })
    }

    /// The constructor witness behind an applied tag (`List[_]` from `List[Int]`).
    pub fn of_applied(tag: &Tag) -> Result<Self, TagError> {
        let handle = constructor_of(tag)?;
        let kind = handle.kind();
        Self::from_handle(handle, kind)
    }

    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn flavor(&self) -> Option<TagFlavor> {
        TagFlavor::of(&self.kind)
    }

    /// Flavor name for diagnostics, e.g. `TagK` or `unnamed kind ...`.
    pub fn flavor_name(&self) -> String {
        classify(&self.kind)
    }

    pub fn is_subtype_of(&self, other: &HKTag) -> bool {
        self.fingerprint.is_subtype_of(&other.fingerprint)
    }

    pub fn render(&self, mode: RenderMode) -> String {
        self.fingerprint.render(mode)
    }
}

/// Recover the raw constructor handle of an applied tag.
///
/// This projects the applied type onto its constructor symbol rather than
/// reusing the applied node, so the result can be applied to other
/// arguments.
pub fn constructor_of(tag: &Tag) -> Result<TypeHandle, ConstructionError> {
    tag.handle()
        .type_constructor()
        .ok_or_else(|| ConstructionError::NoConstructor(tag.handle().to_string()))
}

impl PartialEq for HKTag {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for HKTag {}

impl Hash for HKTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl fmt::Display for HKTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.fingerprint, f)
    }
}

impl fmt::Debug for HKTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HKTag({:#}: {})", self.fingerprint, self.kind)
    }
}
