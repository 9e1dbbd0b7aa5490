//! Type witnesses for proper types, and constructor application.

use crate::error::{ConstructionError, TagError};
use crate::hktag::HKTag;
use distag_universe::{
    Fingerprint, FingerprintNode, Kind, RenderMode, TypeHandle, TypeNode, Universe,
};
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a proper (possibly generic-applied) type.
///
/// Equality and hashing go through the fingerprint only: two tags for the
/// same type compare equal even when built from different handles or in
/// different universes.
#[derive(Clone)]
pub struct Tag {
    pub(crate) handle: TypeHandle,
    pub(crate) fingerprint: Fingerprint,
}

/// One argument of a constructor application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    /// Fills a `*` position.
    Type(Tag),
    /// Fills a higher-kinded position, e.g. `F[_]`.
    Constructor(HKTag),
}

impl TypeArg {
    pub fn kind(&self) -> Kind {
        match self {
            TypeArg::Type(_) => Kind::star(),
            TypeArg::Constructor(c) => c.kind().clone(),
        }
    }

    pub fn handle(&self) -> &TypeHandle {
        match self {
            TypeArg::Type(t) => t.handle(),
            TypeArg::Constructor(c) => c.handle(),
        }
    }
}

impl From<Tag> for TypeArg {
    fn from(tag: Tag) -> Self {
        TypeArg::Type(tag)
    }
}

impl From<HKTag> for TypeArg {
    fn from(tag: HKTag) -> Self {
        TypeArg::Constructor(tag)
    }
}

impl Tag {
    /// Capture a witness for a proper type.
    pub fn from_handle(handle: TypeHandle) -> Result<Self, TagError> {
        if !handle.kind().is_star() {
            return Err(ConstructionError::NotAType(handle.to_string()).into());
        }
        let fingerprint = handle.universe().capture(&handle)?;
        Ok(Self {
            handle,
            fingerprint,
        })
    }

    /// Apply a first-order constructor witness to proper-type arguments.
    pub fn applied(constructor: &HKTag, args: &[Tag]) -> Result<Self, TagError> {
        let args: Vec<TypeArg> = args.iter().cloned().map(TypeArg::Type).collect();
        Self::applied_args(constructor, &args)
    }

    /// Apply a constructor witness to arguments of any kind, in parameter order.
    pub fn applied_args(constructor: &HKTag, args: &[TypeArg]) -> Result<Self, TagError> {
        apply(constructor.handle(), constructor.kind(), args)
    }

    /// Apply a raw constructor handle, reading its kind from the universe.
    pub fn applied_raw(constructor: &TypeHandle, args: &[Tag]) -> Result<Self, TagError> {
        if !matches!(constructor.node().as_ref(), TypeNode::Constructor { .. }) {
            return Err(ConstructionError::NotAConstructor(constructor.to_string()).into());
        }
        let args: Vec<TypeArg> = args.iter().cloned().map(TypeArg::Type).collect();
        apply(constructor, &constructor.kind(), &args)
    }

    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn universe(&self) -> &Arc<Universe> {
        self.handle.universe()
    }

    pub fn is_subtype_of(&self, other: &Tag) -> bool {
        self.fingerprint.is_subtype_of(&other.fingerprint)
    }

    /// Arguments of a nominal application (`[Int]` for `List[Int]`).
    pub fn type_args(&self) -> &[FingerprintNode] {
        self.fingerprint.type_args()
    }

    /// Components of an intersection; any other type is its only component.
    pub fn intersection_parents(&self) -> Vec<&FingerprintNode> {
        self.fingerprint.intersection_parents()
    }

    pub fn render(&self, mode: RenderMode) -> String {
        self.fingerprint.render(mode)
    }

    pub fn digest(&self) -> String {
        self.fingerprint.digest()
    }
}

fn apply(constructor: &TypeHandle, kind: &Kind, args: &[TypeArg]) -> Result<Tag, TagError> {
    if args.len() != kind.arity() {
        return Err(ConstructionError::ArityMismatch {
            constructor: constructor.to_string(),
            expected: kind.arity(),
            actual: args.len(),
        }
        .into());
    }

    let mut handles = Vec::with_capacity(args.len());
    for (position, (arg, param)) in args.iter().zip(kind.params()).enumerate() {
        let handle = arg.handle();
        if !handle.same_universe(constructor) {
            return Err(ConstructionError::UniverseMismatch {
                expected: constructor.universe().id().clone(),
                actual: handle.universe().id().clone(),
            }
            .into());
        }
        let actual = arg.kind();
        if &actual != param {
            return Err(ConstructionError::KindMismatch {
                constructor: constructor.to_string(),
                position,
                expected: param.clone(),
                actual,
            }
            .into());
        }
        handles.push(handle.clone());
    }

    let applied = constructor.universe().apply(constructor, &handles)?;
    Tag::from_handle(applied)
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint.hash(state);
    }
}

impl Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fingerprint.serialize(serializer)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.fingerprint, f)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:#})", self.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distag_universe::{ParamDecl, SymbolDecl};
    use std::collections::HashSet;

    fn universe() -> Arc<Universe> {
        let mut b = Universe::builder("tags");
        b.declare(SymbolDecl::new("scala.Int")).unwrap();
        b.declare(SymbolDecl::new("java.lang.String")).unwrap();
        b.declare(
            SymbolDecl::new("scala.util.Either")
                .param(ParamDecl::covariant("L"))
                .param(ParamDecl::covariant("R")),
        )
        .unwrap();
        b.declare(
            SymbolDecl::new("izumi.Service").param(ParamDecl::invariant("A")),
        )
        .unwrap();
        b.build()
    }

    fn tag(u: &Arc<Universe>, name: &str) -> Tag {
        Tag::from_handle(u.named(name, vec![]).unwrap()).unwrap()
    }

    #[test]
    fn generic_arguments_distinguish_tags() {
        let u = universe();
        let service = u.constructor("izumi.Service").unwrap();
        let of_int = Tag::applied_raw(&service, &[tag(&u, "scala.Int")]).unwrap();
        let of_string = Tag::applied_raw(&service, &[tag(&u, "java.lang.String")]).unwrap();
        assert_ne!(of_int, of_string);

        let mut keys = HashSet::new();
        keys.insert(of_int.clone());
        keys.insert(of_string);
        keys.insert(Tag::applied_raw(&service, &[tag(&u, "scala.Int")]).unwrap());
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&of_int));
    }

    #[test]
    fn rejects_constructor_handles() {
        let u = universe();
        let err = Tag::from_handle(u.constructor("izumi.Service").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            TagError::Construction(ConstructionError::NotAType(_))
        ));
    }

    #[test]
    fn raw_application_checks_arity() {
        let u = universe();
        let either = u.constructor("scala.util.Either").unwrap();
        let err = Tag::applied_raw(&either, &[tag(&u, "scala.Int")]).unwrap_err();
        assert!(matches!(
            err,
            TagError::Construction(ConstructionError::ArityMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        let int = u.named("scala.Int", vec![]).unwrap();
        assert!(matches!(
            Tag::applied_raw(&int, &[]).unwrap_err(),
            TagError::Construction(ConstructionError::NotAConstructor(_))
        ));
    }

    #[test]
    fn renders_through_fingerprint() {
        let u = universe();
        let either = u.constructor("scala.util.Either").unwrap();
        let t = Tag::applied_raw(&either, &[tag(&u, "java.lang.String"), tag(&u, "scala.Int")])
            .unwrap();
        insta::assert_snapshot!(t.to_string(), @"Either[String, Int]");
        insta::assert_snapshot!(format!("{t:#}"), @"scala.util.Either[java.lang.String, scala.Int]");
        insta::assert_snapshot!(format!("{t:?}"), @"Tag(scala.util.Either[java.lang.String, scala.Int])");
        assert_eq!(t.type_args().len(), 2);
    }
}
