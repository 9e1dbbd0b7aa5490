//! Canonical names for the well-known kinds.
//!
//! Seven shapes get a name; every other kind is still valid and is
//! described generically as `unnamed kind <kind>`.

use distag_universe::Kind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// The named witness flavors, one per well-known kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagFlavor {
    /// `*`
    Tag,
    /// `* -> *`
    TagK,
    /// `(*, *) -> *`
    TagKK,
    /// `(*, *, *) -> *`
    TagK3,
    /// `(* -> *) -> *`
    TagT,
    /// `((* -> *), *) -> *`
    TagTK,
    /// `((* -> *), *, *) -> *`
    TagTKK,
}

static REGISTRY: LazyLock<HashMap<Kind, TagFlavor>> = LazyLock::new(|| {
    TagFlavor::ALL
        .iter()
        .map(|flavor| (flavor.kind(), *flavor))
        .collect()
});

impl TagFlavor {
    pub const ALL: [TagFlavor; 7] = [
        TagFlavor::Tag,
        TagFlavor::TagK,
        TagFlavor::TagKK,
        TagFlavor::TagK3,
        TagFlavor::TagT,
        TagFlavor::TagTK,
        TagFlavor::TagTKK,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TagFlavor::Tag => "Tag",
            TagFlavor::TagK => "TagK",
            TagFlavor::TagKK => "TagKK",
            TagFlavor::TagK3 => "TagK3",
            TagFlavor::TagT => "TagT",
            TagFlavor::TagTK => "TagTK",
            TagFlavor::TagTKK => "TagTKK",
        }
    }

    pub fn kind(self) -> Kind {
        let higher = || Kind::first_order(1);
        match self {
            TagFlavor::Tag => Kind::star(),
            TagFlavor::TagK => Kind::first_order(1),
            TagFlavor::TagKK => Kind::first_order(2),
            TagFlavor::TagK3 => Kind::first_order(3),
            TagFlavor::TagT => Kind::of(vec![higher()]),
            TagFlavor::TagTK => Kind::of(vec![higher(), Kind::star()]),
            TagFlavor::TagTKK => Kind::of(vec![higher(), Kind::star(), Kind::star()]),
        }
    }

    /// The flavor registered for a kind, by structural equality.
    pub fn of(kind: &Kind) -> Option<TagFlavor> {
        REGISTRY.get(kind).copied()
    }
}

impl fmt::Display for TagFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Diagnostic name of a kind: its flavor, or a generic description.
pub fn classify(kind: &Kind) -> String {
    match TagFlavor::of(kind) {
        Some(flavor) => flavor.name().to_string(),
        None => format!("unnamed kind {kind}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flavor_round_trips_through_its_kind() {
        for flavor in TagFlavor::ALL {
            assert_eq!(TagFlavor::of(&flavor.kind()), Some(flavor));
        }
    }

    #[test]
    fn classification_is_structural() {
        let a = Kind::of(vec![Kind::of(vec![])]);
        let b = Kind::first_order(1);
        assert_eq!(classify(&a), classify(&b));
        assert_eq!(classify(&a), "TagK");
    }

    #[test]
    fn unnamed_kinds_format_generically() {
        insta::assert_snapshot!(
            classify(&Kind::first_order(4)),
            @"unnamed kind (*, *, *, *) -> *"
        );
        insta::assert_snapshot!(
            classify(&Kind::of(vec![Kind::star(), Kind::first_order(1)])),
            @"unnamed kind (*, (* -> *)) -> *"
        );
    }

    #[test]
    fn higher_order_flavors() {
        assert_eq!(classify(&Kind::of(vec![Kind::first_order(1)])), "TagT");
        assert_eq!(
            TagFlavor::TagTK.kind().to_string(),
            "((* -> *), *) -> *"
        );
    }
}
