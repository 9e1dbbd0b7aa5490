//! Structural type fingerprints.
//!
//! A fingerprint is the universe-independent identity of a type: it is
//! built from fully qualified names only, so the same type captured in two
//! universes yields equal fingerprints. Alongside the structural node each
//! fingerprint carries a bases database (direct supertypes and declared
//! variances of every nominal type it mentions), which lets
//! [`Fingerprint::is_subtype_of`] run without access to any universe.

use crate::error::MigrationError;
use crate::kind::Kind;
use crate::symbol::{Variance, short_name};
use crate::universe::Universe;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Structural encoding of a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum FingerprintNode {
    /// A nominal type and its arguments.
    Ref {
        name: String,
        args: Vec<FingerprintNode>,
    },
    /// An unapplied constructor with its parameter shapes.
    Lambda { name: String, params: Vec<Kind> },
    /// A conjunction of parents plus structural members.
    Intersection {
        parents: Vec<FingerprintNode>,
        members: Vec<MemberSig>,
    },
}

/// A structural member as it contributes to identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberSig {
    pub name: String,
    pub ty: FingerprintNode,
}

impl FingerprintNode {
    /// Normalized intersection.
    ///
    /// Nested intersections are flattened, parents and members are sorted
    /// and de-duplicated, and a lone parent without members is returned as
    /// itself. The result does not depend on the order of `parents`.
    pub fn intersection(parents: Vec<FingerprintNode>, members: Vec<MemberSig>) -> Self {
        let mut flat_parents = Vec::with_capacity(parents.len());
        let mut flat_members = members;
        for parent in parents {
            match parent {
                FingerprintNode::Intersection { parents, members } => {
                    flat_parents.extend(parents);
                    flat_members.extend(members);
                }
                other => flat_parents.push(other),
            }
        }
        flat_parents.sort();
        flat_parents.dedup();
        flat_members.sort();
        flat_members.dedup();

        if flat_members.is_empty() && flat_parents.len() == 1 {
            return flat_parents.remove(0);
        }
        FingerprintNode::Intersection {
            parents: flat_parents,
            members: flat_members,
        }
    }

    /// Qualified name of the head constructor, if nominal.
    pub fn name(&self) -> Option<&str> {
        match self {
            FingerprintNode::Ref { name, .. } | FingerprintNode::Lambda { name, .. } => Some(name),
            FingerprintNode::Intersection { .. } => None,
        }
    }

    pub fn render(&self, mode: RenderMode) -> String {
        let mut out = String::new();
        self.render_into(mode, &mut out);
        out
    }

    fn render_into(&self, mode: RenderMode, out: &mut String) {
        let display_name = |name: &str| match mode {
            RenderMode::Short => short_name(name).to_string(),
            RenderMode::Qualified => name.to_string(),
        };

        match self {
            FingerprintNode::Ref { name, args } => {
                out.push_str(&display_name(name));
                if !args.is_empty() {
                    out.push('[');
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        a.render_into(mode, out);
                    }
                    out.push(']');
                }
            }
            FingerprintNode::Lambda { name, params } => {
                out.push_str(&display_name(name));
                out.push('[');
                for (i, k) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_hole(k, out);
                }
                out.push(']');
            }
            FingerprintNode::Intersection { parents, members } => {
                if parents.is_empty() && members.is_empty() {
                    out.push_str("{}");
                    return;
                }
                for (i, p) in parents.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" & ");
                    }
                    p.render_into(mode, out);
                }
                if !members.is_empty() {
                    if !parents.is_empty() {
                        out.push_str(" & ");
                    }
                    out.push_str("{ ");
                    for (i, m) in members.iter().enumerate() {
                        if i > 0 {
                            out.push_str("; ");
                        }
                        out.push_str(&m.name);
                        out.push_str(": ");
                        m.ty.render_into(mode, out);
                    }
                    out.push_str(" }");
                }
            }
        }
    }

    /// Kind of the type this node denotes: `*` unless it is a lambda.
    pub fn kind(&self) -> Kind {
        match self {
            FingerprintNode::Lambda { params, .. } => Kind::of(params.clone()),
            FingerprintNode::Ref { .. } | FingerprintNode::Intersection { .. } => Kind::star(),
        }
    }

    /// Every nominal head under this node, with the constructor kind its
    /// use implies.
    pub(crate) fn visit_names<'a>(&'a self, f: &mut impl FnMut(&'a str, Kind)) {
        match self {
            FingerprintNode::Ref { name, args } => {
                f(name, Kind::of(args.iter().map(FingerprintNode::kind).collect()));
                for a in args {
                    a.visit_names(f);
                }
            }
            FingerprintNode::Lambda { name, params } => f(name, Kind::of(params.clone())),
            FingerprintNode::Intersection { parents, members } => {
                for p in parents {
                    p.visit_names(f);
                }
                for m in members {
                    m.ty.visit_names(f);
                }
            }
        }
    }
}

fn render_hole(kind: &Kind, out: &mut String) {
    out.push('_');
    if !kind.is_star() {
        out.push('[');
        for (i, k) in kind.params().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_hole(k, out);
        }
        out.push(']');
    }
}

/// How names are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Last segment of each name. Readable, not guaranteed unique.
    #[default]
    Short,
    /// Fully qualified names. Distinct fingerprints never render alike.
    Qualified,
}

/// Supertype and variance facts for the nominal types a fingerprint mentions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasesDb {
    pub(crate) parents: BTreeMap<FingerprintNode, Vec<FingerprintNode>>,
    pub(crate) variances: BTreeMap<String, Vec<Variance>>,
}

impl BasesDb {
    pub fn parents_of(&self, node: &FingerprintNode) -> Option<&[FingerprintNode]> {
        self.parents.get(node).map(Vec::as_slice)
    }

    pub fn variances_of(&self, name: &str) -> Option<&[Variance]> {
        self.variances.get(name).map(Vec::as_slice)
    }
}

/// Identity of a captured type.
///
/// Equality and hashing look at the structural node only; the bases
/// database rides along for subtype checks.
#[derive(Clone)]
pub struct Fingerprint {
    node: Arc<FingerprintNode>,
    bases: Arc<BasesDb>,
}

impl Fingerprint {
    pub(crate) fn new(node: FingerprintNode, bases: BasesDb) -> Self {
        Self {
            node: Arc::new(node),
            bases: Arc::new(bases),
        }
    }

    pub fn node(&self) -> &FingerprintNode {
        &self.node
    }

    pub fn bases(&self) -> &BasesDb {
        &self.bases
    }

    /// Arguments of a nominal application, empty for anything else.
    pub fn type_args(&self) -> &[FingerprintNode] {
        match self.node.as_ref() {
            FingerprintNode::Ref { args, .. } => args,
            _ => &[],
        }
    }

    /// Parents of an intersection; a non-intersection is its own sole parent.
    pub fn intersection_parents(&self) -> Vec<&FingerprintNode> {
        match self.node.as_ref() {
            FingerprintNode::Intersection { parents, .. } => parents.iter().collect(),
            other => vec![other],
        }
    }

    pub fn render(&self, mode: RenderMode) -> String {
        self.node.render(mode)
    }

    /// Stable, process-independent key: sha256 of the qualified rendering.
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(self.render(RenderMode::Qualified).as_bytes());
        format!("{hash:x}")
    }

    /// Re-home this fingerprint in `target`.
    ///
    /// Fingerprints are name-based, so the result is structurally identical;
    /// the check is that every constructor named here exists in the target
    /// with the same parameter shape.
    pub fn migrate(&self, target: &Universe) -> Result<Fingerprint, MigrationError> {
        let mut failure = None;
        self.node.visit_names(&mut |name, source_kind| {
            if failure.is_some() {
                return;
            }
            match target.symbol(name) {
                None => {
                    failure = Some(MigrationError::MissingSymbol {
                        universe: target.id().clone(),
                        name: name.to_string(),
                    });
                }
                Some(sym) => {
                    let target_kind = sym.kind();
                    if source_kind != target_kind {
                        failure = Some(MigrationError::ShapeMismatch {
                            universe: target.id().clone(),
                            name: name.to_string(),
                            source_kind,
                            target_kind,
                        });
                    }
                }
            }
        });
        match failure {
            Some(err) => Err(err),
            None => Ok(self.clone()),
        }
    }
}

impl PartialEq for Fingerprint {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Fingerprint {}

impl Hash for Fingerprint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.node.serialize(serializer)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if f.alternate() {
            RenderMode::Qualified
        } else {
            RenderMode::Short
        };
        write!(f, "{}", self.render(mode))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.render(RenderMode::Qualified))
    }
}
