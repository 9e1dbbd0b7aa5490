//! Opaque reflective type references.
//!
//! A [`TypeHandle`] pairs a node tree with the universe whose symbol ids it
//! uses. Handles are only meaningful against that universe; moving one into
//! another universe goes through [`Universe::resolve`].

use crate::kind::Kind;
use crate::symbol::SymbolId;
use crate::universe::Universe;
use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;

/// Shape of a reflective type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeNode {
    /// A nominal type applied to all of its arguments (none for `Int`).
    Applied {
        symbol: SymbolId,
        args: Vec<Arc<TypeNode>>,
    },
    /// An unapplied type constructor such as `List` in `List[_]`.
    Constructor { symbol: SymbolId },
    /// A generic parameter with no binding.
    Param {
        owner: String,
        name: String,
        kind: Kind,
    },
    /// A structural type: every member of `parents` plus `members`.
    Refinement {
        parents: Vec<Arc<TypeNode>>,
        members: Vec<Member>,
    },
}

/// A structural member declaration inside a refinement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    pub name: String,
    pub ty: Arc<TypeNode>,
}

/// A type reference taken from a specific universe.
#[derive(Clone)]
pub struct TypeHandle {
    universe: Arc<Universe>,
    node: Arc<TypeNode>,
}

impl TypeHandle {
    pub(crate) fn new(universe: Arc<Universe>, node: Arc<TypeNode>) -> Self {
        Self { universe, node }
    }

    pub fn universe(&self) -> &Arc<Universe> {
        &self.universe
    }

    pub fn node(&self) -> &Arc<TypeNode> {
        &self.node
    }

    pub fn kind(&self) -> Kind {
        self.universe.kind_of(&self.node)
    }

    /// Reference identity: both handles point at the same node allocation.
    pub fn same_ref(&self, other: &TypeHandle) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Whether both handles were taken from the same universe snapshot.
    pub fn same_universe(&self, other: &TypeHandle) -> bool {
        Arc::ptr_eq(&self.universe, &other.universe)
    }

    pub fn belongs_to(&self, universe: &Universe) -> bool {
        std::ptr::eq(Arc::as_ptr(&self.universe), universe)
    }

    /// Feed the node's address into a hasher, matching [`Self::same_ref`].
    pub fn hash_ref<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.node), state);
    }

    /// The unapplied constructor behind an applied nominal type.
    ///
    /// `List[Int]` yields `List[_]`, never the applied form. Returns `None`
    /// for anything that is not a nominal application.
    pub fn type_constructor(&self) -> Option<TypeHandle> {
        match self.node.as_ref() {
            TypeNode::Applied { symbol, .. } => Some(self.with_node(TypeNode::Constructor {
                symbol: *symbol,
            })),
            _ => None,
        }
    }

    /// Parents and members of a refinement, as handles in the same universe.
    pub fn refinement_parts(&self) -> Option<(Vec<TypeHandle>, Vec<(String, TypeHandle)>)> {
        match self.node.as_ref() {
            TypeNode::Refinement { parents, members } => {
                let parents = parents
                    .iter()
                    .map(|p| TypeHandle::new(self.universe.clone(), p.clone()))
                    .collect();
                let members = members
                    .iter()
                    .map(|m| {
                        (
                            m.name.clone(),
                            TypeHandle::new(self.universe.clone(), m.ty.clone()),
                        )
                    })
                    .collect();
                Some((parents, members))
            }
            _ => None,
        }
    }

    fn with_node(&self, node: TypeNode) -> TypeHandle {
        TypeHandle::new(self.universe.clone(), Arc::new(node))
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(&self.universe, &self.node, f)
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHandle({}: {self})", self.universe.id())
    }
}

fn write_node(universe: &Universe, node: &TypeNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = |symbol: &SymbolId| {
        universe
            .get(*symbol)
            .map(|s| s.name().to_string())
            .unwrap_or_else(|| format!("<symbol {}>", symbol.0))
    };

    match node {
        TypeNode::Applied { symbol, args } => {
            write!(f, "{}", name(symbol))?;
            if !args.is_empty() {
                write!(f, "[")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_node(universe, a, f)?;
                }
                write!(f, "]")?;
            }
            Ok(())
        }
        TypeNode::Constructor { symbol } => {
            write!(f, "{}", name(symbol))?;
            if let Some(sym) = universe.get(*symbol)
                && !sym.params().is_empty()
            {
                write!(f, "[")?;
                for (i, p) in sym.params().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p.name)?;
                }
                write!(f, "]")?;
            }
            Ok(())
        }
        TypeNode::Param { name, .. } => write!(f, "{name}"),
        TypeNode::Refinement { parents, members } => {
            if parents.is_empty() && members.is_empty() {
                return write!(f, "{{}}");
            }
            for (i, p) in parents.iter().enumerate() {
                if i > 0 {
                    write!(f, " & ")?;
                }
                write_node(universe, p, f)?;
            }
            if !members.is_empty() {
                if !parents.is_empty() {
                    write!(f, " & ")?;
                }
                write!(f, "{{ ")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: ", m.name)?;
                    write_node(universe, &m.ty, f)?;
                }
                write!(f, " }}")?;
            }
            Ok(())
        }
    }
}
