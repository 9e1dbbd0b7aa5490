//! Fingerprint capture: the reflective primitive turning a handle into its
//! structural identity.

use crate::error::CaptureError;
use crate::fingerprint::{BasesDb, Fingerprint, FingerprintNode, MemberSig};
use crate::handle::{TypeHandle, TypeNode};
use crate::symbol::{Symbol, SymbolId, TypeParam};
use crate::universe::Universe;
use std::sync::Arc;

impl Universe {
    /// Derive the fingerprint of a handle taken from this universe.
    ///
    /// Fails when the handle mentions an unbound generic parameter; callers
    /// that can live with reference identity use a weak witness instead.
    pub fn capture(&self, handle: &TypeHandle) -> Result<Fingerprint, CaptureError> {
        if !handle.belongs_to(self) {
            return Err(CaptureError::ForeignHandle {
                expected: self.id().clone(),
                actual: handle.universe().id().clone(),
            });
        }

        let _guard = self.serialize_primitive();
        log::trace!("universe {}: capturing {handle}", self.id());

        let node = self.fingerprint_node(handle.node())?;
        let mut bases = BasesDb::default();
        self.collect_bases(handle.node(), &mut bases)?;
        Ok(Fingerprint::new(node, bases))
    }

    fn symbol_for(&self, symbol: SymbolId) -> Result<&Symbol, CaptureError> {
        self.get(symbol).ok_or_else(|| CaptureError::UnknownSymbol {
            universe: self.id().clone(),
            index: symbol.index(),
        })
    }

    fn fingerprint_node(&self, node: &TypeNode) -> Result<FingerprintNode, CaptureError> {
        match node {
            TypeNode::Applied { symbol, args } => {
                let sym = self.symbol_for(*symbol)?;
                let args = args
                    .iter()
                    .map(|a| self.fingerprint_node(a))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FingerprintNode::Ref {
                    name: sym.name().to_string(),
                    args,
                })
            }
            TypeNode::Constructor { symbol } => {
                let sym = self.symbol_for(*symbol)?;
                // A nullary constructor is the proper type itself.
                if sym.params().is_empty() {
                    Ok(FingerprintNode::Ref {
                        name: sym.name().to_string(),
                        args: Vec::new(),
                    })
                } else {
                    Ok(FingerprintNode::Lambda {
                        name: sym.name().to_string(),
                        params: sym.kind().params().to_vec(),
                    })
                }
            }
            TypeNode::Param { owner, name, .. } => Err(CaptureError::Unresolved {
                owner: owner.clone(),
                name: name.clone(),
            }),
            TypeNode::Refinement { parents, members } => {
                let parents = parents
                    .iter()
                    .map(|p| self.fingerprint_node(p))
                    .collect::<Result<Vec<_>, _>>()?;
                let members = members
                    .iter()
                    .map(|m| -> Result<MemberSig, CaptureError> {
                        Ok(MemberSig {
                            name: m.name.clone(),
                            ty: self.fingerprint_node(&m.ty)?,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FingerprintNode::intersection(parents, members))
            }
        }
    }

    /// Record supertypes and variances for every nominal type under `node`.
    ///
    /// Entries are inserted before recursing, so self-referential parents
    /// such as `Int extends Ordered[Int]` terminate.
    fn collect_bases(&self, node: &TypeNode, bases: &mut BasesDb) -> Result<(), CaptureError> {
        match node {
            TypeNode::Applied { symbol, args } => self.collect_nominal(node, *symbol, args, bases),
            TypeNode::Constructor { symbol } => {
                let sym = self.symbol_for(*symbol)?;
                // Captures as a plain ref, so it needs the same parents.
                if sym.params().is_empty() {
                    return self.collect_nominal(node, *symbol, &[], bases);
                }
                bases
                    .variances
                    .entry(sym.name().to_string())
                    .or_insert_with(|| sym.variances());
                Ok(())
            }
            TypeNode::Param { .. } => Ok(()),
            TypeNode::Refinement { parents, members } => {
                for parent in parents {
                    self.collect_bases(parent, bases)?;
                }
                for member in members {
                    self.collect_bases(&member.ty, bases)?;
                }
                Ok(())
            }
        }
    }

    fn collect_nominal(
        &self,
        node: &TypeNode,
        symbol: SymbolId,
        args: &[Arc<TypeNode>],
        bases: &mut BasesDb,
    ) -> Result<(), CaptureError> {
        let sym = self.symbol_for(symbol)?;
        bases
            .variances
            .entry(sym.name().to_string())
            .or_insert_with(|| sym.variances());

        let key = self.fingerprint_node(node)?;
        if bases.parents.contains_key(&key) {
            return Ok(());
        }
        let parents: Vec<Arc<TypeNode>> = sym
            .parents()
            .iter()
            .map(|p| substitute(p, sym.name(), sym.params(), args))
            .collect();
        let parent_keys = parents
            .iter()
            .map(|p| self.fingerprint_node(p))
            .collect::<Result<Vec<_>, _>>()?;
        bases.parents.insert(key, parent_keys);

        for arg in args {
            self.collect_bases(arg, bases)?;
        }
        for parent in &parents {
            self.collect_bases(parent, bases)?;
        }
        Ok(())
    }
}

/// Replace `owner`'s parameters in `node` with the matching `args`.
pub(crate) fn substitute(
    node: &Arc<TypeNode>,
    owner: &str,
    params: &[TypeParam],
    args: &[Arc<TypeNode>],
) -> Arc<TypeNode> {
    match node.as_ref() {
        TypeNode::Param { owner: o, name, .. } if o == owner => params
            .iter()
            .position(|p| &p.name == name)
            .and_then(|i| args.get(i))
            .cloned()
            .unwrap_or_else(|| node.clone()),
        TypeNode::Applied { symbol, args: inner } => Arc::new(TypeNode::Applied {
            symbol: *symbol,
            args: inner
                .iter()
                .map(|a| substitute(a, owner, params, args))
                .collect(),
        }),
        TypeNode::Refinement { parents, members } => Arc::new(TypeNode::Refinement {
            parents: parents
                .iter()
                .map(|p| substitute(p, owner, params, args))
                .collect(),
            members: members
                .iter()
                .map(|m| crate::handle::Member {
                    name: m.name.clone(),
                    ty: substitute(&m.ty, owner, params, args),
                })
                .collect(),
        }),
        TypeNode::Param { .. } | TypeNode::Constructor { .. } => node.clone(),
    }
}
