//! Handle migration: re-resolving a handle taken from one universe against
//! another universe's tables.

use crate::error::MigrationError;
use crate::handle::{Member, TypeHandle, TypeNode};
use crate::symbol::SymbolId;
use crate::universe::Universe;
use std::sync::Arc;

impl Universe {
    /// Rebuild `handle` against this universe, matching symbols by
    /// qualified name.
    ///
    /// A handle that already belongs here is returned as is, so resolving
    /// twice is the same as resolving once.
    pub fn resolve(self: &Arc<Self>, handle: &TypeHandle) -> Result<TypeHandle, MigrationError> {
        if handle.belongs_to(self) {
            return Ok(handle.clone());
        }

        let _guard = self.serialize_primitive();
        log::trace!(
            "universe {}: resolving {handle} from universe {}",
            self.id(),
            handle.universe().id()
        );

        let node = self.resolve_node(handle.universe(), handle.node())?;
        Ok(TypeHandle::new(self.clone(), node))
    }

    fn resolve_node(
        &self,
        source: &Universe,
        node: &Arc<TypeNode>,
    ) -> Result<Arc<TypeNode>, MigrationError> {
        let resolved = match node.as_ref() {
            TypeNode::Applied { symbol, args } => TypeNode::Applied {
                symbol: self.resolve_symbol(source, *symbol)?,
                args: args
                    .iter()
                    .map(|a| self.resolve_node(source, a))
                    .collect::<Result<Vec<_>, _>>()?,
            },
            TypeNode::Constructor { symbol } => TypeNode::Constructor {
                symbol: self.resolve_symbol(source, *symbol)?,
            },
            TypeNode::Param { .. } => return Ok(Arc::new(node.as_ref().clone())),
            TypeNode::Refinement { parents, members } => TypeNode::Refinement {
                parents: parents
                    .iter()
                    .map(|p| self.resolve_node(source, p))
                    .collect::<Result<Vec<_>, _>>()?,
                members: members
                    .iter()
                    .map(|m| -> Result<Member, MigrationError> {
                        Ok(Member {
                            name: m.name.clone(),
                            ty: self.resolve_node(source, &m.ty)?,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            },
        };
        Ok(Arc::new(resolved))
    }

    fn resolve_symbol(&self, source: &Universe, symbol: SymbolId) -> Result<SymbolId, MigrationError> {
        let source_sym = source.get(symbol).ok_or_else(|| MigrationError::MissingSymbol {
            universe: source.id().clone(),
            name: format!("#{}", symbol.index()),
        })?;
        let name = source_sym.name();
        let target_id = self
            .symbol_id(name)
            .ok_or_else(|| MigrationError::MissingSymbol {
                universe: self.id().clone(),
                name: name.to_string(),
            })?;
        let source_kind = source_sym.kind();
        let target_kind = self.get(target_id).map(|s| s.kind()).unwrap_or_default();
        if source_kind != target_kind {
            return Err(MigrationError::ShapeMismatch {
                universe: self.id().clone(),
                name: name.to_string(),
                source_kind,
                target_kind,
            });
        }
        Ok(target_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::decl::{ParamDecl, SymbolDecl};
    use crate::error::MigrationError;
    use crate::universe::Universe;
    use std::sync::Arc;

    fn universe(id: &str, list_params: usize) -> Arc<Universe> {
        let mut b = Universe::builder(id);
        b.declare(SymbolDecl::new("scala.Int")).unwrap();
        let mut list = SymbolDecl::new("scala.List");
        for i in 0..list_params {
            list = list.param(ParamDecl::covariant(format!("A{i}")));
        }
        b.declare(list).unwrap();
        b.build()
    }

    #[test]
    fn resolves_by_name() {
        let a = universe("a", 1);
        let b = universe("b", 1);
        let h = a
            .named("scala.List", vec![a.named("scala.Int", vec![]).unwrap()])
            .unwrap();
        let moved = b.resolve(&h).unwrap();
        assert!(moved.belongs_to(&b));
        assert_eq!(moved.to_string(), h.to_string());
        assert_eq!(a.capture(&h).unwrap(), b.capture(&moved).unwrap());
    }

    #[test]
    fn resolving_in_place_keeps_the_handle() {
        let a = universe("a", 1);
        let h = a.named("scala.Int", vec![]).unwrap();
        assert!(a.resolve(&h).unwrap().same_ref(&h));
    }

    #[test]
    fn missing_symbols_fail() {
        let a = universe("a", 1);
        let mut b = Universe::builder("b");
        b.declare(SymbolDecl::new("scala.Int")).unwrap();
        let b = b.build();
        let h = a.constructor("scala.List").unwrap();
        assert_eq!(
            b.resolve(&h).unwrap_err(),
            MigrationError::MissingSymbol {
                universe: b.id().clone(),
                name: "scala.List".into()
            }
        );
    }

    #[test]
    fn shape_changes_fail() {
        let a = universe("a", 1);
        let b = universe("b", 2);
        let h = a.constructor("scala.List").unwrap();
        assert!(matches!(
            b.resolve(&h),
            Err(MigrationError::ShapeMismatch { .. })
        ));
    }
}
