//! Universes: immutable snapshots of the reflective type tables.
//!
//! Every handle, and therefore every witness built on one, is tied to the
//! universe it was taken from. Two universes may both declare
//! `scala.collection.immutable.List`; their symbol ids are unrelated and only
//! fingerprints compare across them.

use crate::decl::{SymbolDecl, TypeExprDecl, UniverseDecl};
use crate::error::UniverseError;
use crate::handle::{Member, TypeHandle, TypeNode};
use crate::kind::Kind;
use crate::symbol::{Symbol, SymbolId, TypeParam};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Human-readable universe identifier, used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniverseId(pub String);

impl UniverseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UniverseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A snapshot of the type tables.
///
/// Calls into the reflective primitives ([`Universe::capture`] and
/// [`Universe::resolve`]) are serialized per universe. Everything else is a
/// plain read of immutable data.
pub struct Universe {
    id: UniverseId,
    symbols: Vec<Symbol>,
    by_name: HashMap<String, SymbolId>,
    primitive_lock: Mutex<()>,
}

impl fmt::Debug for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Universe")
            .field("id", &self.id)
            .field("symbols", &self.symbols.len())
            .finish()
    }
}

impl Universe {
    pub fn builder(id: impl Into<String>) -> UniverseBuilder {
        UniverseBuilder {
            id: UniverseId::new(id),
            symbols: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Build a universe from a parsed declaration.
    pub fn from_decl(decl: UniverseDecl) -> Result<Arc<Self>, UniverseError> {
        let mut builder = Self::builder(decl.id);
        for symbol in decl.symbols {
            builder.declare(symbol)?;
        }
        Ok(builder.build())
    }

    /// Load a universe from a TOML declaration document.
    pub fn from_toml_str(src: &str) -> Result<Arc<Self>, UniverseError> {
        let decl: UniverseDecl = toml::from_str(src)?;
        Self::from_decl(decl)
    }

    pub fn id(&self) -> &UniverseId {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol_id(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbol_id(name).and_then(|id| self.get(id))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Shape of a node as seen by this universe's tables.
    pub fn kind_of(&self, node: &TypeNode) -> Kind {
        match node {
            TypeNode::Applied { .. } | TypeNode::Refinement { .. } => Kind::star(),
            TypeNode::Constructor { symbol } => {
                self.get(*symbol).map(Symbol::kind).unwrap_or_default()
            }
            TypeNode::Param { kind, .. } => kind.clone(),
        }
    }

    pub(crate) fn serialize_primitive(&self) -> MutexGuard<'_, ()> {
        // The lock guards no data, so a poisoned lock is still usable.
        self.primitive_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ── handle construction ────────────────────────────────────────────

    /// A nominal type applied to `args`; pass no args for a proper type.
    pub fn named(
        self: &Arc<Self>,
        name: &str,
        args: Vec<TypeHandle>,
    ) -> Result<TypeHandle, UniverseError> {
        let symbol = self
            .symbol_id(name)
            .ok_or_else(|| UniverseError::UnknownSymbol(name.to_string()))?;
        self.applied_symbol(symbol, &args)
    }

    /// The unapplied constructor of a symbol.
    pub fn constructor(self: &Arc<Self>, name: &str) -> Result<TypeHandle, UniverseError> {
        let symbol = self
            .symbol_id(name)
            .ok_or_else(|| UniverseError::UnknownSymbol(name.to_string()))?;
        Ok(TypeHandle::new(
            self.clone(),
            Arc::new(TypeNode::Constructor { symbol }),
        ))
    }

    /// An unbound generic parameter, as seen inside a generic definition.
    pub fn param(
        self: &Arc<Self>,
        owner: impl Into<String>,
        name: impl Into<String>,
        kind: Kind,
    ) -> TypeHandle {
        TypeHandle::new(
            self.clone(),
            Arc::new(TypeNode::Param {
                owner: owner.into(),
                name: name.into(),
                kind,
            }),
        )
    }

    /// Apply an unapplied constructor handle to arguments.
    pub fn apply(
        self: &Arc<Self>,
        constructor: &TypeHandle,
        args: &[TypeHandle],
    ) -> Result<TypeHandle, UniverseError> {
        self.check_local(constructor)?;
        match constructor.node().as_ref() {
            TypeNode::Constructor { symbol } => self.applied_symbol(*symbol, args),
            _ => Err(UniverseError::NotAConstructor(constructor.to_string())),
        }
    }

    /// A structural type with the given parents and member declarations.
    pub fn refinement(
        self: &Arc<Self>,
        parents: Vec<TypeHandle>,
        members: Vec<(String, TypeHandle)>,
    ) -> Result<TypeHandle, UniverseError> {
        let mut parent_nodes = Vec::with_capacity(parents.len());
        for parent in &parents {
            self.check_local(parent)?;
            self.check_proper(parent)?;
            parent_nodes.push(parent.node().clone());
        }
        let mut member_nodes = Vec::with_capacity(members.len());
        for (name, ty) in members {
            self.check_local(&ty)?;
            self.check_proper(&ty)?;
            member_nodes.push(Member {
                name,
                ty: ty.node().clone(),
            });
        }
        Ok(TypeHandle::new(
            self.clone(),
            Arc::new(TypeNode::Refinement {
                parents: parent_nodes,
                members: member_nodes,
            }),
        ))
    }

    /// The empty structural type `{}`, the neutral remainder of an intersection.
    pub fn empty_refinement(self: &Arc<Self>) -> TypeHandle {
        TypeHandle::new(
            self.clone(),
            Arc::new(TypeNode::Refinement {
                parents: Vec::new(),
                members: Vec::new(),
            }),
        )
    }

    fn applied_symbol(
        self: &Arc<Self>,
        symbol: SymbolId,
        args: &[TypeHandle],
    ) -> Result<TypeHandle, UniverseError> {
        let sym = self
            .get(symbol)
            .ok_or_else(|| UniverseError::UnknownSymbol(format!("#{}", symbol.index())))?;
        if sym.params.len() != args.len() {
            return Err(UniverseError::ArityMismatch {
                symbol: sym.name.clone(),
                expected: sym.params.len(),
                actual: args.len(),
            });
        }
        let mut nodes = Vec::with_capacity(args.len());
        for (arg, param) in args.iter().zip(&sym.params) {
            self.check_local(arg)?;
            let actual = arg.kind();
            if actual != param.kind {
                return Err(UniverseError::KindMismatch {
                    symbol: sym.name.clone(),
                    expected: param.kind.clone(),
                    actual,
                });
            }
            nodes.push(arg.node().clone());
        }
        Ok(TypeHandle::new(
            self.clone(),
            Arc::new(TypeNode::Applied {
                symbol,
                args: nodes,
            }),
        ))
    }

    fn check_local(&self, handle: &TypeHandle) -> Result<(), UniverseError> {
        if handle.belongs_to(self) {
            Ok(())
        } else {
            Err(UniverseError::ForeignHandle {
                expected: self.id.clone(),
                actual: handle.universe().id().clone(),
            })
        }
    }

    fn check_proper(&self, handle: &TypeHandle) -> Result<(), UniverseError> {
        let kind = handle.kind();
        if kind.is_star() {
            Ok(())
        } else {
            Err(UniverseError::KindMismatch {
                symbol: handle.to_string(),
                expected: Kind::star(),
                actual: kind,
            })
        }
    }
}

/// Incrementally declares symbols, validating each against those before it.
pub struct UniverseBuilder {
    id: UniverseId,
    symbols: Vec<Symbol>,
    by_name: HashMap<String, SymbolId>,
}

/// The symbol currently being declared.
struct DeclScope<'a> {
    owner: &'a str,
    id: SymbolId,
    params: &'a [TypeParam],
}

impl DeclScope<'_> {
    fn kind(&self) -> Kind {
        Kind::of(self.params.iter().map(|p| p.kind.clone()).collect())
    }
}

impl UniverseBuilder {
    /// Declare a symbol. Parent heads must already be declared; the symbol
    /// may mention itself inside parent arguments (`Int extends Ordered[Int]`).
    pub fn declare(&mut self, decl: SymbolDecl) -> Result<SymbolId, UniverseError> {
        if self.by_name.contains_key(&decl.name) {
            return Err(UniverseError::DuplicateSymbol(decl.name));
        }

        let mut params: Vec<TypeParam> = Vec::with_capacity(decl.params.len());
        for p in &decl.params {
            if params.iter().any(|q| q.name == p.name) {
                return Err(UniverseError::DuplicateParam {
                    symbol: decl.name.clone(),
                    param: p.name.clone(),
                });
            }
            params.push(TypeParam {
                name: p.name.clone(),
                kind: p.kind.clone(),
                variance: p.variance,
            });
        }

        let id = SymbolId(self.symbols.len() as u32);
        let scope = DeclScope {
            owner: &decl.name,
            id,
            params: &params,
        };
        let parents = decl
            .parents
            .iter()
            .map(|parent| self.resolve_parent(&scope, parent))
            .collect::<Result<Vec<_>, _>>()?;

        log::trace!("universe {}: declared {} as #{}", self.id, decl.name, id.0);
        self.by_name.insert(decl.name.clone(), id);
        self.symbols.push(Symbol {
            name: decl.name,
            params,
            parents,
        });
        Ok(id)
    }

    pub fn build(self) -> Arc<Universe> {
        Arc::new(Universe {
            id: self.id,
            symbols: self.symbols,
            by_name: self.by_name,
            primitive_lock: Mutex::new(()),
        })
    }

    fn resolve_parent(
        &self,
        scope: &DeclScope<'_>,
        expr: &TypeExprDecl,
    ) -> Result<Arc<TypeNode>, UniverseError> {
        match expr {
            TypeExprDecl::Param { param } => Err(UniverseError::ParentNotDeclared {
                symbol: scope.owner.to_string(),
                parent: param.clone(),
            }),
            TypeExprDecl::Named { name, .. } => {
                if name == scope.owner || !self.by_name.contains_key(name) {
                    return Err(UniverseError::ParentNotDeclared {
                        symbol: scope.owner.to_string(),
                        parent: name.clone(),
                    });
                }
                self.resolve_expr(scope, expr, &Kind::star())
            }
        }
    }

    fn resolve_expr(
        &self,
        scope: &DeclScope<'_>,
        expr: &TypeExprDecl,
        expected: &Kind,
    ) -> Result<Arc<TypeNode>, UniverseError> {
        match expr {
            TypeExprDecl::Param { param } => {
                let p = scope
                    .params
                    .iter()
                    .find(|p| &p.name == param)
                    .ok_or_else(|| UniverseError::UnknownParam {
                        symbol: scope.owner.to_string(),
                        param: param.clone(),
                    })?;
                if &p.kind != expected {
                    return Err(UniverseError::KindMismatch {
                        symbol: format!("{}.{}", scope.owner, p.name),
                        expected: expected.clone(),
                        actual: p.kind.clone(),
                    });
                }
                Ok(Arc::new(TypeNode::Param {
                    owner: scope.owner.to_string(),
                    name: p.name.clone(),
                    kind: p.kind.clone(),
                }))
            }
            TypeExprDecl::Named { name, args } => {
                let (symbol, kind) = if name == scope.owner {
                    (scope.id, scope.kind())
                } else {
                    let id = *self
                        .by_name
                        .get(name)
                        .ok_or_else(|| UniverseError::UnknownSymbol(name.clone()))?;
                    (id, self.symbols[id.index()].kind())
                };

                if expected.is_star() {
                    if args.len() != kind.arity() {
                        return Err(UniverseError::ArityMismatch {
                            symbol: name.clone(),
                            expected: kind.arity(),
                            actual: args.len(),
                        });
                    }
                    let args = args
                        .iter()
                        .zip(kind.params())
                        .map(|(arg, k)| self.resolve_expr(scope, arg, k))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Arc::new(TypeNode::Applied { symbol, args }))
                } else if args.is_empty() && &kind == expected {
                    Ok(Arc::new(TypeNode::Constructor { symbol }))
                } else {
                    Err(UniverseError::KindMismatch {
                        symbol: name.clone(),
                        expected: expected.clone(),
                        actual: if args.is_empty() { kind } else { Kind::star() },
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::ParamDecl;

    fn sample() -> Arc<Universe> {
        let mut b = Universe::builder("sample");
        b.declare(SymbolDecl::new("scala.Any")).unwrap();
        b.declare(SymbolDecl::new("scala.Int").parent(TypeExprDecl::simple("scala.Any")))
            .unwrap();
        b.declare(
            SymbolDecl::new("scala.Option")
                .param(ParamDecl::covariant("A"))
                .parent(TypeExprDecl::simple("scala.Any")),
        )
        .unwrap();
        b.declare(
            SymbolDecl::new("cats.Functor").param(ParamDecl::higher("F", Kind::first_order(1))),
        )
        .unwrap();
        b.build()
    }

    #[test]
    fn looks_up_symbols_by_name() {
        let u = sample();
        assert_eq!(u.len(), 4);
        assert_eq!(u.symbol("scala.Option").unwrap().kind(), Kind::first_order(1));
        assert!(u.symbol("scala.Nope").is_none());
    }

    #[test]
    fn rejects_duplicates_and_forward_parents() {
        let mut b = Universe::builder("bad");
        b.declare(SymbolDecl::new("a.A")).unwrap();
        assert!(matches!(
            b.declare(SymbolDecl::new("a.A")),
            Err(UniverseError::DuplicateSymbol(_))
        ));
        assert!(matches!(
            b.declare(SymbolDecl::new("a.B").parent(TypeExprDecl::simple("a.C"))),
            Err(UniverseError::ParentNotDeclared { .. })
        ));
        assert!(matches!(
            b.declare(SymbolDecl::new("a.D").parent(TypeExprDecl::simple("a.D"))),
            Err(UniverseError::ParentNotDeclared { .. })
        ));
    }

    #[test]
    fn rejects_bad_parent_arity_and_params() {
        let mut b = Universe::builder("bad");
        b.declare(SymbolDecl::new("a.Box").param(ParamDecl::invariant("A")))
            .unwrap();
        assert!(matches!(
            b.declare(SymbolDecl::new("a.Wrong").parent(TypeExprDecl::simple("a.Box"))),
            Err(UniverseError::ArityMismatch { expected: 1, actual: 0, .. })
        ));
        assert!(matches!(
            b.declare(
                SymbolDecl::new("a.Missing")
                    .parent(TypeExprDecl::named("a.Box", vec![TypeExprDecl::param("X")]))
            ),
            Err(UniverseError::UnknownParam { .. })
        ));
    }

    #[test]
    fn builds_handles_with_kind_checks() {
        let u = sample();
        let int = u.named("scala.Int", vec![]).unwrap();
        let opt_int = u.named("scala.Option", vec![int.clone()]).unwrap();
        assert_eq!(opt_int.to_string(), "scala.Option[scala.Int]");
        assert!(opt_int.kind().is_star());

        let option = u.constructor("scala.Option").unwrap();
        assert_eq!(option.kind(), Kind::first_order(1));
        assert_eq!(option.to_string(), "scala.Option[A]");
        let functor_option = u.named("cats.Functor", vec![option]).unwrap();
        assert_eq!(functor_option.to_string(), "cats.Functor[scala.Option]");

        assert!(matches!(
            u.named("cats.Functor", vec![int]),
            Err(UniverseError::KindMismatch { .. })
        ));
        assert!(matches!(
            u.named("scala.Option", vec![]),
            Err(UniverseError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn rejects_foreign_handles() {
        let a = sample();
        let b = sample();
        let int_a = a.named("scala.Int", vec![]).unwrap();
        assert!(matches!(
            b.named("scala.Option", vec![int_a]),
            Err(UniverseError::ForeignHandle { .. })
        ));
    }

    #[test]
    fn apply_requires_constructor() {
        let u = sample();
        let option = u.constructor("scala.Option").unwrap();
        let int = u.named("scala.Int", vec![]).unwrap();
        let applied = u.apply(&option, std::slice::from_ref(&int)).unwrap();
        assert_eq!(applied.to_string(), "scala.Option[scala.Int]");
        assert!(matches!(
            u.apply(&int, &[]),
            Err(UniverseError::NotAConstructor(_))
        ));
    }

    #[test]
    fn loads_from_toml() {
        let u = Universe::from_toml_str(
            r#"
id = "toml"

[[symbol]]
name = "scala.Any"

[[symbol]]
name = "scala.Ordered"
params = [{ name = "A", variance = "contravariant" }]

[[symbol]]
name = "scala.Int"
parents = [
  { name = "scala.Any" },
  { name = "scala.Ordered", args = [{ name = "scala.Int" }] },
]
"#,
        )
        .unwrap();
        assert_eq!(u.id().to_string(), "toml");
        assert_eq!(u.symbol("scala.Int").unwrap().parents().len(), 2);
    }

    #[test]
    fn reports_toml_errors() {
        assert!(matches!(
            Universe::from_toml_str("id = 3"),
            Err(UniverseError::Declaration(_))
        ));
    }
}
