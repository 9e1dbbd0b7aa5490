//! The subtype predicate over fingerprints.
//!
//! Nominal types conform through their declared parents, applications of
//! the same constructor compare arguments by declared variance, and
//! intersections conform component-wise. Structural members are only
//! carried by intersections. Unapplied constructors conform only to
//! themselves.

use crate::fingerprint::{BasesDb, Fingerprint, FingerprintNode, MemberSig};
use crate::symbol::Variance;

impl Fingerprint {
    /// Whether a value of `self`'s type can be used where `other` is expected.
    pub fn is_subtype_of(&self, other: &Fingerprint) -> bool {
        let dbs = [self.bases(), other.bases()];
        conforms(self.node(), other.node(), &dbs)
    }
}

fn conforms(a: &FingerprintNode, b: &FingerprintNode, dbs: &[&BasesDb; 2]) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (_, FingerprintNode::Intersection { parents, members }) => {
            parents.iter().all(|p| conforms(a, p, dbs))
                && members.iter().all(|m| has_member(a, m))
        }
        (FingerprintNode::Intersection { parents, .. }, _) => {
            parents.iter().any(|p| conforms(p, b, dbs))
        }
        (
            FingerprintNode::Ref {
                name: left,
                args: left_args,
            },
            FingerprintNode::Ref {
                name: right,
                args: right_args,
            },
        ) if left == right && args_conform(left, left_args, right_args, dbs) => true,
        (FingerprintNode::Ref { .. }, _) => parents_of(a, dbs)
            .iter()
            .any(|parent| conforms(parent, b, dbs)),
        (FingerprintNode::Lambda { .. }, _) => false,
    }
}

fn args_conform(
    name: &str,
    left: &[FingerprintNode],
    right: &[FingerprintNode],
    dbs: &[&BasesDb; 2],
) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let variances = dbs
        .iter()
        .find_map(|db| db.variances_of(name))
        .unwrap_or(&[]);
    left.iter().zip(right).enumerate().all(|(i, (l, r))| {
        match variances.get(i).copied().unwrap_or_default() {
            Variance::Invariant => l == r,
            Variance::Covariant => conforms(l, r, dbs),
            Variance::Contravariant => conforms(r, l, dbs),
        }
    })
}

fn parents_of<'a>(node: &FingerprintNode, dbs: &[&'a BasesDb; 2]) -> &'a [FingerprintNode] {
    dbs.iter()
        .copied()
        .find_map(|db| db.parents_of(node))
        .unwrap_or(&[])
}

fn has_member(node: &FingerprintNode, member: &MemberSig) -> bool {
    match node {
        FingerprintNode::Intersection { parents, members } => {
            members.contains(member) || parents.iter().any(|p| has_member(p, member))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::decl::{ParamDecl, SymbolDecl, TypeExprDecl};
    use crate::fingerprint::Fingerprint;
    use crate::handle::TypeHandle;
    use crate::universe::Universe;
    use std::sync::Arc;

    fn universe() -> Arc<Universe> {
        let mut b = Universe::builder("sub");
        b.declare(SymbolDecl::new("scala.Any")).unwrap();
        b.declare(SymbolDecl::new("scala.Animal").parent(TypeExprDecl::simple("scala.Any")))
            .unwrap();
        b.declare(SymbolDecl::new("scala.Cat").parent(TypeExprDecl::simple("scala.Animal")))
            .unwrap();
        b.declare(SymbolDecl::new("scala.Box").param(ParamDecl::covariant("A")))
            .unwrap();
        b.declare(SymbolDecl::new("scala.Cell").param(ParamDecl::invariant("A")))
            .unwrap();
        b.declare(SymbolDecl::new("scala.Sink").param(ParamDecl::contravariant("A")))
            .unwrap();
        b.declare(
            SymbolDecl::new("scala.FancyBox")
                .param(ParamDecl::covariant("A"))
                .parent(TypeExprDecl::named("scala.Box", vec![TypeExprDecl::param("A")])),
        )
        .unwrap();
        b.build()
    }

    fn fp(u: &Arc<Universe>, h: &TypeHandle) -> Fingerprint {
        u.capture(h).unwrap()
    }

    fn ty(u: &Arc<Universe>, name: &str) -> TypeHandle {
        u.named(name, vec![]).unwrap()
    }

    fn app(u: &Arc<Universe>, name: &str, arg: &TypeHandle) -> TypeHandle {
        u.named(name, vec![arg.clone()]).unwrap()
    }

    #[test]
    fn nominal_chain() {
        let u = universe();
        let cat = fp(&u, &ty(&u, "scala.Cat"));
        let any = fp(&u, &ty(&u, "scala.Any"));
        assert!(cat.is_subtype_of(&any));
        assert!(cat.is_subtype_of(&cat));
        assert!(!any.is_subtype_of(&cat));
    }

    #[test]
    fn variance() {
        let u = universe();
        let cat = ty(&u, "scala.Cat");
        let animal = ty(&u, "scala.Animal");

        let box_cat = fp(&u, &app(&u, "scala.Box", &cat));
        let box_animal = fp(&u, &app(&u, "scala.Box", &animal));
        assert!(box_cat.is_subtype_of(&box_animal));
        assert!(!box_animal.is_subtype_of(&box_cat));

        let cell_cat = fp(&u, &app(&u, "scala.Cell", &cat));
        let cell_animal = fp(&u, &app(&u, "scala.Cell", &animal));
        assert!(!cell_cat.is_subtype_of(&cell_animal));

        let sink_cat = fp(&u, &app(&u, "scala.Sink", &cat));
        let sink_animal = fp(&u, &app(&u, "scala.Sink", &animal));
        assert!(sink_animal.is_subtype_of(&sink_cat));
        assert!(!sink_cat.is_subtype_of(&sink_animal));
    }

    #[test]
    fn parents_with_arguments() {
        let u = universe();
        let cat = ty(&u, "scala.Cat");
        let animal = ty(&u, "scala.Animal");
        let fancy_cat = fp(&u, &app(&u, "scala.FancyBox", &cat));
        let box_animal = fp(&u, &app(&u, "scala.Box", &animal));
        assert!(fancy_cat.is_subtype_of(&box_animal));
    }

    #[test]
    fn intersections_and_members() {
        let u = universe();
        let cat = ty(&u, "scala.Cat");
        let boxed = app(&u, "scala.Box", &cat);
        let both = u.refinement(vec![cat.clone(), boxed.clone()], vec![]).unwrap();
        let both_fp = fp(&u, &both);
        assert!(both_fp.is_subtype_of(&fp(&u, &cat)));
        assert!(both_fp.is_subtype_of(&fp(&u, &boxed)));
        assert!(!fp(&u, &cat).is_subtype_of(&both_fp));

        let sized = u
            .refinement(vec![], vec![("size".into(), ty(&u, "scala.Any"))])
            .unwrap();
        let cat_sized = u
            .refinement(vec![cat.clone()], vec![("size".into(), ty(&u, "scala.Any"))])
            .unwrap();
        assert!(fp(&u, &cat_sized).is_subtype_of(&fp(&u, &sized)));
        assert!(!fp(&u, &cat).is_subtype_of(&fp(&u, &sized)));
        assert!(fp(&u, &cat).is_subtype_of(&fp(&u, &u.empty_refinement())));
    }

    #[test]
    fn lambdas_only_conform_to_themselves() {
        let u = universe();
        let boxc = fp(&u, &u.constructor("scala.Box").unwrap());
        let fancy = fp(&u, &u.constructor("scala.FancyBox").unwrap());
        assert!(boxc.is_subtype_of(&boxc));
        assert!(!fancy.is_subtype_of(&boxc));
    }
}
