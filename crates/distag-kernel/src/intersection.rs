//! Intersection witnesses: `A & B & { members }`.

use crate::error::{ConstructionError, TagError};
use crate::tag::Tag;
use distag_universe::TypeHandle;

impl Tag {
    /// Witness for a type having every member of `parents` plus the members
    /// declared by `remainder`.
    ///
    /// A refinement remainder contributes its own parents and members; any
    /// other proper type joins as one more parent. Parent order is kept in
    /// the synthesized handle but does not affect the fingerprint. With no
    /// parents the result is the remainder itself.
    pub fn intersected(parents: &[Tag], remainder: &TypeHandle) -> Result<Tag, TagError> {
        if let Some(first) = parents.first() {
            for parent in &parents[1..] {
                if !parent.handle().same_universe(first.handle()) {
                    return Err(ConstructionError::UniverseMismatch {
                        expected: first.universe().id().clone(),
                        actual: parent.universe().id().clone(),
                    }
                    .into());
                }
            }
            if !remainder.same_universe(first.handle()) {
                return Err(ConstructionError::ForeignRemainder {
                    parents: first.universe().id().clone(),
                    remainder: remainder.universe().id().clone(),
                }
                .into());
            }
        }
        if !remainder.kind().is_star() {
            return Err(ConstructionError::NotAType(remainder.to_string()).into());
        }

        let mut handles: Vec<TypeHandle> = parents.iter().map(|t| t.handle().clone()).collect();
        let members = match remainder.refinement_parts() {
            Some((remainder_parents, members)) => {
                handles.extend(remainder_parents);
                members
            }
            None => {
                handles.push(remainder.clone());
                Vec::new()
            }
        };

        let synthesized = remainder.universe().refinement(handles, members)?;
        Tag::from_handle(synthesized)
    }
}
