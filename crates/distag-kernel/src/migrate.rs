//! Moving witnesses between universes.
//!
//! A witness built while inspecting one universe must be migrated before it
//! is stored or compared by logic running against another. Migration
//! re-resolves the handle by name, re-captures it in the target, and
//! insists the structural fingerprint is unchanged. Migrating into the
//! universe a witness already lives in returns it as is.

use crate::hktag::HKTag;
use crate::tag::Tag;
use crate::weak::WeakTag;
use distag_universe::{Fingerprint, MigrationError, TypeHandle, Universe};
use std::sync::Arc;

/// Re-resolve a value against another universe.
pub trait Migrate: Sized {
    fn migrate(&self, target: &Arc<Universe>) -> Result<Self, MigrationError>;
}

impl Migrate for TypeHandle {
    fn migrate(&self, target: &Arc<Universe>) -> Result<Self, MigrationError> {
        target.resolve(self)
    }
}

/// Resolve and re-capture, checking the fingerprint survived.
fn migrate_captured(
    handle: &TypeHandle,
    fingerprint: &Fingerprint,
    target: &Arc<Universe>,
) -> Result<(TypeHandle, Fingerprint), MigrationError> {
    let migrated = target.resolve(handle)?;
    let expected = fingerprint.migrate(target)?;
    let recaptured = target.capture(&migrated)?;
    if recaptured != expected {
        return Err(MigrationError::FingerprintDrift {
            before: format!("{expected:#}"),
            after: format!("{recaptured:#}"),
        });
    }
    Ok((migrated, recaptured))
}

fn log_failure<T>(
    result: Result<T, MigrationError>,
    target: &Universe,
) -> Result<T, MigrationError> {
    if let Err(err) = &result {
        log::debug!("migration into universe {} failed: {err}", target.id());
    }
    result
}

impl Migrate for Tag {
    fn migrate(&self, target: &Arc<Universe>) -> Result<Self, MigrationError> {
        if self.handle.belongs_to(target) {
            return Ok(self.clone());
        }
        let (handle, fingerprint) =
            log_failure(migrate_captured(&self.handle, &self.fingerprint, target), target)?;
        Ok(Tag {
            handle,
            fingerprint,
        })
    }
}

impl Migrate for HKTag {
    fn migrate(&self, target: &Arc<Universe>) -> Result<Self, MigrationError> {
        if self.handle.belongs_to(target) {
            return Ok(self.clone());
        }
        let (handle, fingerprint) =
            log_failure(migrate_captured(&self.handle, &self.fingerprint, target), target)?;
        Ok(HKTag {
            handle,
            kind: self.kind.clone(),
            fingerprint,
        })
    }
}

impl Migrate for WeakTag {
    fn migrate(&self, target: &Arc<Universe>) -> Result<Self, MigrationError> {
        if self.handle.belongs_to(target) {
            return Ok(self.clone());
        }
        match &self.fingerprint {
            Some(fingerprint) => {
                let (handle, fingerprint) =
                    log_failure(migrate_captured(&self.handle, fingerprint, target), target)?;
                Ok(WeakTag {
                    handle,
                    fingerprint: Some(fingerprint),
                })
            }
            None => {
                let handle = log_failure(target.resolve(&self.handle), target)?;
                Ok(WeakTag::from_handle(handle))
            }
        }
    }
}
