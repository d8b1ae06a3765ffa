//! Optimistic concurrency for stored records.

use crate::error::{DomainError, DomainResult};

/// Version a writer read before changing a record.
///
/// Stores compare it with the stored version on update and soft delete; a
/// mismatch means another handle wrote in between.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ExpectedVersion(pub u64);

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        self.0 == actual
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "stale record version (read: {}, stored: {actual})",
                self.0
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_versions_pass() {
        assert!(ExpectedVersion(3).matches(3));
        assert!(ExpectedVersion(3).check(3).is_ok());
    }

    #[test]
    fn mismatch_is_a_conflict() {
        let err = ExpectedVersion(3).check(4).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
