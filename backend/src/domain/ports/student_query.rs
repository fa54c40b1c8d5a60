//! Driving port for student lookups.

use async_trait::async_trait;

use crate::domain::{Error, MobileNumber, StoredStudent};

/// Read-side use cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentQuery: Send + Sync {
    /// Find the first row whose stored mobile number normalises to `mobile`.
    async fn find_by_mobile(&self, mobile: &MobileNumber) -> Result<Option<StoredStudent>, Error>;

    /// Every student row, in sheet order.
    async fn list_students(&self) -> Result<Vec<StoredStudent>, Error>;
}

/// Fixture query backed by an empty sheet.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStudentQuery;

#[async_trait]
impl StudentQuery for FixtureStudentQuery {
    async fn find_by_mobile(
        &self,
        _mobile: &MobileNumber,
    ) -> Result<Option<StoredStudent>, Error> {
        Ok(None)
    }

    async fn list_students(&self) -> Result<Vec<StoredStudent>, Error> {
        Ok(Vec::new())
    }
}
