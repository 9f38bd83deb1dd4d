//! Reservations Repository

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::reservations::records::{ReservationSnapshot, ReservationUuid},
    storage::StorageError,
};

/// Read-only access to reservations under checkout.
///
/// The evaluator never mutates a reservation; applying and persisting an
/// accepted price modification is the checkout flow's job.
#[automock]
#[async_trait]
pub trait ReservationsRepository: Send + Sync {
    /// Fetch the snapshot the validator consumes; `None` when no such
    /// reservation exists.
    async fn get_snapshot(
        &self,
        reservation: ReservationUuid,
    ) -> Result<Option<ReservationSnapshot>, StorageError>;
}
