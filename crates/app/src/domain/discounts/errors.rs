//! Discounts service errors.

use boxoffice::discounts::DiscountError;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum DiscountsServiceError {
    /// An administrator-supplied code collided with an existing rule.
    #[error("discount rule already exists")]
    AlreadyExists,

    #[error("reservation not found")]
    ReservationNotFound,

    #[error("invalid data")]
    InvalidData,

    /// Every generated candidate collided; a configuration problem, not a
    /// user input problem.
    #[error("could not reserve a unique coupon code")]
    CodeGeneration,

    /// A minor-unit amount does not fit the engine's arithmetic range.
    #[error("amount out of range")]
    AmountOutOfRange,

    #[error(transparent)]
    Pricing(#[from] DiscountError),

    #[error("storage error")]
    Storage(#[from] StorageError),
}
