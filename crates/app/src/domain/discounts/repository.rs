//! Rule Catalog Repository

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::discounts::records::{DiscountRuleRecord, DiscountRuleUuid},
    storage::StorageError,
};

/// Outcome of attempting to reserve a coupon code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeReservation {
    /// The code is now held for the caller.
    Reserved,

    /// Another rule already owns the code.
    Conflict,
}

/// The storage collaborator owning discount rules, redemption counts, and
/// code uniqueness.
///
/// Implementations must make "count redemptions, then record the redemption"
/// atomic (a serializable transaction or a conditional increment); without
/// that, concurrent checkouts near the quota boundary can overshoot it and
/// the quota degrades to best effort. [`RuleCatalog::reserve_code`] must
/// enforce uniqueness at write time, not by a read-then-write race.
#[automock]
#[async_trait]
pub trait RuleCatalog: Send + Sync {
    /// Find the rule matching a submitted code. Exact, case-sensitive match.
    async fn find_by_code(&self, code: &str) -> Result<Option<DiscountRuleRecord>, StorageError>;

    /// Count the reservations that have redeemed the rule so far.
    async fn count_redemptions(&self, rule: DiscountRuleUuid) -> Result<u64, StorageError>;

    /// Reserve a candidate code, enforcing uniqueness at write time.
    async fn reserve_code(&self, code: &str) -> Result<CodeReservation, StorageError>;

    /// Persist a new rule under a previously reserved code.
    async fn create_rule(&self, rule: DiscountRuleRecord) -> Result<(), StorageError>;
}
