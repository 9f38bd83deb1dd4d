//! Discounts Records

use boxoffice::{
    discounts::AppliesTo,
    ids::{GroupUuid, TicketPageUuid, TypedUuid},
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::{discounts::data::DiscountSpec, reservations::records::ReservationUuid};

/// Discount Rule UUID
pub type DiscountRuleUuid = TypedUuid<DiscountRuleRecord>;

/// Discount Rule Record
///
/// The catalog's persisted form of one coupon rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRuleRecord {
    pub uuid: DiscountRuleUuid,
    pub code: String,
    pub discount: DiscountSpec,
    pub max_uses: u64,
    pub valid_from: Option<Timestamp>,
    pub valid_till: Option<Timestamp>,
    pub groups: Vec<GroupUuid>,
    pub ticket_pages: Vec<TicketPageUuid>,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// Price Modification UUID
pub type PriceModificationUuid = TypedUuid<PriceModificationRecord>;

/// Price Modification Record
///
/// The deduction actually applied for one rule/reservation pairing. The
/// checkout flow persists this next to the reservation, so a later
/// recalculation replays the recorded amount instead of re-running the
/// formula against possibly-changed attendees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceModificationRecord {
    pub uuid: PriceModificationUuid,
    pub reservation_uuid: ReservationUuid,
    pub rule_uuid: DiscountRuleUuid,
    pub code: String,
    /// Amount subtracted, in minor units. Already capped so the reservation
    /// total never drops below zero.
    pub amount_off: u64,
    pub applies_to: AppliesTo,
    pub created_at: Timestamp,
}

impl PriceModificationRecord {
    /// Re-apply the recorded deduction to a subtotal in minor units.
    #[must_use]
    pub const fn apply_to(&self, subtotal: u64) -> u64 {
        subtotal.saturating_sub(self.amount_off)
    }
}
