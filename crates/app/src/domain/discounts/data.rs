//! Discounts Data

use boxoffice::{
    discounts::AppliesTo,
    ids::{GroupUuid, TicketPageUuid},
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::discounts::records::DiscountRuleUuid;

/// Discount Spec Data
///
/// The administrator-facing shape of a discount: minor units for amounts,
/// whole points for percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountSpec {
    /// Percentage off the cart subtotal (whole points, 1–100).
    PercentageOff { percentage: u16 },

    /// Fixed amount off in minor units, once per cart or once per attendee.
    AmountOff { amount: u64, applies_to: AppliesTo },
}

impl DiscountSpec {
    /// Stable string form for spans and storage.
    #[must_use]
    pub const fn kind_as_str(&self) -> &'static str {
        match self {
            Self::PercentageOff { .. } => "percentage_off",
            Self::AmountOff { .. } => "amount_off",
        }
    }
}

/// New Discount Rule Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiscountRule {
    pub uuid: DiscountRuleUuid,

    /// Leave unset to have a unique code generated at creation.
    pub code: Option<String>,

    pub discount: DiscountSpec,
    pub max_uses: u64,
    pub valid_from: Option<Timestamp>,
    pub valid_till: Option<Timestamp>,
    pub groups: Vec<GroupUuid>,
    pub ticket_pages: Vec<TicketPageUuid>,

    /// Only visible in the CMS; never evaluated.
    pub description: Option<String>,
}
