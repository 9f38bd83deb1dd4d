//! Discounts
//!
//! The discount shapes a rule can carry and the arithmetic that turns one
//! into a minor-unit price delta.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely represented.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Scaling a fixed amount by the attendee count overflowed.
    #[error("discount amount overflowed")]
    AmountOverflow,

    /// The discount and the reservation subtotal use different currencies.
    #[error("discount currency {discount} does not match reservation currency {reservation}")]
    CurrencyMismatch {
        /// ISO code of the discount amount's currency.
        discount: &'static str,

        /// ISO code of the reservation subtotal's currency.
        reservation: &'static str,
    },
}

/// Whether a fixed amount is subtracted once or multiplied per attendee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliesTo {
    /// Subtract the amount once from the cart subtotal.
    Cart,

    /// Subtract the amount once per attendee on the reservation.
    EachAttendee,
}

impl AppliesTo {
    /// Stable string form, used in spans and persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::EachAttendee => "each_attendee",
        }
    }
}

/// A single discount configuration.
#[derive(Debug, Clone, Copy)]
pub enum Discount<'a> {
    /// Percentage off the cart subtotal.
    ///
    /// A percentage is always computed over the whole cart, regardless of the
    /// attendee count.
    PercentageOff(Percentage),

    /// Fixed amount off, applied once per cart or once per attendee.
    AmountOff {
        /// Amount subtracted per application.
        amount: Money<'a, Currency>,

        /// How often the amount is applied.
        applies_to: AppliesTo,
    },
}

impl<'a> Discount<'a> {
    /// The scope recorded on a resulting price modification.
    #[must_use]
    pub const fn applies_to(&self) -> AppliesTo {
        match self {
            Self::PercentageOff(_) => AppliesTo::Cart,
            Self::AmountOff { applies_to, .. } => *applies_to,
        }
    }

    /// Raw delta in minor units, before the floor-at-zero cap.
    pub(crate) fn delta_minor(
        &self,
        subtotal: Money<'a, Currency>,
        attendee_count: usize,
    ) -> Result<i64, DiscountError> {
        match self {
            Self::PercentageOff(percent) => percent_of_minor(percent, subtotal.to_minor_units()),
            Self::AmountOff { amount, applies_to } => {
                if amount.currency() != subtotal.currency() {
                    return Err(DiscountError::CurrencyMismatch {
                        discount: amount.currency().iso_alpha_code,
                        reservation: subtotal.currency().iso_alpha_code,
                    });
                }

                let applications = match applies_to {
                    AppliesTo::Cart => 1_i64,
                    AppliesTo::EachAttendee => i64::try_from(attendee_count)
                        .ok()
                        .ok_or(DiscountError::AmountOverflow)?,
                };

                amount
                    .to_minor_units()
                    .checked_mul(applications)
                    .ok_or(DiscountError::AmountOverflow)
            }
        }
    }
}

impl fmt::Display for Discount<'_> {
    /// Summary form for CMS tables and receipts: `% 10` or the money amount.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PercentageOff(percent) => {
                write!(f, "% {}", ((*percent) * Decimal::ONE_HUNDRED).normalize())
            }
            Self::AmountOff { amount, .. } => fmt::Display::fmt(amount, f),
        }
    }
}

/// Build a [`Percentage`] from whole percentage points (`10` → 10 %).
#[must_use]
pub fn percent_points(points: u16) -> Percentage {
    Percentage::from(Decimal::new(i64::from(points), 2))
}

/// Percentage of a minor-unit amount, rounded half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] when the multiplication
/// overflows the [`Decimal`] range or the rounded result does not fit an
/// `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    // The decimal_percentage crate keeps its inner Decimal private; a
    // multiplication by one recovers the factor.
    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
