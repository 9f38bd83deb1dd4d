//! Evaluation
//!
//! The ordered check pipeline that decides whether a resolved rule is
//! redeemable against a reservation. A single linear pass: quota, window,
//! event, groups, then pricing. The first failing check wins, so the
//! user-facing message is deterministic.

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    discounts::DiscountError,
    reservation::Reservation,
    rules::{DiscountRule, PriceModification},
};

/// Why a coupon was refused.
///
/// Every variant is an expected, user-facing outcome. The caller chooses the
/// localized message per kind; the engine never formats for end users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No rule matches the submitted code.
    #[error("coupon code not found")]
    NotFound,

    /// The usage quota is exhausted.
    #[error("coupon has already been used")]
    AlreadyUsed,

    /// The current time is outside the validity window.
    #[error("coupon is expired")]
    Expired,

    /// The reservation's event is not in the rule's allow set.
    #[error("coupon is not valid for this event")]
    EventNotAllowed,

    /// No attendee on the reservation qualifies under the group allow set.
    #[error("none of the attendees may use this coupon")]
    MemberNotAllowed,
}

/// Inputs the pipeline needs beyond the rule and the reservation.
///
/// Both are explicit parameters so time-dependent and quota-dependent checks
/// stay deterministic under test.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext {
    /// The instant the checks run against.
    pub now: Timestamp,

    /// Reservations that have already redeemed the code, the attempt under
    /// evaluation excluded.
    pub redemptions: u64,
}

/// Outcome of evaluating one rule against one reservation.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<'a> {
    /// Every check passed; the modification is ready to apply and persist.
    Accepted(PriceModification<'a>),

    /// A check failed; nothing is applied.
    Rejected(Rejection),
}

/// Run the ordered checks for a rule the catalog already resolved.
///
/// The check order is part of the contract: quota, then window, then event,
/// then groups. A code that is both exhausted and expired reports
/// [`Rejection::AlreadyUsed`], never [`Rejection::Expired`]. The lookup stage
/// ([`Rejection::NotFound`]) happens where the catalog lives, before this
/// call.
///
/// The function is pure: the same rule, reservation, and context always
/// produce the same verdict.
///
/// # Errors
///
/// Returns a [`DiscountError`] when pricing arithmetic fails. Rejections are
/// outcomes, not errors, and come back inside [`Verdict::Rejected`].
pub fn evaluate<'a>(
    rule: &DiscountRule<'a>,
    reservation: &Reservation<'a>,
    ctx: &EvaluationContext,
) -> Result<Verdict<'a>, DiscountError> {
    if !rule.is_under_quota(ctx.redemptions.saturating_add(1)) {
        return Ok(Verdict::Rejected(Rejection::AlreadyUsed));
    }

    if !rule.is_within_window(ctx.now) {
        return Ok(Verdict::Rejected(Rejection::Expired));
    }

    if !rule.is_event_eligible(reservation.ticket_page()) {
        return Ok(Verdict::Rejected(Rejection::EventNotAllowed));
    }

    if !rule.is_group_eligible(reservation.attendees()) {
        return Ok(Verdict::Rejected(Rejection::MemberNotAllowed));
    }

    rule.delta(reservation).map(Verdict::Accepted)
}
