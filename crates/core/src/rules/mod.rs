//! Discount Rules
//!
//! A [`DiscountRule`] is the immutable description of one coupon: what it is
//! worth and the conditions under which it may be redeemed. The rule carries
//! the pure validation predicates; the ordered pipeline that strings them
//! together lives in [`crate::evaluation`].

use std::fmt;

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};

use crate::{
    discounts::{AppliesTo, Discount, DiscountError},
    ids::{GroupUuid, TicketPageUuid},
    reservation::{Attendee, Reservation},
    rules::window::ValidityWindow,
};

pub mod window;

/// A coupon code: non-empty, case sensitive, compared exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CouponCode(String);

impl CouponCode {
    /// Parse a submitted code; `None` when nothing was submitted.
    ///
    /// Surrounding whitespace is trimmed. An empty or whitespace-only string
    /// is "no discount requested", not an invalid coupon, so it has no
    /// `CouponCode` representation.
    #[must_use]
    pub fn new(code: &str) -> Option<Self> {
        let code = code.trim();

        if code.is_empty() {
            None
        } else {
            Some(Self(code.to_owned()))
        }
    }

    /// The code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One coupon: its code, its worth, and its redemption conditions.
#[derive(Debug, Clone)]
pub struct DiscountRule<'a> {
    code: CouponCode,
    discount: Discount<'a>,
    max_uses: u64,
    window: ValidityWindow,
    groups: FxHashSet<GroupUuid>,
    ticket_pages: FxHashSet<TicketPageUuid>,
    description: Option<String>,
}

impl<'a> DiscountRule<'a> {
    /// Single-use rule with no restrictions; refine with the builder methods.
    #[must_use]
    pub fn new(code: CouponCode, discount: Discount<'a>) -> Self {
        Self {
            code,
            discount,
            max_uses: 1,
            window: ValidityWindow::unconstrained(),
            groups: FxHashSet::default(),
            ticket_pages: FxHashSet::default(),
            description: None,
        }
    }

    /// Set the usage quota.
    #[must_use]
    pub fn with_max_uses(mut self, max_uses: u64) -> Self {
        self.max_uses = max_uses;
        self
    }

    /// Set the validity window.
    #[must_use]
    pub fn with_window(mut self, window: ValidityWindow) -> Self {
        self.window = window;
        self
    }

    /// Restrict redemption to attendees in the given groups.
    #[must_use]
    pub fn restricted_to_groups(mut self, groups: FxHashSet<GroupUuid>) -> Self {
        self.groups = groups;
        self
    }

    /// Restrict redemption to the given events.
    #[must_use]
    pub fn restricted_to_ticket_pages(mut self, ticket_pages: FxHashSet<TicketPageUuid>) -> Self {
        self.ticket_pages = ticket_pages;
        self
    }

    /// Attach a CMS-only description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The coupon code.
    #[must_use]
    pub const fn code(&self) -> &CouponCode {
        &self.code
    }

    /// The discount this rule grants.
    #[must_use]
    pub const fn discount(&self) -> &Discount<'a> {
        &self.discount
    }

    /// The usage quota.
    #[must_use]
    pub const fn max_uses(&self) -> u64 {
        self.max_uses
    }

    /// The validity window.
    #[must_use]
    pub const fn window(&self) -> ValidityWindow {
        self.window
    }

    /// The description, when the administrator left one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// True when `now` falls inside the validity window.
    #[must_use]
    pub fn is_within_window(&self, now: Timestamp) -> bool {
        self.window.contains(now)
    }

    /// True while the quota admits the redemption under evaluation.
    ///
    /// `redemptions` counts the attempt being evaluated, so a rule with a
    /// quota of `n` admits exactly `n` redemptions.
    #[must_use]
    pub const fn is_under_quota(&self, redemptions: u64) -> bool {
        redemptions <= self.max_uses
    }

    /// True when no event restriction applies or the reservation's event is
    /// in the allow set.
    #[must_use]
    pub fn is_event_eligible(&self, ticket_page: TicketPageUuid) -> bool {
        self.ticket_pages.is_empty() || self.ticket_pages.contains(&ticket_page)
    }

    /// True when no group restriction applies, or at least one attendee is
    /// linked to a member in an allowed group.
    ///
    /// Attendees are scanned in registration order; one qualifying member is
    /// enough. An attendee without a linked member never qualifies.
    #[must_use]
    pub fn is_group_eligible(&self, attendees: &[Attendee]) -> bool {
        if self.groups.is_empty() {
            return true;
        }

        attendees
            .iter()
            .filter_map(Attendee::member)
            .any(|member| member.is_in_any(&self.groups))
    }

    /// Price this rule against a reservation.
    ///
    /// The delta is computed over the pre-discount subtotal and capped so the
    /// resulting total never drops below zero. The capped figure is what the
    /// returned modification carries, so a later recalculation reproduces the
    /// deduction exactly even when the attendee list has changed since.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] when the pricing arithmetic overflows or
    /// the discount currency does not match the reservation's.
    pub fn delta(
        &self,
        reservation: &Reservation<'a>,
    ) -> Result<PriceModification<'a>, DiscountError> {
        let subtotal = reservation.subtotal();

        let raw = self
            .discount
            .delta_minor(subtotal, reservation.attendee_count())?;

        // The floor keeps a negative subtotal from producing a negative cap.
        let floor = subtotal.to_minor_units().max(0);

        Ok(PriceModification {
            code: self.code.clone(),
            amount: Money::from_minor(raw.clamp(0, floor), subtotal.currency()),
            applies_to: self.discount.applies_to(),
        })
    }
}

/// The recorded deduction for one rule/reservation pairing.
///
/// The amount is the figure actually subtracted, not the rule's nominal
/// parameters; persisting it lets the reservation total be rebuilt later
/// without re-running the formula against possibly-changed inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceModification<'a> {
    code: CouponCode,
    amount: Money<'a, Currency>,
    applies_to: AppliesTo,
}

impl<'a> PriceModification<'a> {
    /// The redeemed coupon code.
    #[must_use]
    pub const fn code(&self) -> &CouponCode {
        &self.code
    }

    /// The amount subtracted from the reservation total.
    #[must_use]
    pub const fn amount(&self) -> Money<'a, Currency> {
        self.amount
    }

    /// The scope the deduction was computed under.
    #[must_use]
    pub const fn applies_to(&self) -> AppliesTo {
        self.applies_to
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        discounts::percent_points,
        reservation::{AttendeeUuid, Member, MemberUuid},
    };

    use super::*;

    fn code(text: &str) -> CouponCode {
        CouponCode::new(text).unwrap_or_else(|| unreachable!("test codes are non-empty"))
    }

    fn cart_rule(amount_minor: i64) -> DiscountRule<'static> {
        DiscountRule::new(
            code("FLAT"),
            Discount::AmountOff {
                amount: Money::from_minor(amount_minor, GBP),
                applies_to: AppliesTo::Cart,
            },
        )
    }

    #[test]
    fn coupon_codes_trim_and_reject_empty_input() {
        assert!(CouponCode::new("").is_none());
        assert!(CouponCode::new("   ").is_none());
        assert_eq!(
            CouponCode::new("  SAVE10 ").map(|c| c.as_str().to_owned()),
            Some("SAVE10".to_owned())
        );
    }

    #[test]
    fn quota_admits_exactly_max_uses_redemptions() {
        let rule = cart_rule(500).with_max_uses(2);

        assert!(rule.is_under_quota(1));
        assert!(rule.is_under_quota(2));
        assert!(!rule.is_under_quota(3));
    }

    #[test]
    fn zero_quota_admits_nothing() {
        let rule = cart_rule(500).with_max_uses(0);

        assert!(!rule.is_under_quota(1));
    }

    #[test]
    fn event_restriction_is_membership_on_the_allow_set() {
        let allowed = TicketPageUuid::new();
        let other = TicketPageUuid::new();

        let open = cart_rule(500);
        let restricted = cart_rule(500).restricted_to_ticket_pages([allowed].into_iter().collect());

        assert!(open.is_event_eligible(other));
        assert!(restricted.is_event_eligible(allowed));
        assert!(!restricted.is_event_eligible(other));
    }

    #[test]
    fn group_restriction_passes_on_first_qualifying_attendee() {
        let allowed = GroupUuid::new();
        let rule = cart_rule(500).restricted_to_groups([allowed].into_iter().collect());

        let unlinked = Attendee::new(AttendeeUuid::new());
        let outsider = Attendee::with_member(
            AttendeeUuid::new(),
            Member::new(MemberUuid::new(), [GroupUuid::new()].into_iter().collect()),
        );
        let qualifying = Attendee::with_member(
            AttendeeUuid::new(),
            Member::new(MemberUuid::new(), [allowed].into_iter().collect()),
        );

        assert!(rule.is_group_eligible(&[unlinked.clone(), outsider.clone(), qualifying]));
        assert!(!rule.is_group_eligible(&[unlinked, outsider]));
        assert!(!rule.is_group_eligible(&[]));
    }

    #[test]
    fn unrestricted_rule_accepts_an_empty_attendee_list() {
        assert!(cart_rule(500).is_group_eligible(&[]));
    }

    #[test]
    fn percentage_delta_is_exact_over_the_subtotal() -> TestResult {
        let rule = DiscountRule::new(code("SAVE10"), Discount::PercentageOff(percent_points(10)));

        let reservation = Reservation::new(
            TicketPageUuid::new(),
            vec![Attendee::new(AttendeeUuid::new())],
            Money::from_minor(20_000, GBP),
        );

        let modification = rule.delta(&reservation)?;

        assert_eq!(modification.amount(), Money::from_minor(2_000, GBP));
        assert_eq!(modification.applies_to(), AppliesTo::Cart);
        assert_eq!(modification.code(), rule.code());

        Ok(())
    }

    #[test]
    fn per_attendee_delta_multiplies_by_attendee_count() -> TestResult {
        let rule = DiscountRule::new(
            code("EACH5"),
            Discount::AmountOff {
                amount: Money::from_minor(500, GBP),
                applies_to: AppliesTo::EachAttendee,
            },
        );

        let reservation = Reservation::new(
            TicketPageUuid::new(),
            vec![
                Attendee::new(AttendeeUuid::new()),
                Attendee::new(AttendeeUuid::new()),
                Attendee::new(AttendeeUuid::new()),
            ],
            Money::from_minor(10_000, GBP),
        );

        let modification = rule.delta(&reservation)?;

        assert_eq!(modification.amount(), Money::from_minor(1_500, GBP));
        assert_eq!(modification.applies_to(), AppliesTo::EachAttendee);

        Ok(())
    }

    #[test]
    fn delta_is_capped_at_the_subtotal() -> TestResult {
        let rule = cart_rule(5_000);

        let reservation = Reservation::new(
            TicketPageUuid::new(),
            vec![Attendee::new(AttendeeUuid::new())],
            Money::from_minor(3_000, GBP),
        );

        let modification = rule.delta(&reservation)?;

        assert_eq!(modification.amount(), Money::from_minor(3_000, GBP));

        Ok(())
    }

    #[test]
    fn delta_never_goes_negative() -> TestResult {
        let rule = cart_rule(500);

        let reservation = Reservation::new(
            TicketPageUuid::new(),
            vec![Attendee::new(AttendeeUuid::new())],
            Money::from_minor(-100, GBP),
        );

        let modification = rule.delta(&reservation)?;

        assert_eq!(modification.amount(), Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn builder_methods_set_fields() -> TestResult {
        let window = ValidityWindow::new(Some("2026-01-01T00:00:00Z".parse()?), None);

        let rule = cart_rule(500)
            .with_max_uses(5)
            .with_window(window)
            .with_description("spring promo");

        assert_eq!(rule.max_uses(), 5);
        assert_eq!(rule.window(), window);
        assert_eq!(rule.description(), Some("spring promo"));

        Ok(())
    }
}
