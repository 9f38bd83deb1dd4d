//! End-to-end evaluation scenarios for the discount engine.

use jiff::Timestamp;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use boxoffice::{
    discounts::{AppliesTo, Discount, percent_points},
    evaluation::{EvaluationContext, Rejection, Verdict, evaluate},
    ids::{GroupUuid, TicketPageUuid},
    reservation::{Attendee, AttendeeUuid, Member, MemberUuid, Reservation},
    rules::{CouponCode, DiscountRule, window::ValidityWindow},
};

fn code(text: &str) -> CouponCode {
    CouponCode::new(text).unwrap_or_else(|| unreachable!("scenario codes are non-empty"))
}

fn attendees(count: usize) -> Vec<Attendee> {
    (0..count).map(|_| Attendee::new(AttendeeUuid::new())).collect()
}

fn context(redemptions: u64) -> TestResult<EvaluationContext> {
    Ok(EvaluationContext {
        now: "2026-08-06T10:00:00Z".parse()?,
        redemptions,
    })
}

#[test]
fn ten_percent_off_a_two_hundred_pound_cart() -> TestResult {
    let rule = DiscountRule::new(code("SAVE10"), Discount::PercentageOff(percent_points(10)));

    let subtotal = Money::from_minor(20_000, GBP);
    let reservation = Reservation::new(TicketPageUuid::new(), attendees(2), subtotal);

    let verdict = evaluate(&rule, &reservation, &context(0)?)?;

    assert!(
        matches!(verdict, Verdict::Accepted(_)),
        "SAVE10 should be accepted"
    );

    let Verdict::Accepted(modification) = verdict else {
        return Ok(());
    };

    assert_eq!(modification.amount(), Money::from_minor(2_000, GBP));

    // The caller applies the delta; 200.00 - 20.00 = 180.00.
    let new_total = subtotal.to_minor_units() - modification.amount().to_minor_units();

    assert_eq!(new_total, 18_000);

    Ok(())
}

#[test]
fn flat_fifty_against_a_thirty_pound_cart_floors_at_zero() -> TestResult {
    let rule = DiscountRule::new(
        code("FLAT50"),
        Discount::AmountOff {
            amount: Money::from_minor(5_000, GBP),
            applies_to: AppliesTo::Cart,
        },
    );

    let subtotal = Money::from_minor(3_000, GBP);
    let reservation = Reservation::new(TicketPageUuid::new(), attendees(1), subtotal);

    let verdict = evaluate(&rule, &reservation, &context(0)?)?;

    assert!(
        matches!(verdict, Verdict::Accepted(_)),
        "FLAT50 should be accepted"
    );

    let Verdict::Accepted(modification) = verdict else {
        return Ok(());
    };

    // The recorded deduction is capped, so the new total is 0, not -20.00.
    assert_eq!(modification.amount(), subtotal);
    assert_eq!(
        subtotal.to_minor_units() - modification.amount().to_minor_units(),
        0
    );

    Ok(())
}

#[test]
fn per_attendee_amount_exceeding_the_subtotal_floors_at_zero() -> TestResult {
    let rule = DiscountRule::new(
        code("EACH15"),
        Discount::AmountOff {
            amount: Money::from_minor(1_500, GBP),
            applies_to: AppliesTo::EachAttendee,
        },
    );

    // 4 attendees at 15.00 each is 60.00 against a 50.00 cart.
    let subtotal = Money::from_minor(5_000, GBP);
    let reservation = Reservation::new(TicketPageUuid::new(), attendees(4), subtotal);

    let verdict = evaluate(&rule, &reservation, &context(0)?)?;

    assert!(
        matches!(verdict, Verdict::Accepted(_)),
        "EACH15 should be accepted"
    );

    let Verdict::Accepted(modification) = verdict else {
        return Ok(());
    };

    assert_eq!(modification.amount(), subtotal);

    Ok(())
}

#[test]
fn quota_admits_exactly_max_uses_evaluations() -> TestResult {
    let rule = DiscountRule::new(code("TRIPLE"), Discount::PercentageOff(percent_points(5)))
        .with_max_uses(3);

    let reservation = Reservation::new(
        TicketPageUuid::new(),
        attendees(1),
        Money::from_minor(10_000, GBP),
    );

    // Three distinct reservations redeem in sequence; the catalog count grows
    // by one each time.
    for prior in 0..3 {
        assert!(
            matches!(
                evaluate(&rule, &reservation, &context(prior)?)?,
                Verdict::Accepted(_)
            ),
            "redemption {} should be admitted",
            prior + 1
        );
    }

    assert_eq!(
        evaluate(&rule, &reservation, &context(3)?)?,
        Verdict::Rejected(Rejection::AlreadyUsed)
    );

    Ok(())
}

#[test]
fn exhausted_and_expired_reports_already_used() -> TestResult {
    let rule = DiscountRule::new(code("STALE"), Discount::PercentageOff(percent_points(5)))
        .with_max_uses(1)
        .with_window(ValidityWindow::new(
            None,
            Some("2025-01-01T00:00:00Z".parse()?),
        ));

    let reservation = Reservation::new(
        TicketPageUuid::new(),
        attendees(1),
        Money::from_minor(10_000, GBP),
    );

    assert_eq!(
        evaluate(&rule, &reservation, &context(1)?)?,
        Verdict::Rejected(Rejection::AlreadyUsed)
    );

    Ok(())
}

#[test]
fn unset_window_bounds_are_unconstrained() {
    let rule = DiscountRule::new(code("FOREVER"), Discount::PercentageOff(percent_points(5)));

    for now in [Timestamp::MIN, Timestamp::UNIX_EPOCH, Timestamp::MAX] {
        assert!(rule.is_within_window(now), "window should accept {now}");
    }
}

#[test]
fn group_restricted_rule_rejects_a_member_of_another_group() -> TestResult {
    let allowed = GroupUuid::new();
    let other = GroupUuid::new();

    let rule = DiscountRule::new(code("CREW"), Discount::PercentageOff(percent_points(50)))
        .restricted_to_groups([allowed].into_iter().collect());

    let outsider = Attendee::with_member(
        AttendeeUuid::new(),
        Member::new(MemberUuid::new(), [other].into_iter().collect()),
    );

    let reservation = Reservation::new(
        TicketPageUuid::new(),
        vec![outsider],
        Money::from_minor(10_000, GBP),
    );

    assert_eq!(
        evaluate(&rule, &reservation, &context(0)?)?,
        Verdict::Rejected(Rejection::MemberNotAllowed)
    );

    Ok(())
}

#[test]
fn event_restricted_rule_accepts_only_listed_events() -> TestResult {
    let listed = TicketPageUuid::new();

    let rule = DiscountRule::new(code("GALA"), Discount::PercentageOff(percent_points(20)))
        .restricted_to_ticket_pages([listed].into_iter().collect());

    let on_listed = Reservation::new(listed, attendees(1), Money::from_minor(10_000, GBP));
    let elsewhere = Reservation::new(
        TicketPageUuid::new(),
        attendees(1),
        Money::from_minor(10_000, GBP),
    );

    assert!(matches!(
        evaluate(&rule, &on_listed, &context(0)?)?,
        Verdict::Accepted(_)
    ));
    assert_eq!(
        evaluate(&rule, &elsewhere, &context(0)?)?,
        Verdict::Rejected(Rejection::EventNotAllowed)
    );

    Ok(())
}
