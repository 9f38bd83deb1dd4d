//! Coupon Evaluation Example
//!
//! Builds a small reservation, evaluates a couple of coupons against it, and
//! prints the resulting totals.

use anyhow::Result;
use jiff::Timestamp;
use rusty_money::{Money, iso::GBP};

use boxoffice::{
    discounts::{AppliesTo, Discount, percent_points},
    evaluation::{EvaluationContext, Verdict, evaluate},
    ids::TicketPageUuid,
    reservation::{Attendee, AttendeeUuid, Reservation},
    rules::{CouponCode, DiscountRule},
};

/// Coupon Evaluation Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let reservation = Reservation::new(
        TicketPageUuid::new(),
        vec![
            Attendee::new(AttendeeUuid::new()),
            Attendee::new(AttendeeUuid::new()),
        ],
        Money::from_minor(20_000, GBP),
    );

    let rules = [
        DiscountRule::new(
            CouponCode::new("SAVE10").ok_or_else(|| anyhow::anyhow!("empty code"))?,
            Discount::PercentageOff(percent_points(10)),
        ),
        DiscountRule::new(
            CouponCode::new("EACH25").ok_or_else(|| anyhow::anyhow!("empty code"))?,
            Discount::AmountOff {
                amount: Money::from_minor(2_500, GBP),
                applies_to: AppliesTo::EachAttendee,
            },
        ),
    ];

    let ctx = EvaluationContext {
        now: Timestamp::now(),
        redemptions: 0,
    };

    println!("subtotal: {}", reservation.subtotal());

    for rule in &rules {
        match evaluate(rule, &reservation, &ctx)? {
            Verdict::Accepted(modification) => {
                let new_total = Money::from_minor(
                    reservation.subtotal().to_minor_units()
                        - modification.amount().to_minor_units(),
                    GBP,
                );

                println!(
                    "{} ({}): -{} => {new_total}",
                    rule.code(),
                    rule.discount(),
                    modification.amount()
                );
            }
            Verdict::Rejected(rejection) => println!("{}: {rejection}", rule.code()),
        }
    }

    Ok(())
}
