//! Boxoffice
//!
//! Coupon validation and discount pricing for event-ticket checkout.
//!
//! The engine decides whether a submitted coupon code is redeemable against a
//! reservation and what it is worth. [`rules::DiscountRule`] carries the pure
//! validation predicates and the pricing formula; [`evaluation::evaluate`]
//! runs the ordered check pipeline and produces either a
//! [`rules::PriceModification`] or a typed [`evaluation::Rejection`].
//!
//! The engine is deliberately free of I/O and ambient state: the rule, the
//! redemption count, and the current time are all inputs. Looking rules up
//! and persisting modifications belong to the caller.

pub mod discounts;
pub mod evaluation;
pub mod ids;
pub mod reservation;
pub mod rules;
