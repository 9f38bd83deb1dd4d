//! Discounts Service
//!
//! The checkout-facing surface: evaluate a submitted coupon code against a
//! reservation, and create rules with catalog-verified unique codes. The
//! ordered validation itself lives in the `boxoffice` engine; this layer
//! resolves the code and the reservation snapshot, feeds the engine, and
//! shapes the outcome into persistable records.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rusty_money::{Money, iso::Currency};
use tracing::{Span, info};

use boxoffice::{
    discounts::{Discount, percent_points},
    evaluation::{self, EvaluationContext, Rejection, Verdict},
    reservation::{Attendee, Member, Reservation},
    rules::{CouponCode, DiscountRule, window::ValidityWindow},
};

use crate::domain::{
    discounts::{
        DiscountsServiceError, codes,
        data::{DiscountSpec, NewDiscountRule},
        records::{DiscountRuleRecord, PriceModificationRecord, PriceModificationUuid},
        repository::{CodeReservation, RuleCatalog},
    },
    reservations::{
        records::{ReservationSnapshot, ReservationUuid},
        repository::ReservationsRepository,
    },
};

/// Generated-code reservation attempts before giving up.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Outcome of submitting a coupon code at checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Nothing (or only whitespace) was submitted. The total is unchanged
    /// and no rejection is reported.
    NotRequested,

    /// The coupon was accepted. The caller applies the deduction to the
    /// reservation total and persists the record.
    Accepted(PriceModificationRecord),

    /// The coupon was refused for the given reason.
    Rejected(Rejection),
}

/// Discounts service backed by a rule catalog and a reservation store.
#[derive(Debug, Clone)]
pub struct CatalogDiscountsService<C, R> {
    catalog: C,
    reservations: R,
    currency: &'static Currency,
}

impl<C, R> CatalogDiscountsService<C, R>
where
    C: RuleCatalog,
    R: ReservationsRepository,
{
    /// Create a service evaluating amounts in the given shop currency.
    #[must_use]
    pub fn new(catalog: C, reservations: R, currency: &'static Currency) -> Self {
        Self {
            catalog,
            reservations,
            currency,
        }
    }

    async fn reserve_generated_code(
        &self,
        now: Timestamp,
    ) -> Result<String, DiscountsServiceError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let candidate = codes::candidate(rand::thread_rng(), now);

            if self.catalog.reserve_code(&candidate).await? == CodeReservation::Reserved {
                return Ok(candidate);
            }
        }

        Err(DiscountsServiceError::CodeGeneration)
    }
}

#[async_trait]
impl<C, R> DiscountsService for CatalogDiscountsService<C, R>
where
    C: RuleCatalog,
    R: ReservationsRepository,
{
    #[tracing::instrument(
        name = "discounts.service.evaluate_discount",
        skip(self, code),
        fields(reservation_uuid = %reservation, outcome = tracing::field::Empty),
        err
    )]
    async fn evaluate_discount(
        &self,
        reservation: ReservationUuid,
        code: &str,
        now: Timestamp,
    ) -> Result<Evaluation, DiscountsServiceError> {
        let span = Span::current();

        let Some(code) = CouponCode::new(code) else {
            span.record("outcome", "not_requested");

            return Ok(Evaluation::NotRequested);
        };

        let Some(record) = self.catalog.find_by_code(code.as_str()).await? else {
            span.record("outcome", "rejected");

            info!(%code, "rejected coupon: no matching rule");

            return Ok(Evaluation::Rejected(Rejection::NotFound));
        };

        let snapshot = self
            .reservations
            .get_snapshot(reservation)
            .await?
            .ok_or(DiscountsServiceError::ReservationNotFound)?;

        let redemptions = self.catalog.count_redemptions(record.uuid).await?;

        let rule = to_rule(&record, self.currency)?;
        let view = to_reservation(&snapshot, self.currency)?;

        let ctx = EvaluationContext { now, redemptions };

        match evaluation::evaluate(&rule, &view, &ctx)? {
            Verdict::Accepted(modification) => {
                let amount_off = u64::try_from(modification.amount().to_minor_units())
                    .map_err(|_| DiscountsServiceError::AmountOutOfRange)?;

                span.record("outcome", "accepted");

                info!(rule_uuid = %record.uuid, amount_off, "accepted coupon");

                Ok(Evaluation::Accepted(PriceModificationRecord {
                    uuid: PriceModificationUuid::new(),
                    reservation_uuid: reservation,
                    rule_uuid: record.uuid,
                    code: record.code,
                    amount_off,
                    applies_to: modification.applies_to(),
                    created_at: now,
                }))
            }
            Verdict::Rejected(rejection) => {
                span.record("outcome", "rejected");

                info!(rule_uuid = %record.uuid, %rejection, "rejected coupon");

                Ok(Evaluation::Rejected(rejection))
            }
        }
    }

    #[tracing::instrument(
        name = "discounts.service.create_rule",
        skip(self, rule),
        fields(
            rule_uuid = %rule.uuid,
            discount_kind = rule.discount.kind_as_str(),
            code = tracing::field::Empty,
        ),
        err
    )]
    async fn create_rule(
        &self,
        rule: NewDiscountRule,
        now: Timestamp,
    ) -> Result<DiscountRuleRecord, DiscountsServiceError> {
        validate_new_rule(&rule)?;

        let code = match rule.code.as_deref().and_then(CouponCode::new) {
            Some(code) => match self.catalog.reserve_code(code.as_str()).await? {
                CodeReservation::Reserved => code.as_str().to_owned(),
                CodeReservation::Conflict => return Err(DiscountsServiceError::AlreadyExists),
            },
            None => self.reserve_generated_code(now).await?,
        };

        Span::current().record("code", code.as_str());

        let record = DiscountRuleRecord {
            uuid: rule.uuid,
            code,
            discount: rule.discount,
            max_uses: rule.max_uses,
            valid_from: rule.valid_from,
            valid_till: rule.valid_till,
            groups: rule.groups,
            ticket_pages: rule.ticket_pages,
            description: rule.description,
            created_at: now,
        };

        self.catalog.create_rule(record.clone()).await?;

        info!(rule_uuid = %record.uuid, "created discount rule");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait DiscountsService: Send + Sync {
    /// Evaluate a submitted coupon code against a reservation.
    ///
    /// An empty or whitespace-only `code` means no discount was requested and
    /// resolves to [`Evaluation::NotRequested`] without touching the catalog.
    /// Rejections come back inside `Ok`; the error type is reserved for
    /// infrastructure failures.
    async fn evaluate_discount(
        &self,
        reservation: ReservationUuid,
        code: &str,
        now: Timestamp,
    ) -> Result<Evaluation, DiscountsServiceError>;

    /// Create a rule, generating and reserving a unique code when the
    /// administrator left the field blank.
    async fn create_rule(
        &self,
        rule: NewDiscountRule,
        now: Timestamp,
    ) -> Result<DiscountRuleRecord, DiscountsServiceError>;
}

fn validate_new_rule(rule: &NewDiscountRule) -> Result<(), DiscountsServiceError> {
    match rule.discount {
        DiscountSpec::PercentageOff { percentage } => {
            if percentage == 0 || percentage > 100 {
                return Err(DiscountsServiceError::InvalidData);
            }
        }
        DiscountSpec::AmountOff { amount, .. } => {
            if amount == 0 {
                return Err(DiscountsServiceError::InvalidData);
            }
        }
    }

    if let (Some(from), Some(till)) = (rule.valid_from, rule.valid_till) {
        if from > till {
            return Err(DiscountsServiceError::InvalidData);
        }
    }

    Ok(())
}

fn to_rule(
    record: &DiscountRuleRecord,
    currency: &'static Currency,
) -> Result<DiscountRule<'static>, DiscountsServiceError> {
    let code = CouponCode::new(&record.code).ok_or(DiscountsServiceError::InvalidData)?;

    let discount = match record.discount {
        DiscountSpec::PercentageOff { percentage } => {
            Discount::PercentageOff(percent_points(percentage))
        }
        DiscountSpec::AmountOff { amount, applies_to } => Discount::AmountOff {
            amount: Money::from_minor(to_minor(amount)?, currency),
            applies_to,
        },
    };

    Ok(DiscountRule::new(code, discount)
        .with_max_uses(record.max_uses)
        .with_window(ValidityWindow::new(record.valid_from, record.valid_till))
        .restricted_to_groups(record.groups.iter().copied().collect())
        .restricted_to_ticket_pages(record.ticket_pages.iter().copied().collect()))
}

fn to_reservation(
    snapshot: &ReservationSnapshot,
    currency: &'static Currency,
) -> Result<Reservation<'static>, DiscountsServiceError> {
    let attendees = snapshot
        .attendees
        .iter()
        .map(|attendee| match &attendee.member {
            Some(member) => Attendee::with_member(
                attendee.uuid,
                Member::new(member.uuid, member.groups.iter().copied().collect()),
            ),
            None => Attendee::new(attendee.uuid),
        })
        .collect();

    Ok(Reservation::new(
        snapshot.ticket_page,
        attendees,
        Money::from_minor(to_minor(snapshot.subtotal)?, currency),
    ))
}

fn to_minor(value: u64) -> Result<i64, DiscountsServiceError> {
    i64::try_from(value).map_err(|_| DiscountsServiceError::AmountOutOfRange)
}
