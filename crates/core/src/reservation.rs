//! Reservations
//!
//! Read-only view of the reservation under checkout. The engine consumes this
//! snapshot; the running total and its persistence stay with the caller.

use rustc_hash::FxHashSet;
use rusty_money::{Money, iso::Currency};

use crate::ids::{GroupUuid, TicketPageUuid, TypedUuid};

/// Attendee UUID
pub type AttendeeUuid = TypedUuid<Attendee>;

/// Member UUID
pub type MemberUuid = TypedUuid<Member>;

/// Snapshot of a reservation: the event it is for, who is coming, and what
/// the cart is worth before any discount.
#[derive(Debug, Clone)]
pub struct Reservation<'a> {
    ticket_page: TicketPageUuid,
    attendees: Vec<Attendee>,
    subtotal: Money<'a, Currency>,
}

impl<'a> Reservation<'a> {
    /// Create a reservation snapshot.
    #[must_use]
    pub fn new(
        ticket_page: TicketPageUuid,
        attendees: Vec<Attendee>,
        subtotal: Money<'a, Currency>,
    ) -> Self {
        Self {
            ticket_page,
            attendees,
            subtotal,
        }
    }

    /// The event this reservation is for.
    #[must_use]
    pub const fn ticket_page(&self) -> TicketPageUuid {
        self.ticket_page
    }

    /// The attendees, in registration order.
    #[must_use]
    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    /// Number of attendees on the reservation.
    #[must_use]
    pub fn attendee_count(&self) -> usize {
        self.attendees.len()
    }

    /// Pre-discount cart subtotal.
    #[must_use]
    pub const fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }
}

/// One ticket holder, optionally linked to a member account.
#[derive(Debug, Clone)]
pub struct Attendee {
    uuid: AttendeeUuid,
    member: Option<Member>,
}

impl Attendee {
    /// Attendee without a linked member.
    #[must_use]
    pub const fn new(uuid: AttendeeUuid) -> Self {
        Self { uuid, member: None }
    }

    /// Attendee linked to a member account.
    #[must_use]
    pub const fn with_member(uuid: AttendeeUuid, member: Member) -> Self {
        Self {
            uuid,
            member: Some(member),
        }
    }

    /// The attendee's identifier.
    #[must_use]
    pub const fn uuid(&self) -> AttendeeUuid {
        self.uuid
    }

    /// The linked member, when there is one.
    #[must_use]
    pub const fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }
}

/// A member account with its group memberships.
#[derive(Debug, Clone)]
pub struct Member {
    uuid: MemberUuid,
    groups: FxHashSet<GroupUuid>,
}

impl Member {
    /// Create a member with its group memberships.
    #[must_use]
    pub fn new(uuid: MemberUuid, groups: FxHashSet<GroupUuid>) -> Self {
        Self { uuid, groups }
    }

    /// The member's identifier.
    #[must_use]
    pub const fn uuid(&self) -> MemberUuid {
        self.uuid
    }

    /// Groups this member belongs to.
    #[must_use]
    pub const fn groups(&self) -> &FxHashSet<GroupUuid> {
        &self.groups
    }

    /// True when the member belongs to at least one of `allowed`.
    #[must_use]
    pub fn is_in_any(&self, allowed: &FxHashSet<GroupUuid>) -> bool {
        !self.groups.is_disjoint(allowed)
    }
}
