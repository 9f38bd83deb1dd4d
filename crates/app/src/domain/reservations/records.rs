//! Reservation Records

use boxoffice::{
    ids::{GroupUuid, TicketPageUuid, TypedUuid},
    reservation::{AttendeeUuid, MemberUuid},
};
use serde::{Deserialize, Serialize};

/// Reservation UUID
pub type ReservationUuid = TypedUuid<ReservationSnapshot>;

/// Read-only view of a reservation, as consumed by discount evaluation.
///
/// The running total stays with the checkout flow; the evaluator only sees
/// the pre-discount subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationSnapshot {
    pub uuid: ReservationUuid,
    pub ticket_page: TicketPageUuid,
    pub attendees: Vec<AttendeeSnapshot>,
    /// Pre-discount subtotal in minor units.
    pub subtotal: u64,
}

/// One attendee on the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeSnapshot {
    pub uuid: AttendeeUuid,
    pub member: Option<MemberSnapshot>,
}

/// A linked member identity with its group memberships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub uuid: MemberUuid,
    pub groups: Vec<GroupUuid>,
}
