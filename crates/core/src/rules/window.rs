//! Validity Window

use jiff::Timestamp;

/// Optional validity bounds on a discount rule.
///
/// An absent bound leaves that side unconstrained; a window with neither
/// bound set accepts every instant. Bounds are never defaulted at creation
/// time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityWindow {
    valid_from: Option<Timestamp>,
    valid_till: Option<Timestamp>,
}

impl ValidityWindow {
    /// Window with the given bounds.
    #[must_use]
    pub const fn new(valid_from: Option<Timestamp>, valid_till: Option<Timestamp>) -> Self {
        Self {
            valid_from,
            valid_till,
        }
    }

    /// Window that accepts every instant.
    #[must_use]
    pub const fn unconstrained() -> Self {
        Self::new(None, None)
    }

    /// Lower bound, when set.
    #[must_use]
    pub const fn valid_from(&self) -> Option<Timestamp> {
        self.valid_from
    }

    /// Upper bound, when set.
    #[must_use]
    pub const fn valid_till(&self) -> Option<Timestamp> {
        self.valid_till
    }

    /// True when `now` falls inside the window, bounds inclusive.
    #[must_use]
    pub fn contains(&self, now: Timestamp) -> bool {
        self.valid_from.is_none_or(|from| from <= now)
            && self.valid_till.is_none_or(|till| till >= now)
    }
}
