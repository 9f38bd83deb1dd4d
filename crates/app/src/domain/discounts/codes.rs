//! Coupon Code Generation
//!
//! Candidates mix the creation instant with random entropy. A rule's own
//! identifier may not exist yet at generation time, so the time component
//! plus a random suffix stands in; real uniqueness is still the catalog's
//! write-time constraint, which the service retries against.

use jiff::Timestamp;
use rand::{Rng, distributions::Alphanumeric};

/// Random characters appended to the time component.
const SUFFIX_LEN: usize = 4;

/// Build one candidate code from the creation instant and an rng.
pub(crate) fn candidate<R: Rng>(mut rng: R, now: Timestamp) -> String {
    let mut code = base36(now.as_second().unsigned_abs());

    code.extend(
        (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(char::from),
    );

    code.to_uppercase()
}

fn base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut digits = Vec::new();

    while value > 0 {
        if let Some(digit) = char::from_digit((value % 36) as u32, 36) {
            digits.push(digit);
        }

        value /= 36;
    }

    digits.iter().rev().collect()
}
