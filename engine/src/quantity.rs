//! Two-part quantities and their minor-unit encoding.
//!
//! Stock is displayed as a major unit plus a minor sub-unit (ten minor units per
//! major unit, minor always in `0..=9`). The ledger only ever stores the single
//! integer count of minor units; this module converts between the two forms.

use crate::{error::Result, Amount, Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minor units in one major unit.
pub const MINOR_PER_MAJOR: Amount = 10;

/// Largest valid minor component.
pub const MAX_MINOR: u8 = 9;

/// Encode a `(major, minor)` pair as a count of minor units.
///
/// `minor` is expected to be in `0..=9`; use [`Quantity::new`] when the
/// input has not been validated yet. Saturates at `Amount::MAX`; see
/// [`checked_encode`].
pub fn encode(major: Amount, minor: u8) -> Amount {
    major
        .saturating_mul(MINOR_PER_MAJOR)
        .saturating_add(Amount::from(minor))
}

/// Encode a `(major, minor)` pair, or `None` if it does not fit an [`Amount`].
pub fn checked_encode(major: Amount, minor: u8) -> Option<Amount> {
    major
        .checked_mul(MINOR_PER_MAJOR)?
        .checked_add(Amount::from(minor))
}

/// Decode a count of minor units into its `(major, minor)` pair.
pub fn decode(total: Amount) -> (Amount, u8) {
    (total / MINOR_PER_MAJOR, (total % MINOR_PER_MAJOR) as u8)
}

/// Express a count of minor units as a fractional number of major units.
pub fn to_major_decimal(total: Amount) -> f64 {
    total as f64 / MINOR_PER_MAJOR as f64
}

/// A validated two-part quantity.
///
/// Field order makes the derived ordering compare by major, then minor,
/// which agrees with the ordering of [`Quantity::total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity {
    pub major: Amount,
    pub minor: u8,
}

impl Quantity {
    /// Create a quantity, rejecting a minor component above 9 and totals
    /// that do not fit an [`Amount`].
    pub fn new(major: Amount, minor: u8) -> Result<Self> {
        if minor > MAX_MINOR {
            return Err(Error::InvalidQuantity(format!(
                "minor unit must be between 0 and {}, got {}",
                MAX_MINOR, minor
            )));
        }
        if checked_encode(major, minor).is_none() {
            return Err(Error::InvalidQuantity(format!(
                "{} major units is too large",
                major
            )));
        }
        Ok(Self { major, minor })
    }

    /// Build a quantity from a count of minor units.
    pub fn from_total(total: Amount) -> Self {
        let (major, minor) = decode(total);
        Self { major, minor }
    }

    /// Total count of minor units.
    pub fn total(&self) -> Amount {
        encode(self.major, self.minor)
    }

}

impl From<Quantity> for Amount {
    fn from(quantity: Quantity) -> Self {
        quantity.total()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
