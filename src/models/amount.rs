use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

use crate::error::{Field, ValidationError};

/// Number of fractional digits every amount is stored and rendered with
pub const AMOUNT_SCALE: u32 = 2;

/// Positive currency amount, always held at exactly two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Round to two decimal places (half away from zero) and reject anything
    /// that is not strictly positive afterwards
    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        let mut rounded =
            value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return Err(ValidationError::new(
                Field::Amount,
                "must be greater than zero",
            ));
        }
        rounded.rescale(AMOUNT_SCALE);
        Ok(Self(rounded))
    }

    /// Parse vendor form text such as "45.5" or " 100 "
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new(Field::Amount, "is required"));
        }
        let value = Decimal::from_str(trimmed)
            .map_err(|_| ValidationError::new(Field::Amount, "is not a number"))?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// Serialized as the two-digit display string so ledgers read "45.50", not "45.5"
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
