//! Monetary amount shared by listings and rental snapshots.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

/// Maximum number of fractional digits stored for a price.
pub const PRICE_MAX_SCALE: u32 = 2;

/// Reasons a price can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceValidationError {
    #[error("price must be a number")]
    NotANumber,
    #[error("price must be greater than zero")]
    NotPositive,
    #[error("price must have at most {max_scale} decimal places")]
    TooPrecise { max_scale: u32 },
    #[error("price must be less than {max}")]
    TooLarge { max: Decimal },
}

/// Strictly positive price with at most two decimal places.
///
/// ## Invariants
/// - `0 < value <= 9_999_999_999.99` (fits `NUMERIC(12, 2)`).
///
/// # Examples
/// ```
/// use rentease::domain::Price;
///
/// assert!(Price::parse("0.01").is_ok());
/// assert!(Price::parse("0").is_err());
/// assert!(Price::parse("-5").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Largest accepted price.
    pub fn max() -> Decimal {
        Decimal::new(999_999_999_999, PRICE_MAX_SCALE)
    }

    pub fn new(value: Decimal) -> Result<Self, PriceValidationError> {
        if value <= Decimal::ZERO {
            return Err(PriceValidationError::NotPositive);
        }
        let normalised = value.normalize();
        if normalised.scale() > PRICE_MAX_SCALE {
            return Err(PriceValidationError::TooPrecise {
                max_scale: PRICE_MAX_SCALE,
            });
        }
        if normalised > Self::max() {
            return Err(PriceValidationError::TooLarge { max: Self::max() });
        }
        Ok(Self(normalised))
    }

    /// Parse a decimal string such as `"12.50"`.
    pub fn parse(raw: &str) -> Result<Self, PriceValidationError> {
        let value =
            Decimal::from_str(raw.trim()).map_err(|_| PriceValidationError::NotANumber)?;
        Self::new(value)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
