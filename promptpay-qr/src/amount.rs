use core::fmt::{self, Display};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A transaction amount in Thai Baht
///
/// Values are guaranteed to be finite, strictly positive and below
/// 10^10, so the rendered form always fits the two-digit TLV length
/// field. The EMV field carries exactly two fraction digits, which
/// [`Amount`]'s `Display` implementation produces; finer precision
/// is rounded away at render time.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Amount(f64);

/// Amounts from this value up would render wider than the
/// two-digit TLV length field allows.
const MAX_BAHT: f64 = 10_000_000_000.0;

impl Amount {
    /// Construct an `Amount` from a value in Baht.
    ///
    /// # Errors
    ///
    /// It returns an error if `baht` is not finite, not strictly
    /// positive or too large to encode.
    pub fn new(baht: f64) -> Result<Self, AmountError> {
        if !baht.is_finite() {
            return Err(AmountError::NotFinite);
        }

        if baht <= 0.0 {
            return Err(AmountError::NotPositive);
        }

        if baht >= MAX_BAHT {
            return Err(AmountError::TooLarge);
        }

        Ok(Self(baht))
    }

    #[must_use]
    pub fn baht(self) -> f64 {
        self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<f64> for Amount {
    type Error = AmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.baht()
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.baht().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let baht = f64::deserialize(deserializer)?;
        baht.try_into().map_err(de::Error::custom)
    }
}

/// An error encountered while constructing [`Amount`]
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum AmountError {
    /// The value is NaN or infinite
    #[error("amount is not a finite number")]
    NotFinite,
    /// The value is zero or negative
    #[error("amount must be greater than zero")]
    NotPositive,
    /// The value is too large for the two-digit TLV length field
    #[error("amount is too large to encode")]
    TooLarge,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{Amount, AmountError};

    #[test]
    fn valid_amounts() {
        let amounts = [
            (100.5, "100.50"),
            (0.01, "0.01"),
            (7.0, "7.00"),
            (1_000_000.0, "1000000.00"),
            (9_999_999_999.99, "9999999999.99"),
        ];
        for (baht, rendered) in amounts {
            let amount = Amount::new(baht).unwrap();
            assert_eq!(rendered, amount.to_string());
            assert_eq!(baht.to_bits(), amount.baht().to_bits());
            assert_eq!(baht.to_bits(), f64::from(amount).to_bits());
        }
    }

    #[test]
    fn invalid_amounts() {
        let amounts = [
            (0.0, AmountError::NotPositive),
            (-0.01, AmountError::NotPositive),
            (-100.0, AmountError::NotPositive),
            (f64::NAN, AmountError::NotFinite),
            (f64::INFINITY, AmountError::NotFinite),
            (f64::NEG_INFINITY, AmountError::NotFinite),
            (10_000_000_000.0, AmountError::TooLarge),
            (f64::MAX, AmountError::TooLarge),
        ];
        for (baht, expected_err) in amounts {
            let err = Amount::new(baht).unwrap_err();
            assert_eq!(expected_err, err);
        }
    }

    #[test]
    fn sub_satang_precision_rounds_at_render_time() {
        assert_eq!("0.01", Amount::new(0.005).unwrap().to_string());
        assert_eq!("1.23", Amount::new(1.234_9).unwrap().to_string());
    }
}
