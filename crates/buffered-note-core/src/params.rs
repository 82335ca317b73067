use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::NoteError;
use crate::types::{Money, Rate};
use crate::NoteResult;

/// Terms of a contingent income buffered note.
///
/// `Default` carries the reference terms: a $1,000 note paying a fixed
/// contingent coupon of $10.1667 (12.20% p.a. paid monthly) with a 10%
/// downside buffer. There is no process-wide parameter object; callers pass
/// a value explicitly to every computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteParameters {
    pub principal: Money,

    /// Annual contingent interest rate.
    pub contingent_interest_rate: Rate,

    /// contingent_interest_rate / 12. Informational only; the maturity
    /// payment uses the fixed coupon amount, not this rate.
    pub monthly_interest_rate: Rate,

    /// Minimum final-value ratio (final / initial) that still pays full
    /// principal plus the coupon.
    pub buffer_threshold: Rate,

    /// Downside cushion added to the return in the participation formula.
    /// Typically 1 - buffer_threshold.
    pub buffer_amount: Rate,

    /// Fixed coupon paid whenever the threshold holds.
    pub contingent_interest_payment: Money,
}

impl Default for NoteParameters {
    fn default() -> Self {
        Self {
            principal: dec!(1000),
            contingent_interest_rate: dec!(0.1220),
            monthly_interest_rate: dec!(0.0101667),
            buffer_threshold: dec!(0.90),
            buffer_amount: dec!(0.10),
            contingent_interest_payment: dec!(10.1667),
        }
    }
}

impl NoteParameters {
    /// Check the parameter set field by field. Pure predicate: the first
    /// violation is returned as `InvalidParameter`, nothing is mutated.
    pub fn validate(&self) -> NoteResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(NoteError::InvalidParameter {
                field: "principal".into(),
                reason: "must be positive".into(),
            });
        }
        if self.buffer_threshold <= Decimal::ZERO || self.buffer_threshold > Decimal::ONE {
            return Err(NoteError::InvalidParameter {
                field: "buffer_threshold".into(),
                reason: "must be between 0 (exclusive) and 1.0 (inclusive)".into(),
            });
        }
        if self.contingent_interest_rate < Decimal::ZERO
            || self.contingent_interest_rate > Decimal::ONE
        {
            return Err(NoteError::InvalidParameter {
                field: "contingent_interest_rate".into(),
                reason: "must be between 0 and 1".into(),
            });
        }
        if self.contingent_interest_payment <= Decimal::ZERO {
            return Err(NoteError::InvalidParameter {
                field: "contingent_interest_payment".into(),
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_terms_validate() {
        let params = NoteParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.principal, dec!(1000));
        assert_eq!(params.contingent_interest_payment, dec!(10.1667));
    }

    #[test]
    fn test_rejects_threshold_above_one() {
        let params = NoteParameters {
            buffer_threshold: dec!(1.5),
            ..NoteParameters::default()
        };
        match params.validate().unwrap_err() {
            NoteError::InvalidParameter { field, .. } => {
                assert_eq!(field, "buffer_threshold");
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_zero_threshold() {
        let params = NoteParameters {
            buffer_threshold: Decimal::ZERO,
            ..NoteParameters::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_accepts_threshold_exactly_one() {
        let params = NoteParameters {
            buffer_threshold: Decimal::ONE,
            buffer_amount: Decimal::ZERO,
            ..NoteParameters::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_principal() {
        let params = NoteParameters {
            principal: dec!(-5),
            ..NoteParameters::default()
        };
        match params.validate().unwrap_err() {
            NoteError::InvalidParameter { field, .. } => {
                assert_eq!(field, "principal");
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let params: NoteParameters =
            serde_json::from_str(r#"{"principal": "500000"}"#).unwrap();
        assert_eq!(params.principal, dec!(500000));
        assert_eq!(params.buffer_threshold, dec!(0.90));
        assert!(params.validate().is_ok());
    }
}
