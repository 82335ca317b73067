use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::params::NoteParameters;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::NoteResult;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Input for a single payment-at-maturity calculation. Omitted parameters
/// fall back to the reference terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub underlying_return: Rate,
    #[serde(default)]
    pub params: Option<NoteParameters>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityPayment {
    pub underlying_return: Rate,
    pub payment_at_maturity: Money,
    /// Non-fatal diagnostic, set when the scenario return lies below -100%.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

// ---------------------------------------------------------------------------
// Payoff formula
// ---------------------------------------------------------------------------

/// Payment at maturity for one underlying return.
///
/// With `final_value_ratio = 1 + underlying_return`:
/// - at or above `buffer_threshold` (the `>=` boundary is contractual, not a
///   rounding artifact) the holder receives principal plus the fixed coupon,
///   flat regardless of upside;
/// - below it, `principal + principal * (underlying_return + buffer_amount)`,
///   floored at zero.
///
/// Returns below -100% are mathematically valid and follow the downside
/// branch; they only set the `advisory` field.
pub fn payment_at_maturity(
    params: &NoteParameters,
    underlying_return: Rate,
) -> NoteResult<MaturityPayment> {
    params.validate()?;

    let advisory = if underlying_return < dec!(-1) {
        Some(format!(
            "underlying return {underlying_return} is below -100%; \
             scenario exceeds a total loss of the underlying"
        ))
    } else {
        None
    };

    let final_value_ratio = Decimal::ONE + underlying_return;
    let payment_at_maturity = if final_value_ratio >= params.buffer_threshold {
        params.principal + params.contingent_interest_payment
    } else {
        let participated =
            params.principal + params.principal * (underlying_return + params.buffer_amount);
        participated.max(Decimal::ZERO)
    };

    Ok(MaturityPayment {
        underlying_return,
        payment_at_maturity,
        advisory,
    })
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn compute_payment(input: &PaymentInput) -> NoteResult<ComputationOutput<MaturityPayment>> {
    let start = Instant::now();
    let params = input.params.clone().unwrap_or_default();
    let result = payment_at_maturity(&params, input.underlying_return)?;

    let methodology = "Buffered note payoff: flat principal plus contingent coupon at or above \
                       the buffer threshold; linear buffered participation floored at zero below";

    let assumptions = serde_json::json!({
        "principal": params.principal.to_string(),
        "contingent_interest_payment": params.contingent_interest_payment.to_string(),
        "buffer_threshold": params.buffer_threshold.to_string(),
        "buffer_amount": params.buffer_amount.to_string(),
        "boundary": "final_value_ratio >= buffer_threshold pays the protected amount",
    });

    let warnings: Vec<String> = result.advisory.iter().cloned().collect();
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        methodology,
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
