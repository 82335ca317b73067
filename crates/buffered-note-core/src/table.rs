use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::params::NoteParameters;
use crate::payment::payment_at_maturity;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::{NoteError, NoteResult};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Input for the hypothetical payment table. Scenarios are raw JSON values
/// because they arrive from external input: numbers are fractional returns,
/// strings are either fractional ("-0.10") or percentages ("-10%").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInput {
    #[serde(default)]
    pub params: Option<NoteParameters>,
    #[serde(default)]
    pub scenarios: Option<Vec<Value>>,
}

/// One row of the hypothetical payment-at-maturity table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffRow {
    /// Percent label for the scenario, or the raw entry text for rows that
    /// failed to parse.
    pub scenario: String,
    pub underlying_return: Option<Rate>,
    pub payment_at_maturity: Option<Money>,
    /// Payment rendered to 4 decimal places, or "ERROR" for a failed row.
    pub payment_formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffTable {
    pub params: NoteParameters,
    pub rows: Vec<PayoffRow>,
}

// ---------------------------------------------------------------------------
// Scenario parsing and formatting
// ---------------------------------------------------------------------------

/// Reference scenario list from the pricing supplement. Spans both payoff
/// branches and includes the exact buffer boundary (-10%) and the first
/// point below it.
pub fn default_scenario_returns() -> Vec<Rate> {
    vec![
        dec!(0.60),
        dec!(0.40),
        dec!(0.20),
        dec!(0.10),
        dec!(0.05),
        dec!(0.00),
        dec!(-0.05),
        dec!(-0.10),
        dec!(-0.1001),
        dec!(-0.20),
        dec!(-0.40),
        dec!(-0.60),
        dec!(-0.80),
        dec!(-1.00),
    ]
}

/// Parse one scenario entry into a fractional return.
pub fn parse_scenario(entry: &Value) -> NoteResult<Rate> {
    match entry {
        Value::Number(n) => n.to_string().parse::<Decimal>().map_err(|e| {
            NoteError::InvalidInput {
                field: "scenario".into(),
                reason: format!("'{n}' is not a valid return: {e}"),
            }
        }),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Some(pct) = trimmed.strip_suffix('%') {
                pct.trim()
                    .parse::<Decimal>()
                    .map(|p| p / dec!(100))
                    .map_err(|e| NoteError::InvalidInput {
                        field: "scenario".into(),
                        reason: format!("'{trimmed}' is not a valid percentage: {e}"),
                    })
            } else {
                trimmed
                    .parse::<Decimal>()
                    .map_err(|e| NoteError::InvalidInput {
                        field: "scenario".into(),
                        reason: format!("'{trimmed}' is not a valid return: {e}"),
                    })
            }
        }
        other => Err(NoteError::InvalidInput {
            field: "scenario".into(),
            reason: format!("expected a number or string, got {other}"),
        }),
    }
}

fn percent_label(r: Rate) -> String {
    format!("{}%", (r * dec!(100)).normalize())
}

fn raw_label(entry: &Value) -> String {
    match entry {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Table generation
// ---------------------------------------------------------------------------

/// Build the payoff table over the given scenario entries, preserving input
/// order. A row that fails to parse or compute is recorded with an "ERROR"
/// marker and does not abort the remaining rows.
pub fn payoff_table(params: &NoteParameters, scenarios: &[Value]) -> NoteResult<PayoffTable> {
    params.validate()?;

    let rows = scenarios
        .iter()
        .map(|entry| match parse_scenario(entry) {
            Ok(r) => match payment_at_maturity(params, r) {
                Ok(p) => PayoffRow {
                    scenario: percent_label(r),
                    underlying_return: Some(r),
                    payment_at_maturity: Some(p.payment_at_maturity),
                    payment_formatted: format!("{:.4}", p.payment_at_maturity),
                    note: p.advisory,
                },
                Err(e) => PayoffRow {
                    scenario: percent_label(r),
                    underlying_return: Some(r),
                    payment_at_maturity: None,
                    payment_formatted: "ERROR".into(),
                    note: Some(e.to_string()),
                },
            },
            Err(e) => PayoffRow {
                scenario: raw_label(entry),
                underlying_return: None,
                payment_at_maturity: None,
                payment_formatted: "ERROR".into(),
                note: Some(e.to_string()),
            },
        })
        .collect();

    Ok(PayoffTable {
        params: params.clone(),
        rows,
    })
}

/// Payoff table over the reference scenario list.
pub fn payoff_table_default(params: &NoteParameters) -> NoteResult<PayoffTable> {
    let scenarios: Vec<Value> = default_scenario_returns()
        .into_iter()
        .map(|r| Value::String(r.to_string()))
        .collect();
    payoff_table(params, &scenarios)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn compute_payoff_table(input: &TableInput) -> NoteResult<ComputationOutput<PayoffTable>> {
    let start = Instant::now();
    let params = input.params.clone().unwrap_or_default();

    let table = match &input.scenarios {
        Some(scenarios) => payoff_table(&params, scenarios)?,
        None => payoff_table_default(&params)?,
    };

    let methodology = "Hypothetical payment at maturity per scenario return, each row computed \
                       independently; failed rows carry an ERROR marker";

    let assumptions = serde_json::json!({
        "principal": params.principal.to_string(),
        "contingent_interest_payment": params.contingent_interest_payment.to_string(),
        "buffer_threshold": params.buffer_threshold.to_string(),
        "buffer_amount": params.buffer_amount.to_string(),
        "scenario_count": table.rows.len(),
    });

    let warnings: Vec<String> = table.rows.iter().filter_map(|r| r.note.clone()).collect();
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        methodology,
        &assumptions,
        warnings,
        elapsed,
        table,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    // -----------------------------------------------------------------------
    // 1. Default table: order preserved, both branches covered
    // -----------------------------------------------------------------------
    #[test]
    fn test_default_table_rows() {
        let table = payoff_table_default(&NoteParameters::default()).unwrap();
        assert_eq!(table.rows.len(), 14);

        let returns: Vec<Decimal> = table
            .rows
            .iter()
            .map(|r| r.underlying_return.unwrap())
            .collect();
        assert_eq!(returns, default_scenario_returns());

        // +60% pays the flat protected amount
        assert_eq!(table.rows[0].payment_formatted, "1010.1667");
        // -10% boundary is inclusive of the protected payoff
        let boundary = &table.rows[7];
        assert_eq!(boundary.scenario, "-10%");
        assert_eq!(boundary.payment_at_maturity, Some(dec!(1010.1667)));
        // -10.01% is the first downside row
        let below = &table.rows[8];
        assert_eq!(below.scenario, "-10.01%");
        assert_eq!(below.payment_formatted, "999.9000");
        // Total loss floors at zero
        assert_eq!(
            table.rows.last().unwrap().payment_at_maturity,
            Some(Decimal::ZERO)
        );
    }

    // -----------------------------------------------------------------------
    // 2. A bad entry is isolated to its own row
    // -----------------------------------------------------------------------
    #[test]
    fn test_bad_row_is_isolated() {
        let scenarios = vec![json!(0.10), json!("n/a"), json!("-25%")];
        let table = payoff_table(&NoteParameters::default(), &scenarios).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].payment_formatted, "1010.1667");

        let bad = &table.rows[1];
        assert_eq!(bad.scenario, "n/a");
        assert_eq!(bad.payment_formatted, "ERROR");
        assert!(bad.underlying_return.is_none());
        assert!(bad.note.is_some());

        // The row after the failure is still computed: 1000 + 1000 * -0.15
        assert_eq!(table.rows[2].payment_at_maturity, Some(dec!(850)));
    }

    // -----------------------------------------------------------------------
    // 3. Scenario parsing accepts fractions and percentages
    // -----------------------------------------------------------------------
    #[test]
    fn test_parse_scenario_forms() {
        assert_eq!(parse_scenario(&json!(-0.10)).unwrap(), dec!(-0.10));
        assert_eq!(parse_scenario(&json!("-0.10")).unwrap(), dec!(-0.10));
        assert_eq!(parse_scenario(&json!("-10%")).unwrap(), dec!(-0.10));
        assert_eq!(parse_scenario(&json!(" 42.1 % ")).unwrap(), dec!(0.421));
        assert!(parse_scenario(&json!("abc")).is_err());
        assert!(parse_scenario(&json!(null)).is_err());
        assert!(parse_scenario(&json!([1, 2])).is_err());
    }

    // -----------------------------------------------------------------------
    // 4. Invalid parameters fail the whole request, not row by row
    // -----------------------------------------------------------------------
    #[test]
    fn test_invalid_params_fail_fast() {
        let params = NoteParameters {
            buffer_threshold: dec!(1.5),
            ..NoteParameters::default()
        };
        assert!(payoff_table_default(&params).is_err());
    }

    // -----------------------------------------------------------------------
    // 5. Envelope: advisories and row errors surface as warnings
    // -----------------------------------------------------------------------
    #[test]
    fn test_envelope_collects_row_notes() {
        let input = TableInput {
            params: None,
            scenarios: Some(vec![json!(-1.50), json!("bogus"), json!(0.10)]),
        };
        let output = compute_payoff_table(&input).unwrap();
        // One advisory (below -100%) plus one parse failure
        assert_eq!(output.warnings.len(), 2);
        assert_eq!(output.result.rows.len(), 3);
        assert_eq!(output.metadata.precision, "rust_decimal_128bit");
    }

    // -----------------------------------------------------------------------
    // 6. Percent labels normalize trailing zeros
    // -----------------------------------------------------------------------
    #[test]
    fn test_percent_labels() {
        assert_eq!(percent_label(dec!(0.05)), "5%");
        assert_eq!(percent_label(dec!(-0.1001)), "-10.01%");
        assert_eq!(percent_label(Decimal::ZERO), "0%");
    }
}
