//! Range rules of the input surface.
//!
//! The store trusts the values it is given apart from the start/end ordering
//! rule, so anything that captures raw user input (the HTTP API, the CLI)
//! runs it through [`clamp_edit`] first. The ranges match the sliders of the
//! calculator UI: ages move in whole years, the interest rate in tenths of a
//! percent.

use super::error::StoreError;
use super::types::{HORIZON_YEARS, ParameterEdit, ParameterField, ScenarioParameters};

pub const MIN_START_AGE: u32 = 18;
pub const MAX_START_AGE: u32 = 70;
pub const MAX_END_AGE: u32 = HORIZON_YEARS;
pub const MIN_INTEREST_RATE: f64 = 1.0;
pub const MAX_INTEREST_RATE: f64 = 15.0;
const INTEREST_RATE_STEPS_PER_PERCENT: f64 = 10.0;

/// Builds a typed edit from a raw number without clamping.
///
/// Ages must be non-negative whole numbers; every value must be finite.
pub fn edit_from_raw(field: ParameterField, value: f64) -> Result<ParameterEdit, StoreError> {
    if !value.is_finite() {
        return Err(StoreError::NonFinite { field });
    }
    match field {
        ParameterField::StartAge => Ok(ParameterEdit::StartAge(whole_age(field, value)?)),
        ParameterField::EndAge => Ok(ParameterEdit::EndAge(whole_age(field, value)?)),
        ParameterField::AnnualContribution => Ok(ParameterEdit::AnnualContribution(value)),
        ParameterField::InterestRate => Ok(ParameterEdit::InterestRate(value)),
    }
}

/// Clamps a raw value the way the input widgets do and returns the edit.
///
/// The end-age lower bound follows the scenario's current start age, so an
/// edit produced here can never invert the contribution window.
pub fn clamp_edit(
    field: ParameterField,
    value: f64,
    current: &ScenarioParameters,
) -> Result<ParameterEdit, StoreError> {
    if !value.is_finite() {
        return Err(StoreError::NonFinite { field });
    }
    let edit = match field {
        ParameterField::StartAge => {
            ParameterEdit::StartAge(clamp_age(value, MIN_START_AGE, MAX_START_AGE))
        }
        ParameterField::EndAge => {
            ParameterEdit::EndAge(clamp_age(value, current.start_age, MAX_END_AGE))
        }
        ParameterField::AnnualContribution => ParameterEdit::AnnualContribution(value.max(0.0)),
        ParameterField::InterestRate => {
            let snapped =
                (value * INTEREST_RATE_STEPS_PER_PERCENT).round() / INTEREST_RATE_STEPS_PER_PERCENT;
            ParameterEdit::InterestRate(snapped.clamp(MIN_INTEREST_RATE, MAX_INTEREST_RATE))
        }
    };
    if edit.value() != value {
        tracing::debug!(
            field = field.as_str(),
            requested = value,
            applied = edit.value(),
            "input clamped"
        );
    }
    Ok(edit)
}

// The lower bound wins when it exceeds the upper one.
fn clamp_age(value: f64, min: u32, max: u32) -> u32 {
    let rounded = value.round().min(f64::from(max));
    let rounded = rounded.max(f64::from(min));
    rounded as u32
}

fn whole_age(field: ParameterField, value: f64) -> Result<u32, StoreError> {
    if value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(StoreError::InvalidAge { field, value });
    }
    Ok(value as u32)
}
