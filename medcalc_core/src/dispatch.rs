//! Request dispatch across the calculators.
//!
//! A request names its calculator by a `type` string. The string is resolved
//! into a [`CalculatorKind`] once and everything after that is a plain match.

use crate::calories::{self, CalorieInput, CalorieResult};
use crate::clock::Clock;
use crate::config::{Config, OutputMode};
use crate::ovulation::{self, OvulationInput, OvulationResult};
use crate::pregnancy::{self, PregnancyInput, PregnancyResult};
use crate::{CalculatorKind, Error, FormFields, Result};
use serde::{Deserialize, Serialize};

/// An incoming calculation request
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CalculationRequest {
    #[serde(rename = "type", default)]
    pub calculator: String,

    #[serde(default)]
    pub user_name: Option<String>,

    #[serde(default)]
    pub user_email: Option<String>,

    #[serde(default)]
    pub consent: bool,

    #[serde(flatten)]
    pub fields: FormFields,
}

impl CalculationRequest {
    /// Whether the request carries a usable email address.
    ///
    /// Anything that is not shaped like `local@domain.tld` counts as missing.
    fn has_email(&self) -> bool {
        self.user_email.as_deref().is_some_and(is_email_shaped)
    }
}

fn is_email_shaped(raw: &str) -> bool {
    let email = raw.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Result of any calculator, tagged with the calculator type
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationResult {
    Calories(CalorieResult),
    Ovulation(OvulationResult),
    Pregnancy(PregnancyResult),
}

impl CalculationResult {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculationResult::Calories(_) => CalculatorKind::Calories,
            CalculationResult::Ovulation(_) => CalculatorKind::Ovulation,
            CalculationResult::Pregnancy(_) => CalculatorKind::Pregnancy,
        }
    }
}

/// What the caller gets back for a successful request
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculationResponse {
    pub result: CalculationResult,
    pub output_mode: OutputMode,
    pub show_result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Run one calculator on loose fields
pub fn calculate(
    kind: CalculatorKind,
    fields: &FormFields,
    clock: &dyn Clock,
    config: &Config,
) -> Result<CalculationResult> {
    let result = match kind {
        CalculatorKind::Calories => {
            let input = CalorieInput::from_fields(fields)?;
            CalculationResult::Calories(calories::calculate(&input)?)
        }
        CalculatorKind::Ovulation => {
            let input =
                OvulationInput::from_fields(fields, config.ovulation.default_cycle_length)?;
            CalculationResult::Ovulation(ovulation::calculate(&input, clock)?)
        }
        CalculatorKind::Pregnancy => {
            let input = PregnancyInput::from_fields(fields)?;
            CalculationResult::Pregnancy(pregnancy::calculate(&input, clock)?)
        }
    };
    Ok(result)
}

/// Resolve, gate and run a request
///
/// 1. Resolve the calculator type (unknown types fail)
/// 2. Check the output mode: email-gated modes need an address up front
/// 3. Validate the fields and calculate
/// 4. Decide whether the result is shown directly
pub fn dispatch(
    request: &CalculationRequest,
    clock: &dyn Clock,
    config: &Config,
) -> Result<CalculationResponse> {
    let kind: CalculatorKind = request.calculator.parse()?;
    let mode = config.output.mode;

    if mode.requires_email() && !request.has_email() {
        tracing::info!("Rejecting {} request without email ({:?})", kind, mode);
        return Err(Error::EmailRequired);
    }

    let result = match calculate(kind, &request.fields, clock, config) {
        Ok(result) => result,
        Err(e) => {
            tracing::info!("{} request rejected: {}", kind, e);
            return Err(e);
        }
    };

    tracing::info!("Calculated {} result (mode {:?})", kind, mode);

    let (show_result, message) = match mode {
        OutputMode::EmailOnly => (
            false,
            Some("Your results have been sent to your email address.".to_string()),
        ),
        OutputMode::Instant | OutputMode::EmailFirst => (true, None),
    };

    Ok(CalculationResponse {
        result,
        output_mode: mode,
        show_result,
        message,
    })
}
