//! Ovulation date and fertile window from the last menstrual period.
//!
//! Ovulation is placed 14 days before the next expected period. The fertile
//! window spans five days before ovulation through the day after it.

use crate::clock::Clock;
use crate::limits::{
    cycle_length_in_range, FERTILE_DAYS_AFTER, FERTILE_DAYS_BEFORE, LUTEAL_PHASE_DAYS,
};
use crate::types::shift_days;
use crate::{FertilityLevel, FormFields, ValidationError};
use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OvulationInput {
    pub lmp: NaiveDate,
    pub cycle_length: u32,
}

impl OvulationInput {
    /// Build an input from submitted fields, using `default_cycle_length`
    /// when no cycle length was given.
    pub fn from_fields(
        fields: &FormFields,
        default_cycle_length: u32,
    ) -> Result<Self, ValidationError> {
        let lmp = fields.lmp_date()?;

        let cycle_length = match fields.cycle_length {
            None => default_cycle_length,
            Some(days) => u32::try_from(days).map_err(|_| ValidationError::InvalidCycleLength)?,
        };

        let input = Self { lmp, cycle_length };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !cycle_length_in_range(self.cycle_length) {
            return Err(ValidationError::InvalidCycleLength);
        }
        Ok(())
    }
}

/// A single day inside the fertile window
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FertileDay {
    pub date: NaiveDate,
    pub level: FertilityLevel,
    pub is_ovulation: bool,
}

/// Where "today" falls relative to the fertile window.
///
/// Serializes as `{"status": ..., "days_until"?: ..., "message": ...}`. The
/// message is ignored when reading a status back.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FertilityStatus {
    Before { days_until: i64 },
    Fertile,
    Ovulation,
    Passed,
}

impl FertilityStatus {
    pub fn key(&self) -> &'static str {
        match self {
            FertilityStatus::Before { .. } => "before",
            FertilityStatus::Fertile => "fertile",
            FertilityStatus::Ovulation => "ovulation",
            FertilityStatus::Passed => "passed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            FertilityStatus::Before { days_until: 1 } => {
                "Fertile window begins in 1 day.".to_string()
            }
            FertilityStatus::Before { days_until } => {
                format!("Fertile window begins in {} days.", days_until)
            }
            FertilityStatus::Fertile => "You are currently in your fertile window.".to_string(),
            FertilityStatus::Ovulation => "Today is your estimated ovulation day!".to_string(),
            FertilityStatus::Passed => "Your fertile window has passed for this cycle.".to_string(),
        }
    }
}

impl Serialize for FertilityStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let days_until = match self {
            FertilityStatus::Before { days_until } => Some(*days_until),
            _ => None,
        };

        let len = if days_until.is_some() { 3 } else { 2 };
        let mut state = serializer.serialize_struct("FertilityStatus", len)?;
        state.serialize_field("status", self.key())?;
        if let Some(days) = days_until {
            state.serialize_field("days_until", &days)?;
        }
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OvulationResult {
    pub ovulation_date: NaiveDate,
    pub next_period: NaiveDate,
    pub fertile_start: NaiveDate,
    pub fertile_end: NaiveDate,
    /// First day of peak fertility; peak ends on the ovulation date
    pub peak_start: NaiveDate,
    pub cycle_length: u32,
    pub fertile_days: Vec<FertileDay>,
    pub fertility_status: FertilityStatus,
}

pub fn calculate(
    input: &OvulationInput,
    clock: &dyn Clock,
) -> Result<OvulationResult, ValidationError> {
    input.validate()?;

    let cycle_length = i64::from(input.cycle_length);
    let ovulation_date = shift_days(input.lmp, cycle_length - LUTEAL_PHASE_DAYS)?;
    let next_period = shift_days(input.lmp, cycle_length)?;
    let fertile_start = shift_days(ovulation_date, -FERTILE_DAYS_BEFORE)?;
    let fertile_end = shift_days(ovulation_date, FERTILE_DAYS_AFTER)?;
    let peak_start = shift_days(ovulation_date, -2)?;

    let fertile_days = fertile_start
        .iter_days()
        .take_while(|day| *day <= fertile_end)
        .map(|day| FertileDay {
            date: day,
            level: FertilityLevel::from_distance((day - ovulation_date).num_days()),
            is_ovulation: day == ovulation_date,
        })
        .collect();

    let today = clock.today();
    let fertility_status = if today < fertile_start {
        FertilityStatus::Before {
            days_until: (fertile_start - today).num_days(),
        }
    } else if today <= fertile_end {
        if today == ovulation_date {
            FertilityStatus::Ovulation
        } else {
            FertilityStatus::Fertile
        }
    } else {
        FertilityStatus::Passed
    };

    tracing::debug!(
        "Ovulation: lmp={} cycle={} ovulation={} status={:?}",
        input.lmp,
        input.cycle_length,
        ovulation_date,
        fertility_status
    );

    Ok(OvulationResult {
        ovulation_date,
        next_period,
        fertile_start,
        fertile_end,
        peak_start,
        cycle_length: input.cycle_length,
        fertile_days,
        fertility_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::limits::DEFAULT_CYCLE_LENGTH;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn reference_input() -> OvulationInput {
        OvulationInput {
            lmp: date(2024, 1, 1),
            cycle_length: 28,
        }
    }

    fn fields(lmp: Option<&str>, cycle_length: Option<i64>) -> FormFields {
        FormFields {
            lmp: lmp.map(Into::into),
            cycle_length,
            ..FormFields::default()
        }
    }

    #[test]
    fn test_reference_cycle() {
        let clock = FixedClock(date(2024, 1, 1));
        let result = calculate(&reference_input(), &clock).unwrap();

        assert_eq!(result.ovulation_date, date(2024, 1, 15));
        assert_eq!(result.next_period, date(2024, 1, 29));
        assert_eq!(result.fertile_start, date(2024, 1, 10));
        assert_eq!(result.fertile_end, date(2024, 1, 16));
        assert_eq!(result.peak_start, date(2024, 1, 13));
    }

    #[test]
    fn test_fertile_days_levels() {
        let clock = FixedClock(date(2024, 1, 1));
        let result = calculate(&reference_input(), &clock).unwrap();

        let levels: Vec<_> = result.fertile_days.iter().map(|d| d.level).collect();
        assert_eq!(
            levels,
            vec![
                FertilityLevel::Low,
                FertilityLevel::Low,
                FertilityLevel::Low,
                FertilityLevel::Medium,
                FertilityLevel::High,
                FertilityLevel::High,
                FertilityLevel::High,
            ]
        );

        let ovulation_days: Vec<_> = result
            .fertile_days
            .iter()
            .filter(|d| d.is_ovulation)
            .map(|d| d.date)
            .collect();
        assert_eq!(ovulation_days, vec![date(2024, 1, 15)]);
    }

    #[test]
    fn test_status_relative_to_today() {
        let input = reference_input();
        let status = |today| calculate(&input, &FixedClock(today)).unwrap().fertility_status;

        assert_eq!(
            status(date(2024, 1, 5)),
            FertilityStatus::Before { days_until: 5 }
        );
        assert_eq!(status(date(2024, 1, 10)), FertilityStatus::Fertile);
        assert_eq!(status(date(2024, 1, 15)), FertilityStatus::Ovulation);
        assert_eq!(status(date(2024, 1, 16)), FertilityStatus::Fertile);
        assert_eq!(status(date(2024, 1, 17)), FertilityStatus::Passed);
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            FertilityStatus::Before { days_until: 1 }.message(),
            "Fertile window begins in 1 day."
        );
        assert_eq!(
            FertilityStatus::Before { days_until: 4 }.message(),
            "Fertile window begins in 4 days."
        );
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let json = serde_json::to_value(FertilityStatus::Before { days_until: 3 }).unwrap();
        assert_eq!(json["status"], "before");
        assert_eq!(json["days_until"], 3);
        assert_eq!(json["message"], "Fertile window begins in 3 days.");

        let json = serde_json::to_value(FertilityStatus::Passed).unwrap();
        assert_eq!(json["status"], "passed");
        assert_eq!(json["message"], "Your fertile window has passed for this cycle.");
        assert!(json.get("days_until").is_none());
    }

    #[test]
    fn test_status_reads_back_ignoring_message() {
        for status in [
            FertilityStatus::Before { days_until: 1 },
            FertilityStatus::Fertile,
            FertilityStatus::Ovulation,
            FertilityStatus::Passed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: FertilityStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_short_and_long_cycles() {
        let clock = FixedClock(date(2024, 1, 1));

        let short = OvulationInput {
            lmp: date(2024, 1, 1),
            cycle_length: 21,
        };
        assert_eq!(calculate(&short, &clock).unwrap().ovulation_date, date(2024, 1, 8));

        let long = OvulationInput {
            lmp: date(2024, 1, 1),
            cycle_length: 35,
        };
        let result = calculate(&long, &clock).unwrap();
        assert_eq!(result.ovulation_date, date(2024, 1, 22));
        assert_eq!(result.next_period, date(2024, 2, 5));
    }

    #[test]
    fn test_cycle_length_bounds() {
        assert!(OvulationInput::from_fields(&fields(Some("2024-01-01"), Some(21)), 28).is_ok());
        assert!(OvulationInput::from_fields(&fields(Some("2024-01-01"), Some(35)), 28).is_ok());
        assert_eq!(
            OvulationInput::from_fields(&fields(Some("2024-01-01"), Some(20)), 28),
            Err(ValidationError::InvalidCycleLength)
        );
        assert_eq!(
            OvulationInput::from_fields(&fields(Some("2024-01-01"), Some(36)), 28),
            Err(ValidationError::InvalidCycleLength)
        );
        assert_eq!(
            OvulationInput::from_fields(&fields(Some("2024-01-01"), Some(-28)), 28),
            Err(ValidationError::InvalidCycleLength)
        );
    }

    #[test]
    fn test_default_cycle_length_applies() {
        let input =
            OvulationInput::from_fields(&fields(Some("2024-01-01"), None), DEFAULT_CYCLE_LENGTH)
                .unwrap();
        assert_eq!(input.cycle_length, 28);

        let input = OvulationInput::from_fields(&fields(Some("2024-01-01"), None), 30).unwrap();
        assert_eq!(input.cycle_length, 30);
    }

    #[test]
    fn test_date_errors_come_first() {
        assert_eq!(
            OvulationInput::from_fields(&fields(None, Some(5)), 28),
            Err(ValidationError::MissingDate)
        );
        assert_eq!(
            OvulationInput::from_fields(&fields(Some("01-01-2024x"), Some(5)), 28),
            Err(ValidationError::InvalidDate)
        );
    }

    #[test]
    fn test_deterministic_with_fixed_clock() {
        let clock = FixedClock(date(2024, 1, 12));
        let input = reference_input();
        let first = serde_json::to_string(&calculate(&input, &clock).unwrap()).unwrap();
        let second = serde_json::to_string(&calculate(&input, &clock).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
