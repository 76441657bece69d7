//! Pregnancy due date by Naegele's rule (LMP + 280 days).

use crate::clock::Clock;
use crate::limits::{CONCEPTION_OFFSET_DAYS, MAX_PREGNANCY_WEEK, PREGNANCY_DAYS};
use crate::types::shift_days;
use crate::{FormFields, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PregnancyInput {
    pub lmp: NaiveDate,
}

impl PregnancyInput {
    pub fn from_fields(fields: &FormFields) -> Result<Self, ValidationError> {
        Ok(Self {
            lmp: fields.lmp_date()?,
        })
    }

    /// The LMP must lie within the last 280 days, today included.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.lmp > today {
            return Err(ValidationError::DateInFuture);
        }
        if (today - self.lmp).num_days() > PREGNANCY_DAYS {
            return Err(ValidationError::DateTooOld);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PregnancyResult {
    pub due_date: NaiveDate,
    pub conception_date: NaiveDate,
    /// Gestational week, 1 through 42
    pub current_week: u32,
    pub trimester: u8,
    pub days_remaining: u32,
    pub weeks_remaining: u32,
}

pub fn calculate(
    input: &PregnancyInput,
    clock: &dyn Clock,
) -> Result<PregnancyResult, ValidationError> {
    let today = clock.today();
    input.validate(today)?;

    let due_date = shift_days(input.lmp, PREGNANCY_DAYS)?;
    let conception_date = shift_days(input.lmp, CONCEPTION_OFFSET_DAYS)?;

    let days_since_lmp = (today - input.lmp).num_days();
    let current_week = (days_since_lmp / 7 + 1).clamp(1, MAX_PREGNANCY_WEEK) as u32;
    let days_remaining = (due_date - today).num_days().max(0) as u32;

    tracing::debug!(
        "Pregnancy: lmp={} due={} week={} remaining={}",
        input.lmp,
        due_date,
        current_week,
        days_remaining
    );

    Ok(PregnancyResult {
        due_date,
        conception_date,
        current_week,
        trimester: trimester_for_week(current_week),
        days_remaining,
        weeks_remaining: days_remaining / 7,
    })
}

pub fn trimester_for_week(week: u32) -> u8 {
    match week {
        0..=12 => 1,
        13..=27 => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lmp_2024() -> PregnancyInput {
        PregnancyInput {
            lmp: date(2024, 1, 1),
        }
    }

    #[test]
    fn test_naegele_due_date() {
        let result = calculate(&lmp_2024(), &FixedClock(date(2024, 3, 1))).unwrap();

        assert_eq!(result.due_date, date(2024, 10, 7));
        assert_eq!(result.conception_date, date(2024, 1, 15));
    }

    #[test]
    fn test_progress_midway() {
        // 60 days after LMP
        let result = calculate(&lmp_2024(), &FixedClock(date(2024, 3, 1))).unwrap();

        assert_eq!(result.current_week, 9);
        assert_eq!(result.trimester, 1);
        assert_eq!(result.days_remaining, 220);
        assert_eq!(result.weeks_remaining, 31);
    }

    #[test]
    fn test_week_one_on_lmp_day() {
        let result = calculate(&lmp_2024(), &FixedClock(date(2024, 1, 1))).unwrap();

        assert_eq!(result.current_week, 1);
        assert_eq!(result.days_remaining, 280);
        assert_eq!(result.weeks_remaining, 40);
    }

    #[test]
    fn test_due_date_today_has_zero_days_remaining() {
        let result = calculate(&lmp_2024(), &FixedClock(date(2024, 10, 7))).unwrap();

        assert_eq!(result.days_remaining, 0);
        assert_eq!(result.weeks_remaining, 0);
        assert_eq!(result.current_week, 41);
        assert_eq!(result.trimester, 3);
    }

    #[test]
    fn test_future_lmp_rejected() {
        assert_eq!(
            calculate(&lmp_2024(), &FixedClock(date(2023, 12, 31))),
            Err(ValidationError::DateInFuture)
        );
    }

    #[test]
    fn test_lmp_older_than_280_days_rejected() {
        assert_eq!(
            calculate(&lmp_2024(), &FixedClock(date(2024, 10, 8))),
            Err(ValidationError::DateTooOld)
        );
    }

    #[test]
    fn test_trimester_boundaries() {
        assert_eq!(trimester_for_week(1), 1);
        assert_eq!(trimester_for_week(12), 1);
        assert_eq!(trimester_for_week(13), 2);
        assert_eq!(trimester_for_week(27), 2);
        assert_eq!(trimester_for_week(28), 3);
        assert_eq!(trimester_for_week(42), 3);
    }

    #[test]
    fn test_missing_and_invalid_dates() {
        assert_eq!(
            PregnancyInput::from_fields(&FormFields::default()),
            Err(ValidationError::MissingDate)
        );
        let fields = FormFields {
            lmp: Some("2024-13-01".into()),
            ..FormFields::default()
        };
        assert_eq!(
            PregnancyInput::from_fields(&fields),
            Err(ValidationError::InvalidDate)
        );
    }

    #[test]
    fn test_deterministic_with_fixed_clock() {
        let clock = FixedClock(date(2024, 5, 20));
        assert_eq!(
            calculate(&lmp_2024(), &clock).unwrap(),
            calculate(&lmp_2024(), &clock).unwrap()
        );
    }
}
