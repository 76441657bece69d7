//! Fixed input bounds and clinical constants shared by the calculators.

pub const MIN_AGE: u32 = 15;
pub const MAX_AGE: u32 = 120;

pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 300.0;

pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;

pub const MIN_CYCLE_LENGTH: u32 = 21;
pub const MAX_CYCLE_LENGTH: u32 = 35;
pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// Luteal phase length; ovulation happens this many days before the next period
pub const LUTEAL_PHASE_DAYS: i64 = 14;
pub const FERTILE_DAYS_BEFORE: i64 = 5;
pub const FERTILE_DAYS_AFTER: i64 = 1;

/// Naegele's rule: 40 weeks from the last menstrual period
pub const PREGNANCY_DAYS: i64 = 280;
pub const CONCEPTION_OFFSET_DAYS: i64 = 14;
pub const MAX_PREGNANCY_WEEK: i64 = 42;

/// Lowest calorie target ever recommended for weight loss
pub const MIN_DAILY_CALORIES: i64 = 1200;

/// True when `cycle_length` is inside the accepted range
pub fn cycle_length_in_range(cycle_length: u32) -> bool {
    (MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&cycle_length)
}
