//! Core domain types for the medical calculators.
//!
//! This module defines the vocabulary shared across calculators:
//! - Calculator kinds used by the dispatcher
//! - Body metric enums (gender, activity level, goal, BMI category)
//! - Cycle vocabulary (fertility levels)
//! - Loose form fields as they arrive from a request

use crate::{Error, ValidationError};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowercase and trim a submitted key, so "Male " and "male" compare equal
fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

// ============================================================================
// Calculator Kinds
// ============================================================================

/// The closed set of calculators a request can address
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Calories,
    Ovulation,
    Pregnancy,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 3] = [
        CalculatorKind::Calories,
        CalculatorKind::Ovulation,
        CalculatorKind::Pregnancy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorKind::Calories => "calories",
            CalculatorKind::Ovulation => "ovulation",
            CalculatorKind::Pregnancy => "pregnancy",
        }
    }
}

impl FromStr for CalculatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        CalculatorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == key)
            .ok_or_else(|| Error::UnknownCalculator(s.to_string()))
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Body Metric Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ValidationError::InvalidGender),
        }
    }
}

/// Physical activity level with its TDEE multiplier
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::Light => "Lightly Active (light exercise 1-3 days/week)",
            ActivityLevel::Moderate => "Moderately Active (moderate exercise 3-5 days/week)",
            ActivityLevel::Active => "Very Active (hard exercise 6-7 days/week)",
            ActivityLevel::VeryActive => "Extra Active (very hard exercise & physical job)",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            _ => Err(ValidationError::InvalidActivityLevel),
        }
    }
}

/// Weight goal that selects the calorie target
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    #[default]
    Maintain,
    Lose,
    #[serde(rename = "lose_10")]
    Lose10,
    Gain,
}

impl Goal {
    /// Resolve a submitted goal key. Missing or unknown keys mean `Maintain`.
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(normalize_key).as_deref() {
            Some("lose") => Goal::Lose,
            Some("lose_10") => Goal::Lose10,
            Some("gain") => Goal::Gain,
            _ => Goal::Maintain,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Goal::Maintain => "Maintain Weight",
            Goal::Lose => "Lose Weight (-500 kcal)",
            Goal::Lose10 => "Lose Weight (-10%)",
            Goal::Gain => "Gain Weight (+500 kcal)",
        }
    }
}

/// WHO BMI classification
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Display colour used when rendering the category badge
    pub fn color(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "#3498db",
            BmiCategory::Normal => "#27ae60",
            BmiCategory::Overweight => "#f39c12",
            BmiCategory::Obese => "#e74c3c",
        }
    }
}

// ============================================================================
// Cycle Types
// ============================================================================

/// Likelihood of conception on a given day of the fertile window
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FertilityLevel {
    Low,
    Medium,
    High,
}

impl FertilityLevel {
    /// Level for a day `distance` days away from ovulation (either side)
    pub fn from_distance(distance: i64) -> Self {
        match distance.abs() {
            0..=1 => FertilityLevel::High,
            2 => FertilityLevel::Medium,
            _ => FertilityLevel::Low,
        }
    }
}

// ============================================================================
// Request Fields
// ============================================================================

/// Loosely typed calculator fields as submitted by a form, CLI or CSV row.
///
/// Missing numeric fields count as zero and fail their bound checks, the way
/// an empty form field would. Numbers may also arrive as strings (`"24"`);
/// blank strings count as missing and other text counts as zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FormFields {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "form_number")]
    pub age: Option<i64>,
    #[serde(default, deserialize_with = "form_number")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "form_number")]
    pub height: Option<f64>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub lmp: Option<String>,
    #[serde(default, deserialize_with = "form_number")]
    pub cycle_length: Option<i64>,
}

/// A form number as posted: either a JSON number or its text
#[derive(Deserialize)]
#[serde(untagged)]
enum FormNumber<T> {
    Number(T),
    Text(String),
}

fn form_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr + Default,
{
    Ok(match Option::<FormNumber<T>>::deserialize(deserializer)? {
        None => None,
        Some(FormNumber::Number(n)) => Some(n),
        Some(FormNumber::Text(text)) => match text.trim() {
            "" => None,
            text => Some(text.parse().unwrap_or_default()),
        },
    })
}

impl FormFields {
    /// Parse the last-menstrual-period field
    pub fn lmp_date(&self) -> Result<NaiveDate, ValidationError> {
        parse_date(self.lmp.as_deref())
    }
}

/// Parse a submitted date. Accepts `YYYY-MM-DD` and `YYYY/MM/DD`.
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Err(ValidationError::MissingDate),
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .map_err(|_| ValidationError::InvalidDate)
}

/// Move a date by a signed number of days, rejecting dates outside the calendar
pub(crate) fn shift_days(date: NaiveDate, days: i64) -> Result<NaiveDate, ValidationError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(ValidationError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculator_kind_parses_known_types() {
        assert_eq!(
            "calories".parse::<CalculatorKind>().unwrap(),
            CalculatorKind::Calories
        );
        assert_eq!(
            " Pregnancy ".parse::<CalculatorKind>().unwrap(),
            CalculatorKind::Pregnancy
        );
        assert!(matches!(
            "bmi".parse::<CalculatorKind>(),
            Err(Error::UnknownCalculator(t)) if t == "bmi"
        ));
    }

    #[test]
    fn test_gender_and_activity_keys() {
        assert_eq!("MALE".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("other".parse::<Gender>(), Err(ValidationError::InvalidGender));
        assert_eq!(
            "very_active".parse::<ActivityLevel>().unwrap(),
            ActivityLevel::VeryActive
        );
        assert_eq!(
            "couch".parse::<ActivityLevel>(),
            Err(ValidationError::InvalidActivityLevel)
        );
    }

    #[test]
    fn test_goal_falls_back_to_maintain() {
        assert_eq!(Goal::from_key(Some("lose_10")), Goal::Lose10);
        assert_eq!(Goal::from_key(Some("bulk")), Goal::Maintain);
        assert_eq!(Goal::from_key(None), Goal::Maintain);
        assert_eq!(serde_json::to_string(&Goal::Lose10).unwrap(), "\"lose_10\"");
    }

    #[test]
    fn test_bmi_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_fertility_level_by_distance() {
        assert_eq!(FertilityLevel::from_distance(0), FertilityLevel::High);
        assert_eq!(FertilityLevel::from_distance(-1), FertilityLevel::High);
        assert_eq!(FertilityLevel::from_distance(2), FertilityLevel::Medium);
        assert_eq!(FertilityLevel::from_distance(-5), FertilityLevel::Low);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some("2024-01-01")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(
            parse_date(Some("2024/02/29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(parse_date(None), Err(ValidationError::MissingDate));
        assert_eq!(parse_date(Some("  ")), Err(ValidationError::MissingDate));
        assert_eq!(parse_date(Some("2023-02-29")), Err(ValidationError::InvalidDate));
        assert_eq!(parse_date(Some("yesterday")), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn test_form_numbers_accept_posted_text() {
        let fields: FormFields = serde_json::from_str(
            r#"{"age":"24","weight":" 72.5 ","height":182,"cycle_length":""}"#,
        )
        .unwrap();
        assert_eq!(fields.age, Some(24));
        assert_eq!(fields.weight, Some(72.5));
        assert_eq!(fields.height, Some(182.0));
        assert_eq!(fields.cycle_length, None);

        let fields: FormFields =
            serde_json::from_str(r#"{"age":"twenty","cycle_length":null}"#).unwrap();
        assert_eq!(fields.age, Some(0));
        assert_eq!(fields.cycle_length, None);
        assert_eq!(fields.weight, None);
    }
}
