//! Daily calorie needs using the Mifflin-St Jeor equation.
//!
//! The calculation runs in four steps:
//! 1. BMR from gender, age, weight and height
//! 2. TDEE by scaling BMR with the activity multiplier
//! 3. A calorie target for the selected goal (never below 1200 kcal when losing)
//! 4. A fixed 30/40/30 protein/carbs/fat split of that target

use crate::limits::{
    MAX_AGE, MAX_HEIGHT_CM, MAX_WEIGHT_KG, MIN_AGE, MIN_DAILY_CALORIES, MIN_HEIGHT_CM,
    MIN_WEIGHT_KG,
};
use crate::{ActivityLevel, BmiCategory, FormFields, Gender, Goal, ValidationError};
use serde::{Deserialize, Serialize};

const PROTEIN_PERCENT: u8 = 30;
const CARBS_PERCENT: u8 = 40;
const FAT_PERCENT: u8 = 30;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Validated calorie calculator input
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalorieInput {
    pub gender: Gender,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
}

impl CalorieInput {
    /// Build an input from submitted fields.
    ///
    /// Checks run in a fixed order (gender, age, weight, height, activity) and
    /// the first failure is returned.
    pub fn from_fields(fields: &FormFields) -> Result<Self, ValidationError> {
        let gender: Gender = fields.gender.as_deref().unwrap_or_default().parse()?;

        let age = fields.age.unwrap_or(0);
        let weight_kg = fields.weight.unwrap_or(0.0);
        let height_cm = fields.height.unwrap_or(0.0);
        check_bounds(age, weight_kg, height_cm)?;

        let activity: ActivityLevel = fields.activity.as_deref().unwrap_or_default().parse()?;

        Ok(Self {
            gender,
            // in range after check_bounds
            age: age as u32,
            weight_kg,
            height_cm,
            activity,
            goal: Goal::from_key(fields.goal.as_deref()),
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_bounds(i64::from(self.age), self.weight_kg, self.height_cm)
    }
}

fn check_bounds(age: i64, weight_kg: f64, height_cm: f64) -> Result<(), ValidationError> {
    if !(i64::from(MIN_AGE)..=i64::from(MAX_AGE)).contains(&age) {
        return Err(ValidationError::InvalidAge);
    }
    if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
        return Err(ValidationError::InvalidWeight);
    }
    if !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&height_cm) {
        return Err(ValidationError::InvalidHeight);
    }
    Ok(())
}

/// One macronutrient's share of a calorie target
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Macro {
    pub grams: u32,
    pub calories: u32,
    pub percent: u8,
}

impl Macro {
    fn of(target: u32, percent: u8, kcal_per_gram: f64) -> Self {
        let calories = f64::from(target) * f64::from(percent) / 100.0;
        Self {
            grams: (calories / kcal_per_gram).round() as u32,
            calories: calories.round() as u32,
            percent,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MacroSplit {
    pub protein: Macro,
    pub carbs: Macro,
    pub fat: Macro,
}

impl MacroSplit {
    pub fn for_calories(target: u32) -> Self {
        Self {
            protein: Macro::of(target, PROTEIN_PERCENT, KCAL_PER_GRAM_PROTEIN),
            carbs: Macro::of(target, CARBS_PERCENT, KCAL_PER_GRAM_CARBS),
            fat: Macro::of(target, FAT_PERCENT, KCAL_PER_GRAM_FAT),
        }
    }
}

/// An alternative calorie target shown alongside the selected goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalOption {
    pub key: String,
    pub label: String,
    pub calories: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalorieResult {
    /// Unrounded basal metabolic rate (kcal/day)
    pub bmr: f64,
    pub tdee: u32,
    /// Body mass index, one decimal
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub goal_calories: u32,
    pub macros: MacroSplit,
    pub goal_macros: MacroSplit,
    pub goals: Vec<GoalOption>,
}

/// Calculate calorie needs for a validated input
pub fn calculate(input: &CalorieInput) -> Result<CalorieResult, ValidationError> {
    input.validate()?;

    let bmr = basal_metabolic_rate(input.gender, input.age, input.weight_kg, input.height_cm);
    let tdee = (bmr * input.activity.multiplier()).round() as u32;
    let bmi = body_mass_index(input.weight_kg, input.height_cm);
    let goal_calories = goal_calories(tdee, input.goal);

    tracing::debug!(
        "Calories: bmr={} tdee={} bmi={} goal={:?} target={}",
        bmr,
        tdee,
        bmi,
        input.goal,
        goal_calories
    );

    Ok(CalorieResult {
        bmr,
        tdee,
        bmi,
        bmi_category: BmiCategory::from_bmi(bmi),
        activity_level: input.activity,
        goal: input.goal,
        goal_calories,
        macros: MacroSplit::for_calories(tdee),
        goal_macros: MacroSplit::for_calories(goal_calories),
        goals: goal_options(tdee),
    })
}

/// Mifflin-St Jeor: 10·kg + 6.25·cm − 5·age, then +5 for men or −161 for women
pub fn basal_metabolic_rate(gender: Gender, age: u32, weight_kg: f64, height_cm: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// BMI rounded to one decimal
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 10.0).round() / 10.0
}

/// Daily calorie target for a goal
pub fn goal_calories(tdee: u32, goal: Goal) -> u32 {
    let tdee = i64::from(tdee);
    let target = match goal {
        Goal::Maintain => tdee,
        Goal::Lose => (tdee - 500).max(MIN_DAILY_CALORIES),
        Goal::Lose10 => ((tdee as f64 * 0.9).round() as i64).max(MIN_DAILY_CALORIES),
        Goal::Gain => tdee + 500,
    };
    target as u32
}

fn goal_options(tdee: u32) -> Vec<GoalOption> {
    let tdee = i64::from(tdee);
    let option = |key: &str, label: &str, calories: i64| GoalOption {
        key: key.to_string(),
        label: label.to_string(),
        calories: calories as u32,
    };

    vec![
        option("maintain", "Maintain Weight", tdee),
        option(
            "lose_moderate",
            "Lose 0.5 kg/week",
            (tdee - 500).max(MIN_DAILY_CALORIES),
        ),
        option(
            "lose_aggressive",
            "Lose 0.75 kg/week",
            (tdee - 750).max(MIN_DAILY_CALORIES),
        ),
        option("gain_lean", "Lean Bulk (+250)", tdee + 250),
        option("gain_moderate", "Gain 0.5 kg/week", tdee + 500),
    ]
}
