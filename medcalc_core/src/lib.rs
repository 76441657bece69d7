#![forbid(unsafe_code)]

//! Core calculation logic for the medical self-service calculators.
//!
//! This crate provides:
//! - Calorie needs (Mifflin-St Jeor BMR, TDEE, BMI, macros)
//! - Ovulation date and fertile window
//! - Pregnancy due date (Naegele's rule)
//! - Request dispatch keyed by calculator type
//! - Configuration, result rendering and CSV batches

pub mod types;
pub mod error;
pub mod limits;
pub mod clock;
pub mod config;
pub mod logging;
pub mod calories;
pub mod ovulation;
pub mod pregnancy;
pub mod dispatch;
pub mod report;
pub mod batch;

// Re-export commonly used types
pub use error::{Error, Result, ValidationError};
pub use types::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, OutputMode};
pub use dispatch::{dispatch, CalculationRequest, CalculationResponse, CalculationResult};
