//! Analysis and result aggregation modules
//!
//! - Result types
//! - Atonality scoring

pub mod atonality;
pub mod result;

pub use atonality::{score_atonality, AtonalityReport};
