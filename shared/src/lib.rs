//! Shared types and domain logic for the GroupBuy Retail Platform
//!
//! This crate contains the models, slab-pricing engine, and validation rules
//! shared between the backend and other components of the system.

pub mod models;
pub mod pricing;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
