//! HTTP request handlers
//!
//! Handlers are thin: extract, delegate to a service, wrap the result.

pub mod admin;
pub mod auth;
pub mod health;
pub mod offer;
pub mod order;
pub mod payment;
pub mod product;
pub mod retailer;
pub mod supplier;
pub mod zone;
