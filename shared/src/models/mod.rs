//! Domain models for the GroupBuy Retail Platform

pub mod offer;
pub mod order;
pub mod payment;
pub mod product;
pub mod retailer;
pub mod supplier;
pub mod zone;

pub use offer::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use retailer::*;
pub use supplier::*;
pub use zone::*;
