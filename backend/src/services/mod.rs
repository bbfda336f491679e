//! Business logic services for the GroupBuy Retail Platform

pub mod auth;
pub mod offer;
pub mod order;
pub mod payment;
pub mod product;
pub mod retailer;
pub mod supplier;
pub mod zone;

pub use auth::AuthService;
pub use offer::OfferService;
pub use order::OrderService;
pub use payment::PaymentService;
pub use product::ProductService;
pub use retailer::RetailerService;
pub use supplier::SupplierService;
pub use zone::ZoneService;
