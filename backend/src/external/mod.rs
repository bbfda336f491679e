//! External service clients

pub mod sms;

pub use sms::SmsClient;
