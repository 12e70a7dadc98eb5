//! Firewatch alert delivery channels.
//!
//! - [`delivery::sms`] -- SMS alerts through the Twilio Messages API,
//!   implementing [`firewatch_core::Notifier`].

pub mod delivery;

pub use delivery::sms::{SmsConfig, SmsConfigError, SmsNotifier};
