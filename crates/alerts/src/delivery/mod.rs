//! External delivery channels for fire alerts.

pub mod sms;
