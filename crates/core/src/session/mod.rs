//! Session state owned by the caller: credential storage and notifications.

pub mod credentials;
pub mod ports;
