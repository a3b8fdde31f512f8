//! Navigation gating based on the credentials in the cookie jar.

pub mod gate;
