//! Movie catalog port and list pagination.

pub mod pagination;
pub mod ports;
