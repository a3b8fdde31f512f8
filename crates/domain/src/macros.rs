//! Macro for implementing Display and FromStr for attribute enums
//!
//! Generates a single implementation of both traits so wire spellings stay in
//! one place. Parsing is case-insensitive; display uses the exact spelling.
//!
//! # Example
//!
//! ```rust
//! use cinelog_domain::impl_attribute_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Priority {
//!     Low,
//!     High,
//! }
//!
//! impl_attribute_conversions!(Priority {
//!     Low => "Low",
//!     High => "High",
//! });
//!
//! assert_eq!(Priority::High.to_string(), "High");
//! assert_eq!("low".parse::<Priority>(), Ok(Priority::Low));
//! ```

/// Implements Display and FromStr traits for attribute enums
#[macro_export]
macro_rules! impl_attribute_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
