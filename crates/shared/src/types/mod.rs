//! Shared value types.

pub mod currency;

pub use currency::Currency;
