//! Utility functions for rule implementations.

pub mod allowance;
pub mod naming;

#[doc(inline)]
pub use allowance::{AllowCheck, Allowances};
