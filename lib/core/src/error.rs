//! Error handling foundation for hookflow.
//!
//! Only the `Result` alias lives here. Each crate owns its domain error
//! enums and returns them wrapped in a rootcause [`Report`], so callers can
//! layer their own context on top as the error travels outward.

use rootcause::Report;

/// Result alias whose error side is a rootcause [`Report`] over context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
