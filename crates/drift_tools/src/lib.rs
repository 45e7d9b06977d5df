//! # Drift Development Tools
//!
//! Command-line tools for development:
//! - Motion profile data validators

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod validate;
