//! Documentation about this crate and dependency injection in general.
//!
//! - [Getting started](getting_started): a walkthrough of declaring,
//!   binding, and resolving services.

pub mod getting_started;
