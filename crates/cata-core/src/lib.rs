//! Core types and operations for recording and reviewing wine tastings.
//!
//! The crate holds the whole data model of a tasting session: the logged-in
//! identity, the append-only list of tasting records, the draft form a
//! taster fills out, and the filter and CSV export an admin runs over the
//! records. It has no terminal or network dependencies; `cata-cli` is the
//! view layer on top of it.

pub mod browser;
pub mod error;
pub mod export;
pub mod form;
pub mod model;
pub mod session;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
