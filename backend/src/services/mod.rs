//! Business logic services
//!
//! Each service owns one slice of the domain and goes through the ledger for
//! every stock mutation.

pub mod catalog;
pub mod counts;
pub mod ledger;
pub mod production;
pub mod recipe;
pub mod reporting;
