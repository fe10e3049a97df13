//! Domain models for the Restaurant Inventory Management Platform

pub mod alerts;
pub mod counts;
pub mod product;
pub mod production;
pub mod recipe;
pub mod reporting;
pub mod station;
pub mod stock;

pub use alerts::*;
pub use counts::*;
pub use product::*;
pub use production::*;
pub use recipe::*;
pub use reporting::*;
pub use station::*;
pub use stock::*;
