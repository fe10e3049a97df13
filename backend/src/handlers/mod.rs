//! HTTP request handlers

pub mod catalog;
pub mod counts;
pub mod dashboard;
pub mod health;
pub mod production;
pub mod recipes;
pub mod stock;

pub use catalog::*;
pub use counts::*;
pub use dashboard::*;
pub use health::*;
pub use production::*;
pub use recipes::*;
pub use stock::*;
