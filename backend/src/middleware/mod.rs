//! Middleware for the Restaurant Inventory Management Platform

pub mod actor;

pub use actor::{actor_middleware, CurrentActor};
