pub mod config;
pub mod core;
pub mod domain;
pub mod form;
pub mod identity;
pub mod mapping;
pub mod mediator;
pub mod metrics;
pub mod persistence;
pub mod utils;

pub use mediator::Mediator;
