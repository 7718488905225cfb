//! Infrastructure layer - External service implementations

pub mod cache;
pub mod logging;
pub mod metrics;
pub mod remote;
pub mod resolution;
pub mod warming;
