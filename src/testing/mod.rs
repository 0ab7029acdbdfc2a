//! Testing utilities and mock implementations
//!
//! Lets the loader and tool system be exercised without a PostgreSQL server.

pub mod mocks;

pub use mocks::*;
