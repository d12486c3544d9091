//! Server core functionality
//!
//! This module contains the HTTP listener, the route table and the
//! startup sequence.

pub mod core;

pub use self::core::{Server, build_router};
