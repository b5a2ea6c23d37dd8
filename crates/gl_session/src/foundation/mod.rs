//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types used by the projection setup
//! - Logging utilities

pub mod math;
pub mod logging;
