//! Storage helpers for the service layer
//!
//! The user directory keeps nothing on disk; this module only reads the
//! static seed dataset once at startup.

pub mod seed;
