//! Adapter implementations for the lead sync ports.

pub mod file;
pub mod http;
pub mod memory;
