//! Step definitions for lead synchronisation scenarios.

mod given;
mod then;
mod when;
pub mod world;
