//! HTTP adapter for the remote task service.

mod client;
mod models;

pub use client::HttpRemoteTaskClient;
