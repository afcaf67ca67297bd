//! Unit tests for lead synchronisation.

mod locator_tests;
mod support;
