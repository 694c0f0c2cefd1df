//! End-to-End Integration Tests
//!
//! These tests bind complete metadata documents from `fixtures/` and run
//! attribute reconciliation against the services they describe.

mod common;
mod reconcile;
mod sp_metadata;
