pub mod assertions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use assertions::SnapshotAssertion;
#[allow(unused_imports)]
pub use setup::{connection, TestSetup, TestSetupBuilder};
