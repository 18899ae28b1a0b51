// Library module for hashsweep
// Re-exports modules for use in integration tests and the binary

pub mod config;
pub mod hash;
