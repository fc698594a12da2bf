// Library exports for battlelog
// This allows the test suite and the bench harness to import modules

pub mod cli;
pub mod colorize;
pub mod config;
pub mod data;
pub mod log;
pub mod markup;
pub mod script;
pub mod session;
