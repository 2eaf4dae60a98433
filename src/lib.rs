pub mod catalog;
pub mod cli;
pub mod config;
pub mod logging;
pub mod parallel;
pub mod report;
pub mod resources;
pub mod server;
pub mod settlement;
