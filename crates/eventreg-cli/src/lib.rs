//! Library half of the `eventreg` binary: configuration, tracing setup and
//! the command implementations.

pub mod cli;
pub mod commands;
pub mod config;
pub mod observability;
pub mod output;
