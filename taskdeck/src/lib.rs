//! Local personal task tracker library.

pub mod commands;
pub mod config;
pub mod persist;
pub mod tasks;
