// src/core/mod.rs

pub mod config_loader;
pub mod dispatcher;
pub mod handler;
pub mod parser;
pub mod registry;
pub mod runner;
pub mod scanner;
