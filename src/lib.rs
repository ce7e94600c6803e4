// src/lib.rs
//! Command-line driver: loads declaration manifests into a parametric type
//! system and runs instantiation or inference over them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod manifest;
