// src/commands/mod.rs
pub mod check;
pub mod common;
pub mod infer;
pub mod instantiate;
pub mod version;
