// src/mc/mod.rs
pub mod engine;
pub mod paths;
