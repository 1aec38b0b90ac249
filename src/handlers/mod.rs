// src/handlers/mod.rs
pub mod compare;
pub mod error;
