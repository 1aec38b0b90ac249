// src/services/mod.rs
pub mod chart;
pub mod compare;
pub mod error;
pub mod provider;
pub mod returns;
pub mod tradier;
