// src/services/mod.rs

pub mod bank;
pub mod controller;
pub mod error;
pub mod explainer;
pub mod sessions;
