//! symtrack: personal symptom log with dashboard, trend and cycle-day views

pub mod cli;
pub mod config;
pub mod services;
pub mod types;
