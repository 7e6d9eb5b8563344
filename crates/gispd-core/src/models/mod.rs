//! Data models for payment documents, export rows and configuration.

pub mod config;
pub mod document;
pub mod rows;
