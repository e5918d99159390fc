//! Book recommendation service.
//!
//! Turns a learning topic into a short list of real books, each with a
//! long-form analysis, by orchestrating calls to a text-generation backend.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
