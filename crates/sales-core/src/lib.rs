//! Core types for the cupcake sales reporter.
//!
//! Holds the sales record model and category price table, calendar period
//! math, number formatting, the shared error type and command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
