//! Data layer for the cupcake sales reporter.
//!
//! Reads point-of-sale exports, parses their sections into daily records,
//! keeps the current session's records, groups them into weekly, monthly
//! and yearly revenue buckets and shapes the buckets for presentation.

pub mod aggregator;
pub mod parser;
pub mod reader;
pub mod report;
pub mod session;

pub use sales_core as core;
