//! Presentation layer for the cupcake sales reporter.
//!
//! Provides themes, the per-period revenue table and bar chart, the tabbed
//! [`ratatui`] application and a plain-text report writer.

pub mod app;
pub mod chart_view;
pub mod table_view;
pub mod text_report;
pub mod themes;

pub use sales_core as core;
