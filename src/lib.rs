//! Payroll liquidation and contract settlement engine for Colombian labor law
//!
//! This crate runs payroll periods through their lifecycle (open, liquidated,
//! approved, closed), liquidates every active employee from their contract and
//! novedades, and computes termination settlements (cesantías, intereses,
//! prima, vacaciones, indemnización) with a versioned breakdown and an
//! approval workflow.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
