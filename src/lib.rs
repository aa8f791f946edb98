//! Savings Engine library crate.
//!
//! This crate compares what a company currently spends on SaaS tools
//! with the cost of consolidating onto a single per-seat platform.
//! External applications may depend on the `savings_engine` crate and
//! call into `engine::calculate` directly or embed the API via
//! `api::build_router`.

pub mod models;
pub mod error;
pub mod rules;
pub mod catalog;
pub mod engine;
pub mod snapshot;
pub mod config;
pub mod logging;
pub mod api;
