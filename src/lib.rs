//! pitchdeck: a password-gated annual plan proposal dashboard with a volume
//! pricing calculator and a usage aggregator.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod data;
pub mod gate;
pub mod pricing;
pub mod sections;
pub mod usage;
pub mod utils;
pub mod web;
