// src/lib.rs

pub mod config;
pub mod core;
pub mod csv_io;
pub mod error;
pub mod fallback;
pub mod merger;
pub mod persistence;
pub use crate::core::pipeline::{run, IpaPipeline, PipelineOutput, RunReport, RunSummary};
