// src/models/mod.rs

//! Domain models for the curriculum crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod curriculum;
mod flattened;
mod school;

// Re-export all public types
pub use config::{CleaningConfig, Config, CrawlerConfig, LinkConfig, ModelConfig, OutputConfig};
pub use curriculum::{Classification, Course, CurriculumTree, YearPlan};
pub(crate) use curriculum::null_as_default;
pub use flattened::{FlatCurriculum, FlatMajor, FlatYear, FlattenedOutput};
pub use school::{College, Major, PageLink, ProcessingStats, School};
