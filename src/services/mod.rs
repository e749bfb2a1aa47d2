//! Service layer for the curriculum crawler.
//!
//! This module contains the business logic for:
//! - Page retrieval with domain, dedup and cycle guards (`PageFetcher`)
//! - College and major link discovery (`LinkExtractor`)
//! - Curriculum page text extraction (`ContentCleaner`)
//! - Model-backed curriculum structuring (`CurriculumStructurer`)

pub mod cleaner;
pub mod fetcher;
pub mod links;
pub mod model;
pub mod structurer;

pub use cleaner::{CleanedPage, ContentCleaner};
pub use fetcher::{FetchRejection, PageFetcher, PathGuard, PathStack, RejectionCounts};
pub use links::LinkExtractor;
pub use model::{ChatRequest, LanguageModel, OpenAiClient};
pub use structurer::{CurriculumStructurer, StructuredMajor};
