// src/lib.rs

//! Curriculum Crawler Library
//!
//! Walks a university's academic catalog, structures each major's
//! curriculum with a language model, and flattens the result into a
//! per-school lookup file.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
