// src/models/school.rs

//! School, College, and Major data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::CurriculumTree;

/// A gathered school catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    /// Display name supplied for the run
    pub school_name: String,

    /// Colleges discovered on the catalog root
    #[serde(default)]
    pub colleges: Vec<College>,

    /// Counters collected during the crawl
    #[serde(default)]
    pub processing_stats: ProcessingStats,
}

impl School {
    pub fn new(school_name: impl Into<String>) -> Self {
        Self {
            school_name: school_name.into(),
            colleges: Vec::new(),
            processing_stats: ProcessingStats::default(),
        }
    }

    /// Count total majors across colleges.
    pub fn major_count(&self) -> usize {
        self.colleges.iter().map(|c| c.majors.len()).sum()
    }

    /// Iterate every major with the college it belongs to.
    pub fn majors(&self) -> impl Iterator<Item = (&College, &Major)> {
        self.colleges
            .iter()
            .flat_map(|college| college.majors.iter().map(move |major| (college, major)))
    }
}

/// A college and the majors linked from its page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct College {
    pub name: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub majors: Vec<Major>,
}

/// A major with its structured curriculum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Major {
    /// Display name (anchor text of the major link)
    #[serde(alias = "major_name")]
    pub name: String,

    /// Curriculum page URL
    #[serde(default)]
    pub url: String,

    /// Degree type reported by the model (e.g. "B.S.")
    #[serde(default)]
    pub degree_type: String,

    /// Department reported by the model
    #[serde(default)]
    pub department: String,

    #[serde(default)]
    pub curriculum: CurriculumTree,
}

/// Counters describing one crawl run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingStats {
    /// Majors successfully structured
    pub total_pages_processed: usize,

    /// Visited pages that did not yield a major
    pub skipped_duplicates: usize,

    /// Fetches rejected because the URL was already being fetched
    pub skipped_circular_refs: usize,

    /// Majors whose structuring failed
    pub failed_pages: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// A link picked off a catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Trimmed anchor text
    pub name: String,

    /// Absolute URL
    pub url: String,
}
