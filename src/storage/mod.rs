//! Storage for gathered and flattened school files.
//!
//! ## Directory Structure
//!
//! ```text
//! data/output/
//! ├── bethune-cookman_university.json               # School tree from `gather`
//! └── bethune-cookman_university_transformed.json   # FlattenedOutput from `transform`
//! ```
//!
//! Dataset files may hold a single school object or an array of them.

pub mod local;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{FlattenedOutput, School};
use crate::utils::file_stem;

// Re-export for convenience
pub use local::LocalStorage;

/// File name of the intermediate file for a school.
pub fn school_file_name(school_name: &str) -> String {
    format!("{}.json", file_stem(school_name))
}

/// Default flattened output path: `<stem>_transformed.json` next to the input.
pub fn transformed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_transformed.json"))
}

/// A dataset holding either one record or a sequence of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Records that can be looked up by school name.
pub trait NamedSchool {
    fn school_name(&self) -> &str;

    /// Names of the majors this record lists.
    fn major_names(&self) -> Vec<&str>;
}

impl NamedSchool for School {
    fn school_name(&self) -> &str {
        &self.school_name
    }

    fn major_names(&self) -> Vec<&str> {
        self.majors().map(|(_, major)| major.name.as_str()).collect()
    }
}

impl NamedSchool for FlattenedOutput {
    fn school_name(&self) -> &str {
        &self.school_name
    }

    fn major_names(&self) -> Vec<&str> {
        self.majors.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Find a school by case-insensitive exact name.
pub fn find_school<'a, T: NamedSchool>(schools: &'a [T], name: &str) -> Option<&'a T> {
    let wanted = name.trim().to_lowercase();
    schools
        .iter()
        .find(|s| s.school_name().to_lowercase() == wanted)
}

/// A loaded dataset, either gathered school trees or flattened listings.
#[derive(Debug, Clone)]
pub enum Dataset {
    Schools(Vec<School>),
    Flattened(Vec<FlattenedOutput>),
}

impl Dataset {
    /// Sort raw records by shape: gathered trees carry a `colleges` key.
    pub fn from_records(records: Vec<serde_json::Value>) -> Result<Self> {
        let gathered = records.iter().any(|r| r.get("colleges").is_some());
        let array = serde_json::Value::Array(records);
        if gathered {
            Ok(Dataset::Schools(serde_json::from_value(array)?))
        } else {
            Ok(Dataset::Flattened(serde_json::from_value(array)?))
        }
    }

    /// Name and major names of the school matching `name`, ignoring case.
    pub fn find_majors(&self, name: &str) -> Option<(String, Vec<String>)> {
        fn owned<T: NamedSchool>(school: &T) -> (String, Vec<String>) {
            (
                school.school_name().to_string(),
                school.major_names().into_iter().map(str::to_string).collect(),
            )
        }

        match self {
            Dataset::Schools(schools) => find_school(schools, name).map(owned),
            Dataset::Flattened(outputs) => find_school(outputs, name).map(owned),
        }
    }
}

/// Trait for school file backends.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Write a gathered school under its derived file name.
    async fn save_school(&self, school: &School) -> Result<PathBuf>;

    /// Load a school dataset.
    async fn load_schools(&self, key: &str) -> Result<Vec<School>>;

    /// Write flattened output under `key`.
    async fn save_flattened(&self, key: &str, outputs: &[FlattenedOutput]) -> Result<PathBuf>;

    /// Load a flattened dataset.
    async fn load_flattened(&self, key: &str) -> Result<Vec<FlattenedOutput>>;
}
