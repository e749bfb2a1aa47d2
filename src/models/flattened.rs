// src/models/flattened.rs

//! Simplified school → majors → curriculum-by-term listing.

use serde::{Deserialize, Serialize};

use crate::models::Classification;

/// Flattened lookup output for one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlattenedOutput {
    pub school_name: String,

    #[serde(default)]
    pub majors: Vec<FlatMajor>,
}

/// A major with at least one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMajor {
    pub name: String,
    pub curriculum: FlatCurriculum,
}

/// Non-empty classifications only, in program order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatCurriculum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freshman: Option<FlatYear>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sophomore: Option<FlatYear>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub junior: Option<FlatYear>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senior: Option<FlatYear>,
}

impl FlatCurriculum {
    pub fn year(&self, classification: Classification) -> Option<&FlatYear> {
        match classification {
            Classification::Freshman => self.freshman.as_ref(),
            Classification::Sophomore => self.sophomore.as_ref(),
            Classification::Junior => self.junior.as_ref(),
            Classification::Senior => self.senior.as_ref(),
        }
    }

    pub fn set_year(&mut self, classification: Classification, year: FlatYear) {
        let slot = match classification {
            Classification::Freshman => &mut self.freshman,
            Classification::Sophomore => &mut self.sophomore,
            Classification::Junior => &mut self.junior,
            Classification::Senior => &mut self.senior,
        };
        *slot = Some(year);
    }

    pub fn is_empty(&self) -> bool {
        Classification::ALL.iter().all(|c| self.year(*c).is_none())
    }
}

/// "CODE NAME" strings per term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatYear {
    #[serde(default)]
    pub fall: Vec<String>,

    #[serde(default)]
    pub spring: Vec<String>,
}
