// src/models/curriculum.rs

//! Four-year curriculum plan structures.

use serde::{Deserialize, Deserializer, Serialize};

/// Undergraduate year label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

impl Classification {
    /// All classifications in program order.
    pub const ALL: [Classification; 4] = [
        Classification::Freshman,
        Classification::Sophomore,
        Classification::Junior,
        Classification::Senior,
    ];
}

/// A single course entry as returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course code, e.g. "CHE 101"
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,

    /// Course title
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Credit hours, kept as text
    #[serde(default, deserialize_with = "credits_as_text")]
    pub credits: String,
}

impl Course {
    /// Render as "CODE NAME".
    pub fn label(&self) -> String {
        format!("{} {}", self.code, self.name)
    }
}

/// Courses of one classification, split by term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPlan {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fall: Vec<Course>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub spring: Vec<Course>,
}

impl YearPlan {
    pub fn is_empty(&self) -> bool {
        self.fall.is_empty() && self.spring.is_empty()
    }
}

/// Curriculum keyed by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumTree {
    #[serde(default, deserialize_with = "null_as_default")]
    pub freshman: YearPlan,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sophomore: YearPlan,

    #[serde(default, deserialize_with = "null_as_default")]
    pub junior: YearPlan,

    #[serde(default, deserialize_with = "null_as_default")]
    pub senior: YearPlan,
}

impl CurriculumTree {
    /// Plan for a given classification.
    pub fn year(&self, classification: Classification) -> &YearPlan {
        match classification {
            Classification::Freshman => &self.freshman,
            Classification::Sophomore => &self.sophomore,
            Classification::Junior => &self.junior,
            Classification::Senior => &self.senior,
        }
    }

    /// True when no (classification, term) cell holds a course.
    pub fn is_empty(&self) -> bool {
        Classification::ALL.iter().all(|c| self.year(*c).is_empty())
    }

    /// Total number of courses across all cells.
    pub fn course_count(&self) -> usize {
        Classification::ALL
            .iter()
            .map(|c| {
                let year = self.year(*c);
                year.fall.len() + year.spring.len()
            })
            .sum()
    }
}

/// Models sometimes emit credits as a bare number.
fn credits_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read an explicit `null` the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let tree: CurriculumTree =
            serde_json::from_str(r#"{"freshman": {"fall": []}}"#).unwrap();
        assert!(tree.is_empty());
        assert!(tree.senior.spring.is_empty());
    }

    #[test]
    fn test_numeric_credits_become_text() {
        let course: Course =
            serde_json::from_str(r#"{"code": "MAT 140", "name": "Calculus I", "credits": 4}"#)
                .unwrap();
        assert_eq!(course.credits, "4");
    }

    #[test]
    fn test_null_cells_are_empty() {
        let tree: CurriculumTree =
            serde_json::from_str(r#"{"junior": null, "senior": {"fall": null, "spring": []}}"#)
                .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_null_course_fields_are_empty() {
        let course: Course =
            serde_json::from_str(r#"{"code": "CHE 101", "name": null, "credits": null}"#).unwrap();
        assert_eq!(course.code, "CHE 101");
        assert!(course.name.is_empty());
        assert!(course.credits.is_empty());

        let course: Course = serde_json::from_str(r#"{"code": null, "name": "Seminar"}"#).unwrap();
        assert_eq!(course.label(), " Seminar");
    }

    #[test]
    fn test_course_count() {
        let mut tree = CurriculumTree::default();
        tree.junior.spring.push(Course {
            code: "BIO 301".to_string(),
            name: "Genetics".to_string(),
            credits: "3".to_string(),
        });
        assert_eq!(tree.course_count(), 1);
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_classification_serializes_lowercase() {
        let json = serde_json::to_string(&Classification::Sophomore).unwrap();
        assert_eq!(json, "\"sophomore\"");
    }
}
