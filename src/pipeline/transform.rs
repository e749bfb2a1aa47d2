// src/pipeline/transform.rs

//! Flattening of gathered schools into the lookup format.

use std::path::Path;

use crate::error::Result;
use crate::models::{
    Classification, Course, CurriculumTree, FlatCurriculum, FlatMajor, FlatYear, FlattenedOutput,
    School,
};
use crate::storage::{CatalogStorage, LocalStorage};

/// Flatten a school into majors with "CODE NAME" course lists.
///
/// Majors without a single course are dropped, as are classifications
/// whose fall and spring terms are both empty.
pub fn flatten(school: &School) -> FlattenedOutput {
    let majors = school
        .majors()
        .filter_map(|(_, major)| {
            flatten_curriculum(&major.curriculum).map(|curriculum| FlatMajor {
                name: major.name.clone(),
                curriculum,
            })
        })
        .collect();

    FlattenedOutput {
        school_name: school.school_name.clone(),
        majors,
    }
}

fn flatten_curriculum(tree: &CurriculumTree) -> Option<FlatCurriculum> {
    let mut flat = FlatCurriculum::default();

    for classification in Classification::ALL {
        let year = tree.year(classification);
        if year.is_empty() {
            continue;
        }
        flat.set_year(
            classification,
            FlatYear {
                fall: labels(&year.fall),
                spring: labels(&year.spring),
            },
        );
    }

    (!flat.is_empty()).then_some(flat)
}

fn labels(courses: &[Course]) -> Vec<String> {
    courses.iter().map(Course::label).collect()
}

/// Read an intermediate file, flatten every school in it and write the result.
pub async fn transform_file(input: &Path, output: &Path) -> Result<Vec<FlattenedOutput>> {
    let storage = LocalStorage::default();
    let input_key = input.to_string_lossy();
    let output_key = output.to_string_lossy();

    let schools = storage.load_schools(&input_key).await?;
    log::info!("Transforming {} school(s) from {}", schools.len(), input.display());

    let outputs: Vec<FlattenedOutput> = schools.iter().map(flatten).collect();
    for flattened in &outputs {
        log::info!(
            "{}: kept {} majors with curriculum data",
            flattened.school_name,
            flattened.majors.len()
        );
    }

    storage.save_flattened(&output_key, &outputs).await?;
    Ok(outputs)
}
