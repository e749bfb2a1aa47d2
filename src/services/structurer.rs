// src/services/structurer.rs

//! Curriculum structuring service.
//!
//! Hands cleaned page text to a [`LanguageModel`] and parses the JSON reply
//! into a typed curriculum.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{CurriculumTree, null_as_default};
use crate::services::cleaner::CleanedPage;
use crate::services::model::{ChatRequest, LanguageModel};

const SYSTEM_PROMPT: &str =
    "You are a curriculum parsing assistant specializing in university academic programs.";

/// Model reply for one major.
///
/// Missing keys and explicit nulls both read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredMajor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub college_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub major_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub degree_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub curriculum: CurriculumTree,
}

/// Turns cleaned curriculum text into a [`StructuredMajor`].
pub struct CurriculumStructurer {
    model: Arc<dyn LanguageModel>,
}

impl CurriculumStructurer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Structure a page, or `None` when the model call or parse fails.
    pub async fn structure(
        &self,
        page: &CleanedPage,
        college_name: &str,
        major_name: &str,
    ) -> Option<StructuredMajor> {
        match self.try_structure(page, college_name, major_name).await {
            Ok(major) => Some(major),
            Err(e) => {
                log::warn!("Error in AI parsing for {major_name}: {e}");
                None
            }
        }
    }

    /// Structure a page, surfacing the failure reason.
    pub async fn try_structure(
        &self,
        page: &CleanedPage,
        college_name: &str,
        major_name: &str,
    ) -> Result<StructuredMajor> {
        let request = ChatRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_prompt(&page.main_content, college_name, major_name),
            json_mode: true,
        };

        let reply = self.model.complete(&request).await?;
        parse_reply(&reply)
    }
}

/// Parse a model reply. Only a JSON object is accepted.
pub fn parse_reply(reply: &str) -> Result<StructuredMajor> {
    let value: serde_json::Value = serde_json::from_str(reply.trim())
        .map_err(|e| AppError::model(format!("reply is not JSON: {e}")))?;
    if !value.is_object() {
        return Err(AppError::model("reply is not a JSON object"));
    }
    serde_json::from_value(value).map_err(|e| AppError::model(format!("unexpected reply shape: {e}")))
}

/// User prompt embedding the target schema, parsing rules and page text.
pub fn build_prompt(content: &str, college_name: &str, major_name: &str) -> String {
    format!(
        r#"Parse the following curriculum text for {college_name}, {major_name} into this JSON structure:
{{
    "college_name": "{college_name}",
    "major_name": "{major_name}",
    "degree_type": "",
    "department": "",
    "curriculum": {{
        "freshman": {{
            "fall": [
                {{
                    "code": "course_code",
                    "name": "course_name",
                    "credits": "credit_hours"
                }}
            ],
            "spring": []
        }},
        "sophomore": {{
            "fall": [],
            "spring": []
        }},
        "junior": {{
            "fall": [],
            "spring": []
        }},
        "senior": {{
            "fall": [],
            "spring": []
        }}
    }}
}}

Rules for parsing:
1. Course codes should be in the format "ABC 123" (letters space numbers)
2. Credit hours should be numbers only

Text content to parse:
{content}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    /// Replies with a canned string and remembers the last request.
    struct CannedModel {
        reply: Result<String>,
        last: Mutex<Option<ChatRequest>>,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                last: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(AppError::model("service unavailable")),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, request: &ChatRequest) -> Result<String> {
            *self.last.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(AppError::model(e)),
            }
        }
    }

    fn page() -> CleanedPage {
        CleanedPage {
            main_content: "CHE 101 General Chemistry 4".to_string(),
            prerequisites: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_structure_parses_reply() {
        let model = Arc::new(CannedModel::replying(
            r#"{
                "college_name": "College of Science",
                "major_name": "Chemistry, B.S.",
                "degree_type": "B.S.",
                "department": "Chemistry",
                "curriculum": {
                    "freshman": {
                        "fall": [{"code": "CHE 101", "name": "General Chemistry", "credits": 4}]
                    }
                }
            }"#,
        ));
        let structurer = CurriculumStructurer::new(model.clone());

        let major = structurer
            .structure(&page(), "College of Science", "Chemistry, B.S.")
            .await
            .unwrap();

        assert_eq!(major.degree_type, "B.S.");
        assert_eq!(major.curriculum.freshman.fall[0].label(), "CHE 101 General Chemistry");
        assert_eq!(major.curriculum.freshman.fall[0].credits, "4");
        assert!(major.curriculum.senior.is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_prompts_and_json_mode() {
        let model = Arc::new(CannedModel::replying("{}"));
        let structurer = CurriculumStructurer::new(model.clone());

        structurer
            .structure(&page(), "College of Science", "Chemistry, B.S.")
            .await
            .unwrap();

        let request = model.last.lock().unwrap().clone().unwrap();
        assert!(request.json_mode);
        assert_eq!(request.system, SYSTEM_PROMPT);
        assert!(request.user.contains("for College of Science, Chemistry, B.S."));
        assert!(request.user.ends_with("CHE 101 General Chemistry 4\n"));
    }

    #[tokio::test]
    async fn test_model_error_yields_none() {
        let model = Arc::new(CannedModel::failing());
        let structurer = CurriculumStructurer::new(model.clone());
        assert!(structurer.structure(&page(), "C", "M").await.is_none());
    }

    #[tokio::test]
    async fn test_non_json_reply_yields_none() {
        let model = Arc::new(CannedModel::replying("Sorry, I cannot help with that."));
        let structurer = CurriculumStructurer::new(model.clone());
        assert!(structurer.structure(&page(), "C", "M").await.is_none());
    }

    #[test]
    fn test_parse_reply_rejects_non_objects() {
        assert!(parse_reply("[1, 2, 3]").is_err());
        assert!(parse_reply("\"text\"").is_err());
    }

    #[test]
    fn test_parse_reply_defaults_missing_keys() {
        let major = parse_reply(r#"{"major_name": "Biology"}"#).unwrap();
        assert_eq!(major.major_name, "Biology");
        assert!(major.department.is_empty());
        assert!(major.curriculum.is_empty());
    }

    #[test]
    fn test_parse_reply_null_fields_read_as_empty() {
        let major = parse_reply(
            r#"{
                "college_name": null,
                "major_name": null,
                "degree_type": null,
                "department": null,
                "curriculum": {
                    "freshman": {
                        "fall": [{"code": "CHE 101", "name": "General Chemistry", "credits": "4"}]
                    }
                }
            }"#,
        )
        .unwrap();

        assert!(major.college_name.is_empty());
        assert!(major.major_name.is_empty());
        assert!(major.degree_type.is_empty());
        assert!(major.department.is_empty());
        assert_eq!(
            major.curriculum.freshman.fall[0].label(),
            "CHE 101 General Chemistry"
        );
    }

    #[test]
    fn test_parse_reply_null_curriculum_is_empty() {
        let major = parse_reply(r#"{"major_name": "Biology", "curriculum": null}"#).unwrap();
        assert_eq!(major.major_name, "Biology");
        assert!(major.curriculum.is_empty());
    }

    #[test]
    fn test_parse_reply_null_course_name_kept() {
        let major = parse_reply(
            r#"{"curriculum": {"junior": {"spring": [{"code": "BIO 301", "name": null, "credits": 3}]}}}"#,
        )
        .unwrap();

        let course = &major.curriculum.junior.spring[0];
        assert_eq!(course.code, "BIO 301");
        assert!(course.name.is_empty());
        assert_eq!(course.credits, "3");
    }
}
