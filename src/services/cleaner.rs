// src/services/cleaner.rs

//! Curriculum page cleaning.
//!
//! Strips navigational boilerplate from a major's page and gathers the text
//! most likely to hold course listings ahead of the page's full text.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::models::CleaningConfig;

const PREREQUISITE_PATTERN: &str = r"(?i)prerequisite.*?:|pre-req.*?:|pre:";

/// Text extracted from a curriculum page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedPage {
    pub main_content: String,
    pub prerequisites: Vec<String>,
}

/// Extracts course-bearing text from curriculum pages.
#[derive(Debug, Clone)]
pub struct ContentCleaner {
    stripped: Vec<Selector>,
    list_keywords: Vec<String>,
    class_keywords: Vec<String>,
    prerequisite: Option<Regex>,
}

impl ContentCleaner {
    pub fn new(config: &CleaningConfig) -> Self {
        let stripped = config
            .stripped_tags
            .iter()
            .filter_map(|tag| match Selector::parse(tag) {
                Ok(selector) => Some(selector),
                Err(e) => {
                    log::warn!("Ignoring invalid stripped tag {tag:?}: {e}");
                    None
                }
            })
            .collect();

        Self {
            stripped,
            list_keywords: config.list_keywords.iter().map(|k| k.to_lowercase()).collect(),
            class_keywords: config
                .section_class_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            prerequisite: Regex::new(PREREQUISITE_PATTERN).ok(),
        }
    }

    /// Clean a page body into searchable text plus prerequisite mentions.
    pub fn clean(&self, html: &str) -> CleanedPage {
        let mut document = Html::parse_document(html);
        self.strip_boilerplate(&mut document);

        let root = document.root_element();
        let mut sections: Vec<String> = Vec::new();

        if let Ok(tables) = Selector::parse("table") {
            sections.extend(root.select(&tables).map(spaced_text));
        }

        if let Ok(lists) = Selector::parse("ul, ol") {
            for list in root.select(&lists) {
                let text = list.text().collect::<String>().to_lowercase();
                if self.list_keywords.iter().any(|k| text.contains(k.as_str())) {
                    sections.push(spaced_text(list));
                }
            }
        }

        sections.extend(
            root.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| self.has_section_class(el))
                .map(spaced_text),
        );

        sections.push(root.text().collect::<Vec<_>>().join("\n"));

        let main_content = sections
            .iter()
            .flat_map(|section| section.lines())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let prerequisites = self
            .prerequisite
            .as_ref()
            .map(|re| {
                re.find_iter(&main_content)
                    .map(|m| m.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default();

        CleanedPage {
            main_content,
            prerequisites,
        }
    }

    fn strip_boilerplate(&self, document: &mut Html) {
        let root = document.root_element();
        let ids: Vec<_> = self
            .stripped
            .iter()
            .flat_map(|selector| root.select(selector).map(|el| el.id()))
            .collect();

        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn has_section_class(&self, element: &ElementRef<'_>) -> bool {
        element.value().classes().any(|class| {
            let class = class.to_lowercase();
            self.class_keywords.iter().any(|k| class.contains(k.as_str()))
        })
    }
}

/// Non-blank text nodes of an element, trimmed and joined with spaces.
fn spaced_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaner() -> ContentCleaner {
        ContentCleaner::new(&CleaningConfig::default())
    }

    const PAGE: &str = r#"
        <html>
          <head><style>.x { color: red; }</style><script>var tracking = 1;</script></head>
          <body>
            <header>University Banner</header>
            <nav><ul><li>Course Search Menu</li></ul></nav>
            <h1>Chemistry, B.S.</h1>
            <table>
              <tr><td>CHE 101</td><td>General Chemistry</td><td>4</td></tr>
              <tr><td>MAT 140</td><td>Calculus I</td><td>4</td></tr>
            </table>
            <ul><li>Total credit hours: 120</li></ul>
            <ul><li>Campus map</li></ul>
            <div class="courseblock">Prerequisite: CHE 101</div>
            <footer>Copyright Footer</footer>
          </body>
        </html>
    "#;

    #[test]
    fn test_boilerplate_text_is_removed() {
        let page = cleaner().clean(PAGE);

        for banned in [
            "University Banner",
            "Course Search Menu",
            "Copyright Footer",
            "tracking",
            "color: red",
        ] {
            assert!(
                !page.main_content.contains(banned),
                "{banned} leaked into cleaned text"
            );
        }
    }

    #[test]
    fn test_sections_precede_full_text() {
        let page = cleaner().clean(PAGE);
        let lines: Vec<_> = page.main_content.lines().collect();

        assert_eq!(lines[0], "CHE 101 General Chemistry 4 MAT 140 Calculus I 4");
        assert_eq!(lines[1], "Total credit hours: 120");
        assert_eq!(lines[2], "Prerequisite: CHE 101");
        assert_eq!(lines[3], "Chemistry, B.S.");
    }

    #[test]
    fn test_irrelevant_lists_only_in_full_text() {
        let page = cleaner().clean(PAGE);
        let occurrences = page.main_content.matches("Campus map").count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn test_no_blank_or_padded_lines() {
        let page = cleaner().clean(PAGE);
        assert!(page
            .main_content
            .lines()
            .all(|line| !line.is_empty() && line.trim() == line));
    }

    #[test]
    fn test_prerequisites_extracted() {
        let html = r#"<html><body>
            <p>PREREQUISITES: none</p>
            <p>Pre-req for lab: MAT 140</p>
            <p>Pre: CHE 101</p>
        </body></html>"#;
        let page = cleaner().clean(html);

        assert_eq!(
            page.prerequisites,
            vec!["PREREQUISITES:", "Pre-req for lab:", "Pre:"]
        );
    }

    #[test]
    fn test_empty_page() {
        let page = cleaner().clean("");
        assert!(page.main_content.is_empty());
        assert!(page.prerequisites.is_empty());
    }
}
