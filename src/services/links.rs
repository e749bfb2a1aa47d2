// src/services/links.rs

//! Link extraction service.
//!
//! Picks college links off the catalog root and major links off each
//! college page by matching anchor text against keyword lists.

use std::collections::{HashMap, HashSet};

use scraper::{Html, Selector};
use url::Url;

use crate::models::{LinkConfig, PageLink};
use crate::utils::{is_same_domain, resolve_url};

/// Extracts college and major links, remembering names already taken.
#[derive(Debug)]
pub struct LinkExtractor {
    config: LinkConfig,
    seen_colleges: HashSet<String>,
    seen_majors: HashMap<String, HashSet<String>>,
}

impl LinkExtractor {
    /// Create a new link extractor.
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            config: LinkConfig {
                college_keywords: lowercase_all(&config.college_keywords),
                major_keywords: lowercase_all(&config.major_keywords),
                major_exclude_keywords: lowercase_all(&config.major_exclude_keywords),
                dedupe_by_name: config.dedupe_by_name,
            },
            seen_colleges: HashSet::new(),
            seen_majors: HashMap::new(),
        }
    }

    /// College links on the catalog root, in document order.
    pub fn extract_colleges(&mut self, html: &str, page_url: &str, domain: &str) -> Vec<PageLink> {
        let dedupe = self.config.dedupe_by_name;
        let keywords = &self.config.college_keywords;
        let seen = &mut self.seen_colleges;

        collect_links(html, page_url, domain, |text| {
            if dedupe && seen.contains(text) {
                return false;
            }
            let lower = text.to_lowercase();
            if !contains_any(&lower, keywords) {
                return false;
            }
            if dedupe {
                seen.insert(text.to_string());
            }
            true
        })
    }

    /// Major links on a college page, in document order.
    ///
    /// Names are deduplicated per college.
    pub fn extract_majors(
        &mut self,
        html: &str,
        page_url: &str,
        domain: &str,
        college_name: &str,
    ) -> Vec<PageLink> {
        let dedupe = self.config.dedupe_by_name;
        let include = &self.config.major_keywords;
        let exclude = &self.config.major_exclude_keywords;
        let seen = self
            .seen_majors
            .entry(college_name.to_string())
            .or_default();

        collect_links(html, page_url, domain, |text| {
            if dedupe && seen.contains(text) {
                return false;
            }
            let lower = text.to_lowercase();
            if !contains_any(&lower, include) || contains_any(&lower, exclude) {
                return false;
            }
            if dedupe {
                seen.insert(text.to_string());
            }
            true
        })
    }

    /// Major names recorded so far for a college.
    pub fn majors_seen(&self, college_name: &str) -> usize {
        self.seen_majors.get(college_name).map_or(0, HashSet::len)
    }
}

/// Walk anchors with an href, keeping same-domain links whose text passes `accept`.
fn collect_links<F>(html: &str, page_url: &str, domain: &str, mut accept: F) -> Vec<PageLink>
where
    F: FnMut(&str) -> bool,
{
    let Ok(base) = Url::parse(page_url) else {
        log::warn!("Cannot resolve links against invalid URL: {page_url}");
        return Vec::new();
    };
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let text = anchor.text().collect::<String>().trim().to_string();
        if text.is_empty() {
            continue;
        }

        let url = resolve_url(&base, href);
        if !is_same_domain(domain, &url) {
            continue;
        }

        if accept(&text) {
            links.push(PageLink { name: text, url });
        }
    }

    links
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}
