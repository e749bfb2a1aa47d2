// src/pipeline/gather.rs

//! School gathering pipeline.
//!
//! Walks catalog root → college pages → major pages one request at a time,
//! accumulating the School tree and its processing statistics.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{College, Config, LinkConfig, Major, PageLink, ProcessingStats, School};
use crate::services::{
    ContentCleaner, CurriculumStructurer, LanguageModel, LinkExtractor, PageFetcher,
};
use crate::storage::CatalogStorage;
use crate::utils::http::create_async_client;

/// Crawl state for one school: visited URLs, the active path and name dedup.
struct CrawlRun {
    fetcher: PageFetcher,
    links: LinkExtractor,
    stats: ProcessingStats,
}

/// Walks a school's catalog and structures every major found.
pub struct CatalogWalker {
    client: Client,
    link_config: LinkConfig,
    cleaner: ContentCleaner,
    structurer: CurriculumStructurer,
    request_delay: Duration,
}

impl CatalogWalker {
    pub fn new(config: &Config, client: Client, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            client,
            link_config: config.links.clone(),
            cleaner: ContentCleaner::new(&config.cleaning),
            structurer: CurriculumStructurer::new(model),
            request_delay: Duration::from_millis(config.crawler.request_delay_ms),
        }
    }

    /// Gather a whole school starting from its catalog root.
    ///
    /// Fails only when the root page cannot be fetched.
    pub async fn process_school(&self, school_name: &str, base_url: &str) -> Result<School> {
        let mut run = CrawlRun {
            fetcher: PageFetcher::new(self.client.clone(), base_url)?,
            links: LinkExtractor::new(&self.link_config),
            stats: ProcessingStats {
                started_at: Some(Utc::now()),
                ..ProcessingStats::default()
            },
        };

        let Some(main_page) = run.fetcher.fetch(base_url).await else {
            return Err(AppError::SeedUnreachable {
                url: base_url.to_string(),
            });
        };

        let domain = run.fetcher.domain().to_string();
        let college_links = run.links.extract_colleges(&main_page, base_url, &domain);
        log::info!("Found {} colleges at {}", college_links.len(), base_url);

        let mut school = School::new(school_name);
        for link in college_links {
            let college = self.process_college(&mut run, &domain, link).await;
            school.colleges.push(college);
            self.pause().await;
        }

        let rejections = run.fetcher.rejections();
        run.stats.skipped_duplicates = run
            .fetcher
            .visited_count()
            .saturating_sub(run.stats.total_pages_processed);
        run.stats.skipped_circular_refs = rejections.circular;
        run.stats.finished_at = Some(Utc::now());

        log::info!(
            "Finished {}: {} majors processed, {} failed, {} pages visited",
            school_name,
            run.stats.total_pages_processed,
            run.stats.failed_pages,
            run.fetcher.visited_count()
        );
        log::debug!(
            "Rejections: {} off-domain, {} duplicate, {} circular, {} transport",
            rejections.off_domain,
            rejections.duplicates,
            rejections.circular,
            rejections.transport
        );

        school.processing_stats = run.stats;
        Ok(school)
    }

    async fn process_college(&self, run: &mut CrawlRun, domain: &str, link: PageLink) -> College {
        log::info!("Processing college: {}", link.name);

        let mut college = College {
            name: link.name,
            url: link.url,
            majors: Vec::new(),
        };

        let Some(page) = run.fetcher.fetch(&college.url).await else {
            return college;
        };

        let major_links = run
            .links
            .extract_majors(&page, &college.url, domain, &college.name);
        log::debug!("{}: {} major links", college.name, major_links.len());

        for link in major_links {
            if let Some(major) = self.process_major(run, &college.name, link).await {
                college.majors.push(major);
            }
            self.pause().await;
        }

        college
    }

    async fn process_major(
        &self,
        run: &mut CrawlRun,
        college_name: &str,
        link: PageLink,
    ) -> Option<Major> {
        log::info!("Processing major: {}", link.name);

        let body = run.fetcher.fetch(&link.url).await?;
        let page = self.cleaner.clean(&body);

        match self.structurer.structure(&page, college_name, &link.name).await {
            Some(structured) => {
                run.stats.total_pages_processed += 1;
                log::debug!(
                    "{}: structured {} courses",
                    link.name,
                    structured.curriculum.course_count()
                );
                Some(Major {
                    name: link.name,
                    url: link.url,
                    degree_type: structured.degree_type,
                    department: structured.department,
                    curriculum: structured.curriculum,
                })
            }
            None => {
                run.stats.failed_pages += 1;
                None
            }
        }
    }

    async fn pause(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}

/// Gather a school and write its intermediate file.
pub async fn run_gather(
    config: &Config,
    model: Arc<dyn LanguageModel>,
    storage: &dyn CatalogStorage,
    school_name: &str,
    base_url: &str,
) -> Result<(School, PathBuf)> {
    log::info!("Starting curriculum data collection for {school_name}");

    let client = create_async_client(&config.crawler)?;
    let walker = CatalogWalker::new(config, client, model);
    let school = walker.process_school(school_name, base_url).await?;

    let path = storage.save_school(&school).await?;

    let stats = &school.processing_stats;
    log::info!("Total Pages Processed: {}", stats.total_pages_processed);
    log::info!("Skipped Duplicates: {}", stats.skipped_duplicates);
    log::info!("Skipped Circular References: {}", stats.skipped_circular_refs);
    log::info!("Failed Pages: {}", stats.failed_pages);

    Ok((school, path))
}
