use crate::analyzer::PageAnalyzer;
use crate::constants::{
    CHECK_TIMEOUT_SECS, DEFAULT_PAGES, MANIFEST_PATH, OG_IMAGE_PATH, PAGE_TIMEOUT_SECS,
    ROBOTS_TXT_PATH, SITEMAP_PATH,
};
use crate::http_client::{FetchResponse, PageFetcher};
use crate::models::{PageAnalysis, SiteValidation};
use crate::robots::RobotsRules;
use crate::site_checks;
use anyhow::{Context, Result, anyhow};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use url::Url;

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub site_url: String,
    pub pages: Vec<String>,
    pub page_timeout: Duration,
    pub check_timeout: Duration,
    pub og_image_path: String,
    pub manifest_path: String,
}

impl CrawlerConfig {
    pub fn new(site_url: &str) -> Self {
        Self {
            site_url: site_url.to_string(),
            pages: DEFAULT_PAGES.iter().map(|p| p.to_string()).collect(),
            page_timeout: Duration::from_secs(PAGE_TIMEOUT_SECS),
            check_timeout: Duration::from_secs(CHECK_TIMEOUT_SECS),
            og_image_path: OG_IMAGE_PATH.to_string(),
            manifest_path: MANIFEST_PATH.to_string(),
        }
    }
}

/// Fetches the configured pages and site resources in one concurrent batch.
pub struct SiteCrawler<F> {
    fetcher: F,
    origin: String,
    config: CrawlerConfig,
    progress_bar: Option<ProgressBar>,
}

impl<F: PageFetcher> SiteCrawler<F> {
    pub fn new(fetcher: F, config: CrawlerConfig) -> Result<Self> {
        let site_url = Url::parse(&config.site_url).context("Invalid URL")?;

        // Validate URL scheme - only allow http and https
        match site_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(anyhow!(
                    "Invalid URL scheme '{}': only http and https are supported",
                    scheme
                ));
            }
        }

        Ok(Self {
            fetcher,
            origin: site_url.origin().ascii_serialization(),
            config,
            progress_bar: None,
        })
    }

    /// Enable progress bar for crawling
    pub fn enable_progress_bar(&mut self) {
        let pb = ProgressBar::new(self.config.pages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} pages")
                .expect("Progress bar template should be valid"),
        );
        self.progress_bar = Some(pb);
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Crawls every configured page and runs the site-level checks.
    ///
    /// Never fails: each fetch degrades on its own, so the page list always
    /// has one record per configured path, in configured order.
    pub async fn crawl_site(&self) -> (Vec<PageAnalysis>, SiteValidation) {
        tracing::info!(
            origin = %self.origin,
            pages = self.config.pages.len(),
            "Starting site crawl"
        );

        let page_batch = join_all(self.config.pages.iter().map(|path| self.crawl_page(path)));

        let (pages, (robots_txt_valid, robots_blocked_pages), sitemap, og_image_exists, manifest_exists) = tokio::join!(
            page_batch,
            self.check_robots_txt(),
            self.check_sitemap(),
            self.resource_exists(&self.config.og_image_path),
            self.resource_exists(&self.config.manifest_path),
        );
        let (sitemap_page_count, sitemap_missing_pages) = sitemap;

        if let Some(ref pb) = self.progress_bar {
            pb.finish_with_message(format!("Crawled {} pages", pages.len()));
        }

        let validation = SiteValidation {
            robots_txt_valid,
            sitemap_page_count,
            sitemap_missing_pages,
            robots_blocked_pages,
            og_image_exists,
            manifest_exists,
        };

        (pages, validation)
    }

    async fn crawl_page(&self, path: &str) -> PageAnalysis {
        let url = self.absolute(path);

        let analysis = match self.fetch(&url, self.config.page_timeout).await {
            Ok(response) => PageAnalyzer::analyze(
                &response.body,
                path,
                &url,
                response.status,
                response.elapsed_ms,
            ),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to fetch page");
                PageAnalyzer::unreachable(path, &url)
            }
        };

        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }

        analysis
    }

    /// Returns robots validity and the configured paths it blocks.
    async fn check_robots_txt(&self) -> (bool, Vec<String>) {
        let url = self.absolute(ROBOTS_TXT_PATH);
        let response = match self.fetch(&url, self.config.check_timeout).await {
            Ok(response) if response.is_success() => response,
            Ok(response) => {
                tracing::info!(url = %url, status = response.status, "robots.txt not served");
                return (false, Vec::new());
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to fetch robots.txt");
                return (false, Vec::new());
            }
        };

        let rules = RobotsRules::parse(&response.body);
        for sitemap in rules.sitemaps() {
            tracing::debug!(sitemap = %sitemap, "robots.txt declares sitemap");
        }

        (
            site_checks::robots_txt_is_valid(response.status, &response.body),
            rules.blocked_paths(&self.config.pages),
        )
    }

    async fn check_sitemap(&self) -> (usize, Vec<String>) {
        let url = self.absolute(SITEMAP_PATH);
        match self.fetch(&url, self.config.check_timeout).await {
            Ok(response) if response.is_success() => {
                site_checks::inspect_sitemap(&response.body, &self.origin, &self.config.pages)
            }
            Ok(response) => {
                tracing::info!(url = %url, status = response.status, "sitemap.xml not served");
                site_checks::missing_sitemap(&self.config.pages)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to fetch sitemap.xml");
                site_checks::missing_sitemap(&self.config.pages)
            }
        }
    }

    async fn resource_exists(&self, path: &str) -> bool {
        let url = self.absolute(path);
        match tokio::time::timeout(self.config.check_timeout, self.fetcher.head(&url)).await {
            Ok(Ok(status)) => (200..300).contains(&status),
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "HEAD check failed");
                false
            }
            Err(_) => {
                tracing::warn!(url = %url, "HEAD check timed out");
                false
            }
        }
    }

    async fn fetch(&self, url: &str, limit: Duration) -> Result<FetchResponse> {
        tokio::time::timeout(limit, self.fetcher.get(url))
            .await
            .with_context(|| format!("Timed out after {}s fetching {url}", limit.as_secs_f32()))?
    }

    fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}
