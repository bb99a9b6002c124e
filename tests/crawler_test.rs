mod server;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use seo_audit::constants::DEFAULT_PAGES;
use seo_audit::crawler::{CrawlerConfig, SiteCrawler};
use seo_audit::http_client::{FetchResponse, HttpFetcher, PageFetcher};
use seo_audit::models::Severity;
use seo_audit::recommendations::generate_recommendations;
use server::get_test_server_url;
use std::collections::HashMap;
use std::time::Duration;

const ORIGIN: &str = "https://example.com";

#[derive(Clone)]
enum Reply {
    Ok(u16, String),
    Fail,
    Hang,
}

/// In-memory fetcher keyed by absolute URL. Unknown URLs are transport failures.
#[derive(Default)]
struct MockFetcher {
    replies: HashMap<String, Reply>,
}

impl MockFetcher {
    fn with(mut self, path: &str, reply: Reply) -> Self {
        self.replies.insert(format!("{ORIGIN}{path}"), reply);
        self
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse> {
        match self.replies.get(url).cloned() {
            Some(Reply::Ok(status, body)) => Ok(FetchResponse {
                status,
                body,
                elapsed_ms: 42,
            }),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(anyhow!("unreachable"))
            }
            Some(Reply::Fail) | None => Err(anyhow!("connection refused: {url}")),
        }
    }

    async fn head(&self, url: &str) -> Result<u16> {
        self.get(url).await.map(|response| response.status)
    }
}

fn page_html(heading: &str) -> String {
    format!(
        "<html><head><title>{heading}</title></head><body><h1>{heading}</h1><p>Fresh prices daily.</p></body></html>"
    )
}

fn config(pages: &[&str]) -> CrawlerConfig {
    let mut config = CrawlerConfig::new(ORIGIN);
    config.pages = pages.iter().map(|p| p.to_string()).collect();
    config.page_timeout = Duration::from_millis(200);
    config.check_timeout = Duration::from_millis(100);
    config
}

fn sitemap_for(paths: &[&str]) -> String {
    let urls: String = paths
        .iter()
        .map(|p| format!("<url><loc>{ORIGIN}{p}</loc></url>"))
        .collect();
    format!("<urlset>{urls}</urlset>")
}

#[tokio::test]
async fn test_rejects_non_http_scheme() {
    let result = SiteCrawler::new(MockFetcher::default(), CrawlerConfig::new("ftp://example.com"));
    assert!(result.is_err());
}

#[tokio::test]
async fn test_pages_keep_configured_order_and_degrade_individually() {
    let fetcher = MockFetcher::default()
        .with("/", Reply::Ok(200, page_html("Home")))
        .with("/pricing", Reply::Fail)
        .with("/faq", Reply::Ok(404, page_html("Not found")))
        .with("/blog", Reply::Hang);
    let crawler = SiteCrawler::new(fetcher, config(&["/", "/pricing", "/faq", "/blog"])).unwrap();

    let (pages, _) = crawler.crawl_site().await;

    let paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["/", "/pricing", "/faq", "/blog"]);

    assert_eq!(pages[0].status_code, 200);
    assert_eq!(pages[0].url, "https://example.com/");
    assert_eq!(pages[0].h1_values, vec!["Home"]);
    assert_eq!(pages[0].response_time_ms, 42);

    // Transport failure
    assert_eq!(pages[1].status_code, 0);
    assert_eq!(pages[1].word_count, 0);
    assert_eq!(pages[1].title, "");

    // Non-2xx is still analyzed
    assert_eq!(pages[2].status_code, 404);
    assert_eq!(pages[2].h1_count, 1);

    // Timeout
    assert_eq!(pages[3].status_code, 0);
    assert_eq!(pages[3].url, "https://example.com/blog");
}

#[tokio::test]
async fn test_robots_timeout_yields_single_critical_site_finding() {
    let fetcher = MockFetcher::default()
        .with("/", Reply::Ok(200, page_html("Home")))
        .with("/robots.txt", Reply::Hang)
        .with("/sitemap.xml", Reply::Ok(200, sitemap_for(&["/"])))
        .with("/og-image.png", Reply::Ok(200, String::new()))
        .with("/manifest.json", Reply::Ok(200, String::new()));
    let crawler = SiteCrawler::new(fetcher, config(&["/"])).unwrap();

    let (pages, validation) = crawler.crawl_site().await;
    assert!(!validation.robots_txt_valid);
    assert!(validation.robots_blocked_pages.is_empty());
    assert!(validation.og_image_exists);
    assert!(validation.manifest_exists);

    let recs = generate_recommendations(&pages, &validation);
    let critical_site: Vec<_> = recs
        .iter()
        .filter(|r| r.page_path.is_none() && r.severity == Severity::Critical)
        .collect();
    assert_eq!(critical_site.len(), 1);
    assert_eq!(critical_site[0].title, "robots.txt is missing or invalid");
}

#[tokio::test]
async fn test_sitemap_missing_two_of_ten_pages() {
    let listed: Vec<&str> = DEFAULT_PAGES
        .iter()
        .copied()
        .filter(|p| *p != "/compare" && *p != "/blog")
        .collect();
    let mut body_paths = listed.clone();
    body_paths.push("/news/weekly-deals-roundup");

    let fetcher = MockFetcher::default()
        .with("/sitemap.xml", Reply::Ok(200, sitemap_for(&body_paths)));
    let crawler = SiteCrawler::new(fetcher, config(DEFAULT_PAGES)).unwrap();

    let (pages, validation) = crawler.crawl_site().await;
    assert_eq!(pages.len(), 10);
    assert_eq!(validation.sitemap_page_count, 9);
    assert_eq!(validation.sitemap_missing_pages, vec!["/compare", "/blog"]);

    let recs = generate_recommendations(&pages, &validation);
    let sitemap_recs: Vec<_> = recs
        .iter()
        .filter(|r| r.title == "Pages missing from sitemap")
        .collect();
    assert_eq!(sitemap_recs.len(), 1);
    assert_eq!(sitemap_recs[0].severity, Severity::High);
    assert!(sitemap_recs[0].description.contains("/compare"));
    assert!(sitemap_recs[0].description.contains("/blog"));
}

#[tokio::test]
async fn test_sitemap_failure_reports_every_page_missing() {
    let fetcher = MockFetcher::default().with("/sitemap.xml", Reply::Ok(500, String::new()));
    let crawler = SiteCrawler::new(fetcher, config(&["/", "/faq"])).unwrap();

    let (_, validation) = crawler.crawl_site().await;
    assert_eq!(validation.sitemap_page_count, 0);
    assert_eq!(validation.sitemap_missing_pages, vec!["/", "/faq"]);
    assert!(!validation.og_image_exists);
    assert!(!validation.manifest_exists);
}

#[tokio::test]
async fn test_robots_blocked_pages() {
    let robots = "User-agent: *\nDisallow: /pricing\nSitemap: https://example.com/sitemap.xml\n";
    let fetcher =
        MockFetcher::default().with("/robots.txt", Reply::Ok(200, robots.to_string()));
    let crawler = SiteCrawler::new(fetcher, config(&["/", "/pricing"])).unwrap();

    let (_, validation) = crawler.crawl_site().await;
    assert!(validation.robots_txt_valid);
    assert_eq!(validation.robots_blocked_pages, vec!["/pricing"]);
}

#[tokio::test]
async fn test_crawl_live_server() {
    let base_url = get_test_server_url().await;

    let mut config = CrawlerConfig::new(&base_url);
    config.pages = vec!["/".to_string(), "/faq".to_string(), "/missing".to_string()];
    let fetcher = HttpFetcher::new(10).expect("Failed to build fetcher");
    let crawler = SiteCrawler::new(fetcher, config).expect("Failed to create crawler");

    let (pages, validation) = crawler.crawl_site().await;

    assert_eq!(pages.len(), 3);
    let home = &pages[0];
    assert_eq!(home.status_code, 200);
    assert_eq!(home.title, "Compare Grocery Prices Across Local Stores Today");
    assert!(home.viewport);
    assert_eq!(home.internal_links, 1);
    assert!(home.json_ld_types.contains("WebSite"));

    assert!(pages[1].has_faq_schema);
    assert_eq!(pages[2].status_code, 404);

    assert!(validation.robots_txt_valid);
    assert_eq!(validation.robots_blocked_pages, vec!["/missing"]);
    assert_eq!(validation.sitemap_page_count, 2);
    assert_eq!(validation.sitemap_missing_pages, vec!["/missing"]);
    assert!(validation.og_image_exists);
    assert!(!validation.manifest_exists);
}
