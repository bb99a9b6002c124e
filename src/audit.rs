use crate::crawler::SiteCrawler;
use crate::http_client::PageFetcher;
use crate::models::AuditResult;
use crate::recommendations::RecommendationEngine;
use crate::scoring::Scorer;
use std::time::Instant;

/// Runs one complete audit: crawl, then score and recommend over the same
/// immutable page set.
pub async fn run_audit<F: PageFetcher>(
    crawler: &SiteCrawler<F>,
    scorer: &Scorer,
    engine: &RecommendationEngine,
) -> AuditResult {
    let start = Instant::now();

    let (pages, validation) = crawler.crawl_site().await;
    let scores = scorer.calculate_scores(&pages, &validation);
    let recommendations = engine.generate(&pages, &validation);

    let audit_duration_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        pages = pages.len(),
        overall = scores.overall,
        recommendations = recommendations.len(),
        duration_ms = audit_duration_ms,
        "Audit complete"
    );

    AuditResult {
        site_url: crawler.origin().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        scores,
        pages_audited: pages.len(),
        pages,
        validation,
        recommendations,
        audit_duration_ms,
    }
}
