use seo_audit::constants::{ScoringWeights, Thresholds};
use seo_audit::models::{PageAnalysis, SeoScores, SiteValidation};
use seo_audit::scoring::{Scorer, calculate_scores};

fn good_page(path: &str) -> PageAnalysis {
    PageAnalysis {
        path: path.to_string(),
        url: format!("https://example.com{path}"),
        status_code: 200,
        response_time_ms: 200,
        title: "Compare Grocery Prices Across Local Stores".to_string(),
        title_length: 42,
        description: "d".repeat(140),
        description_length: 140,
        og_title: "Basket".to_string(),
        og_description: "Weekly grocery deals".to_string(),
        og_image: "https://example.com/og-image.png".to_string(),
        twitter_card: "summary_large_image".to_string(),
        canonical: format!("https://example.com{path}"),
        viewport: true,
        word_count: 400,
        h1_count: 1,
        h2_count: 3,
        h3_count: 1,
        h1_values: vec!["Grocery deals".to_string()],
        img_count: 2,
        img_with_alt: 2,
        internal_links: 5,
        external_links: 1,
        has_json_ld: true,
        json_ld_types: [
            "BreadcrumbList",
            "FAQPage",
            "Organization",
            "Product",
            "WebSite",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect(),
        has_faq_schema: true,
        has_breadcrumb_schema: true,
        has_product_schema: true,
        content_clarity_score: 100,
        answerability_score: 100,
        citation_worthiness_score: 100,
    }
}

fn good_site() -> Vec<PageAnalysis> {
    [
        "/",
        "/pricing",
        "/features",
        "/how-it-works",
        "/compare",
        "/faq",
        "/blog",
        "/about",
        "/privacy",
        "/terms",
    ]
    .iter()
    .map(|path| good_page(path))
    .collect()
}

fn healthy_validation() -> SiteValidation {
    SiteValidation {
        robots_txt_valid: true,
        sitemap_page_count: 10,
        sitemap_missing_pages: Vec::new(),
        robots_blocked_pages: Vec::new(),
        og_image_exists: true,
        manifest_exists: true,
    }
}

#[test]
fn test_perfect_site_scores_full_marks() {
    let scores = calculate_scores(&good_site(), &healthy_validation());

    assert_eq!(
        scores,
        SeoScores {
            overall: 100,
            technical: 100,
            content: 100,
            structured_data: 100,
            performance: 100,
            geo: 100,
        }
    );
}

#[test]
fn test_empty_crawl() {
    let scores = calculate_scores(&[], &SiteValidation::default());

    // Only the "no pages missing from sitemap" bonus applies
    assert_eq!(scores.technical, 5);
    assert_eq!(scores.content, 0);
    assert_eq!(scores.structured_data, 0);
    assert_eq!(scores.performance, 0);
    assert_eq!(scores.geo, 0);
    assert_eq!(scores.overall, 1);
}

#[test]
fn test_sitemap_coverage_is_proportional() {
    let mut validation = healthy_validation();
    validation.sitemap_missing_pages = vec!["/compare".to_string(), "/blog".to_string()];

    let scores = calculate_scores(&good_site(), &validation);
    // 15 * 8/10 and no completeness bonus
    assert_eq!(scores.technical, 92);
}

#[test]
fn test_client_rendered_pages_leave_structural_checks() {
    let mut shell = good_page("/");
    shell.word_count = 10;
    shell.h1_count = 0;
    shell.h1_values.clear();
    shell.h2_count = 0;
    assert!(shell.is_client_rendered());

    let mut thin = good_page("/");
    thin.word_count = 10;
    thin.h2_count = 0;
    assert!(!thin.is_client_rendered());

    let validation = healthy_validation();
    assert_eq!(calculate_scores(&[shell], &validation).content, 100);
    assert_eq!(calculate_scores(&[thin], &validation).content, 70);
}

#[test]
fn test_pages_without_images_keep_alt_points() {
    let mut page = good_page("/");
    page.img_count = 0;
    page.img_with_alt = 0;

    let scores = calculate_scores(&[page], &healthy_validation());
    assert_eq!(scores.content, 100);
}

#[test]
fn test_performance_tiers_are_averaged() {
    let pages: Vec<PageAnalysis> = [100, 1200, 2500, 5000, 9000]
        .iter()
        .enumerate()
        .map(|(i, ms)| {
            let mut page = good_page(&format!("/p{i}"));
            page.response_time_ms = *ms;
            page
        })
        .collect();

    let scores = calculate_scores(&pages, &healthy_validation());
    // (100 + 85 + 70 + 40 + 10) / 5
    assert_eq!(scores.performance, 61);
}

#[test]
fn test_huge_response_thresholds_do_not_overflow() {
    let thresholds = Thresholds {
        fast_response_time_ms: u64::MAX / 2 + 1,
        max_response_time_ms: u64::MAX / 2 + 1,
        ..Thresholds::default()
    };
    let scorer = Scorer::new(ScoringWeights::default(), thresholds);
    let mut page = good_page("/");
    page.response_time_ms = u64::MAX - 1;

    let scores = scorer.calculate_scores(&[page], &healthy_validation());
    assert_eq!(scores.performance, 85);
}

#[test]
fn test_unreachable_page_scores_zero_performance() {
    let mut down = good_page("/pricing");
    down.status_code = 0;
    down.response_time_ms = 0;

    let scores = calculate_scores(&[good_page("/"), down], &healthy_validation());
    assert_eq!(scores.performance, 50);
}

#[test]
fn test_legal_pages_excluded_from_json_ld_coverage() {
    let mut privacy = good_page("/privacy");
    privacy.has_json_ld = false;
    privacy.json_ld_types.clear();
    privacy.has_faq_schema = false;
    privacy.has_breadcrumb_schema = false;
    privacy.has_product_schema = false;

    let scores = calculate_scores(&[good_page("/"), privacy], &healthy_validation());
    assert_eq!(scores.structured_data, 100);
}

#[test]
fn test_geo_blends_composite_with_structure() {
    let mut page = good_page("/");
    page.content_clarity_score = 60;
    page.answerability_score = 30;
    page.citation_worthiness_score = 30;

    let scores = calculate_scores(&[page], &healthy_validation());
    // 0.70 * 40 + 15 (two or more H2s) + 15 (FAQ schema)
    assert_eq!(scores.geo, 58);
}

#[test]
fn test_custom_weights() {
    let weights = ScoringWeights {
        technical: 1.0,
        content: 0.0,
        structured_data: 0.0,
        performance: 0.0,
        geo: 0.0,
    };
    let scorer = Scorer::new(weights, Thresholds::default());
    let mut validation = healthy_validation();
    validation.robots_txt_valid = false;

    let scores = scorer.calculate_scores(&good_site(), &validation);
    assert_eq!(scores.technical, 85);
    assert_eq!(scores.overall, 85);
}

#[test]
fn test_scoring_is_idempotent() {
    let mut pages = good_site();
    pages[3].response_time_ms = 2100;
    pages[4].word_count = 12;
    pages[4].h1_count = 0;
    pages[7].status_code = 404;
    let mut validation = healthy_validation();
    validation.manifest_exists = false;

    let first = calculate_scores(&pages, &validation);
    let second = calculate_scores(&pages, &validation);
    assert_eq!(first, second);
}
