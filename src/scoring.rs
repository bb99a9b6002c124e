use crate::constants::{ScoringWeights, Thresholds};
use crate::models::{PageAnalysis, SeoScores, SiteValidation};
use std::collections::BTreeSet;

/// Weighted point rubrics over a completed crawl. Pure and deterministic.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoringWeights,
    thresholds: Thresholds,
}

impl Scorer {
    pub fn new(weights: ScoringWeights, thresholds: Thresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn calculate_scores(&self, pages: &[PageAnalysis], validation: &SiteValidation) -> SeoScores {
        let technical = self.technical_score(pages, validation);
        let content = self.content_score(pages);
        let structured_data = self.structured_data_score(pages);
        let performance = self.performance_score(pages);
        let geo = self.geo_score(pages);

        let w = &self.weights;
        let overall = w.technical * f64::from(technical)
            + w.content * f64::from(content)
            + w.structured_data * f64::from(structured_data)
            + w.performance * f64::from(performance)
            + w.geo * f64::from(geo);

        SeoScores {
            overall: to_score(overall),
            technical,
            content,
            structured_data,
            performance,
            geo,
        }
    }

    fn technical_score(&self, pages: &[PageAnalysis], validation: &SiteValidation) -> u32 {
        let mut points = 0.0;

        if validation.robots_txt_valid {
            points += 15.0;
        }

        if !pages.is_empty() {
            let listed = pages
                .len()
                .saturating_sub(validation.sitemap_missing_pages.len());
            points += 15.0 * listed as f64 / pages.len() as f64;
        }
        if validation.sitemap_missing_pages.is_empty() {
            points += 5.0;
        }

        points += 15.0 * coverage(pages, |p| !p.canonical.is_empty());
        points += 20.0 * coverage(pages, |p| p.status_code == 200);
        points += 10.0 * coverage(pages, |p| p.viewport);

        if validation.og_image_exists {
            points += 5.0;
        }
        if validation.manifest_exists {
            points += 5.0;
        }

        points += 10.0 * coverage(pages, PageAnalysis::has_open_graph);

        to_score(points)
    }

    fn content_score(&self, pages: &[PageAnalysis]) -> u32 {
        let t = &self.thresholds;
        let mut points = 0.0;

        points += 20.0
            * coverage(pages, |p| {
                (t.title_min_length..=t.title_max_length).contains(&p.title_length)
            });
        points += 20.0
            * coverage(pages, |p| {
                (t.description_min_length..=t.description_max_length)
                    .contains(&p.description_length)
            });

        points += 20.0 * structural_coverage(pages, |p| p.h1_count == 1);
        points += 15.0 * structural_coverage(pages, |p| p.h2_count >= 1);
        points += 15.0 * structural_coverage(pages, |p| p.word_count >= t.min_word_count);

        let images: usize = pages.iter().map(|p| p.img_count).sum();
        let with_alt: usize = pages.iter().map(|p| p.img_with_alt).sum();
        if !pages.is_empty() {
            points += if images == 0 {
                10.0
            } else {
                10.0 * with_alt as f64 / images as f64
            };
        }

        to_score(points)
    }

    fn structured_data_score(&self, pages: &[PageAnalysis]) -> u32 {
        let content_pages: Vec<&PageAnalysis> =
            pages.iter().filter(|p| !p.is_legal_page()).collect();
        let mut points = 0.0;

        if !content_pages.is_empty() {
            let with_json_ld = content_pages.iter().filter(|p| p.has_json_ld).count();
            points += 40.0 * with_json_ld as f64 / content_pages.len() as f64;
        }

        if pages.iter().any(|p| p.has_faq_schema) {
            points += 15.0;
        }
        if pages.iter().any(|p| p.has_breadcrumb_schema) {
            points += 15.0;
        }
        if pages.iter().any(|p| p.has_product_schema) {
            points += 10.0;
        }

        let types: BTreeSet<&str> = pages
            .iter()
            .flat_map(|p| p.json_ld_types.iter().map(String::as_str))
            .collect();
        if types.contains("Organization") || types.contains("WebSite") {
            points += 10.0;
        }
        points += match types.len() {
            n if n >= 5 => 10.0,
            n if n >= 3 => 5.0,
            _ => 0.0,
        };

        to_score(points)
    }

    fn performance_score(&self, pages: &[PageAnalysis]) -> u32 {
        if pages.is_empty() {
            return 0;
        }

        let fast = self.thresholds.fast_response_time_ms;
        let max = self.thresholds.max_response_time_ms;
        let total: f64 = pages
            .iter()
            .map(|p| match p.response_time_ms {
                _ if !p.is_reachable() => 0.0,
                ms if ms <= fast => 100.0,
                ms if ms <= fast.saturating_mul(2) => 85.0,
                ms if ms <= max => 70.0,
                ms if ms <= max.saturating_mul(2) => 40.0,
                _ => 10.0,
            })
            .sum();

        to_score(total / pages.len() as f64)
    }

    fn geo_score(&self, pages: &[PageAnalysis]) -> u32 {
        let rendered: Vec<&PageAnalysis> = pages
            .iter()
            .filter(|p| p.status_code == 200 && !p.is_client_rendered())
            .collect();
        let mut points = 0.0;

        if !rendered.is_empty() {
            let composite: f64 =
                rendered.iter().map(|p| p.geo_composite()).sum::<f64>() / rendered.len() as f64;
            points += 0.70 * composite;
        }

        points += 15.0 * structural_coverage(pages, |p| p.h2_count >= 2);

        if pages.iter().any(|p| p.has_faq_schema) {
            points += 15.0;
        }

        to_score(points)
    }
}

/// Convenience entry point using the default weights and thresholds.
pub fn calculate_scores(pages: &[PageAnalysis], validation: &SiteValidation) -> SeoScores {
    Scorer::default().calculate_scores(pages, validation)
}

/// Share of all pages passing `check`; 0.0 for an empty crawl.
fn coverage(pages: &[PageAnalysis], check: impl Fn(&PageAnalysis) -> bool) -> f64 {
    if pages.is_empty() {
        return 0.0;
    }
    pages.iter().filter(|&p| check(p)).count() as f64 / pages.len() as f64
}

/// Like [`coverage`], but client-rendered pages leave the denominator and
/// pass automatically. A crawl of only client-rendered pages scores 1.0.
fn structural_coverage(pages: &[PageAnalysis], check: impl Fn(&PageAnalysis) -> bool) -> f64 {
    if pages.is_empty() {
        return 0.0;
    }
    let eligible: Vec<&PageAnalysis> = pages.iter().filter(|p| !p.is_client_rendered()).collect();
    if eligible.is_empty() {
        return 1.0;
    }
    eligible.iter().filter(|&&p| check(p)).count() as f64 / eligible.len() as f64
}

fn to_score(points: f64) -> u32 {
    points.round().clamp(0.0, 100.0) as u32
}
