use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Routes audited on every run, in report order.
pub const DEFAULT_PAGES: &[&str] = &[
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
];

pub const PAGE_TIMEOUT_SECS: u64 = 10;
pub const CHECK_TIMEOUT_SECS: u64 = 5;

pub const ROBOTS_TXT_PATH: &str = "/robots.txt";
pub const SITEMAP_PATH: &str = "/sitemap.xml";
pub const OG_IMAGE_PATH: &str = "/og-image.png";
pub const MANIFEST_PATH: &str = "/manifest.json";

/// Numeric limits shared by the scorer and the recommendation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub title_min_length: usize,
    pub title_max_length: usize,
    pub description_min_length: usize,
    pub description_max_length: usize,
    pub min_word_count: usize,
    pub max_response_time_ms: u64,
    pub fast_response_time_ms: u64,
    pub min_content_clarity: u32,
    pub min_answerability: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            title_min_length: 30,
            title_max_length: 60,
            description_min_length: 120,
            description_max_length: 160,
            min_word_count: 300,
            max_response_time_ms: 3000,
            fast_response_time_ms: 800,
            min_content_clarity: 50,
            min_answerability: 30,
        }
    }
}

/// Weight of each dimension in the overall score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub technical: f64,
    pub content: f64,
    pub structured_data: f64,
    pub performance: f64,
    pub geo: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            technical: 0.25,
            content: 0.25,
            structured_data: 0.15,
            performance: 0.15,
            geo: 0.20,
        }
    }
}

impl ScoringWeights {
    pub fn total(&self) -> f64 {
        self.technical + self.content + self.structured_data + self.performance + self.geo
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.technical,
            self.content,
            self.structured_data,
            self.performance,
            self.geo,
        ];
        if weights.iter().any(|w| *w < 0.0) {
            bail!("Scoring weights must not be negative");
        }
        if (self.total() - 1.0).abs() > 0.001 {
            bail!(
                "Scoring weights must sum to 1.0 (got {:.3})",
                self.total()
            );
        }
        Ok(())
    }
}
