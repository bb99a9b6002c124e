use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalized analysis of a single audited page.
///
/// Every field is always populated. Unreachable pages carry `status_code == 0`
/// and zeroed content fields rather than missing ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    pub path: String,
    pub url: String,
    pub status_code: u16,
    pub response_time_ms: u64,

    pub title: String,
    pub title_length: usize,
    pub description: String,
    pub description_length: usize,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub twitter_card: String,
    pub canonical: String,
    pub viewport: bool,

    pub word_count: usize,
    pub h1_count: usize,
    pub h2_count: usize,
    pub h3_count: usize,
    pub h1_values: Vec<String>,
    pub img_count: usize,
    pub img_with_alt: usize,
    pub internal_links: usize,
    pub external_links: usize,

    pub has_json_ld: bool,
    pub json_ld_types: BTreeSet<String>,
    pub has_faq_schema: bool,
    pub has_breadcrumb_schema: bool,
    pub has_product_schema: bool,

    pub content_clarity_score: u32,
    pub answerability_score: u32,
    pub citation_worthiness_score: u32,
}

impl PageAnalysis {
    /// A JS shell: served fine, but the static markup carries no content.
    pub fn is_client_rendered(&self) -> bool {
        self.status_code == 200 && self.word_count < 50 && self.h1_count == 0
    }

    pub fn is_reachable(&self) -> bool {
        self.status_code != 0
    }

    /// Privacy and terms pages are exempt from structured-data and GEO checks.
    pub fn is_legal_page(&self) -> bool {
        self.path.contains("privacy") || self.path.contains("terms")
    }

    pub fn has_open_graph(&self) -> bool {
        !self.og_title.is_empty() && !self.og_description.is_empty() && !self.og_image.is_empty()
    }

    pub fn images_missing_alt(&self) -> usize {
        self.img_count.saturating_sub(self.img_with_alt)
    }

    pub fn geo_composite(&self) -> f64 {
        f64::from(
            self.content_clarity_score + self.answerability_score + self.citation_worthiness_score,
        ) / 3.0
    }
}

/// Site-level resource checks gathered alongside the page crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteValidation {
    pub robots_txt_valid: bool,
    pub sitemap_page_count: usize,
    pub sitemap_missing_pages: Vec<String>,
    pub robots_blocked_pages: Vec<String>,
    pub og_image_exists: bool,
    pub manifest_exists: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScores {
    pub overall: u32,
    pub technical: u32,
    pub content: u32,
    pub structured_data: u32,
    pub performance: u32,
    pub geo: u32,
}

/// Ordered from most to least urgent; sorting relies on this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Critical is 0, low is 3.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Content,
    StructuredData,
    Performance,
    Geo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// Automated remediation an external workflow can apply for a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    GenerateRobotsTxt,
    RegenerateSitemap,
    GenerateManifest,
    GenerateTitle,
    GenerateMetaDescription,
    AddOpenGraphTags,
    GenerateAltText,
    AddCanonical,
    AddStructuredData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoRecommendation {
    /// `None` for site-wide findings.
    pub page_path: Option<String>,
    pub severity: Severity,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub current_value: String,
    pub recommended_value: String,
    pub estimated_impact: Impact,
    pub is_auto_fixable: bool,
    pub fix_type: Option<FixType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub site_url: String,
    pub timestamp: String,
    pub scores: SeoScores,
    pub pages: Vec<PageAnalysis>,
    pub validation: SiteValidation,
    pub recommendations: Vec<SeoRecommendation>,
    pub pages_audited: usize,
    pub audit_duration_ms: u64,
}
