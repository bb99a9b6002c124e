use crate::constants::Thresholds;
use crate::models::{
    Category, FixType, Impact, PageAnalysis, SeoRecommendation, Severity, SiteValidation,
};

/// Turns a completed crawl into a severity-ordered list of findings.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    thresholds: Thresholds,
}

/// Builder-style helper so each rule reads as one expression.
struct Finding {
    rec: SeoRecommendation,
}

impl Finding {
    fn new(severity: Severity, category: Category, title: &str) -> Self {
        Self {
            rec: SeoRecommendation {
                page_path: None,
                severity,
                category,
                title: title.to_string(),
                description: String::new(),
                current_value: String::new(),
                recommended_value: String::new(),
                estimated_impact: Impact::Medium,
                is_auto_fixable: false,
                fix_type: None,
            },
        }
    }

    fn page(mut self, path: &str) -> Self {
        self.rec.page_path = Some(path.to_string());
        self
    }

    fn describe(mut self, description: impl Into<String>) -> Self {
        self.rec.description = description.into();
        self
    }

    fn values(mut self, current: impl Into<String>, recommended: impl Into<String>) -> Self {
        self.rec.current_value = current.into();
        self.rec.recommended_value = recommended.into();
        self
    }

    fn impact(mut self, impact: Impact) -> Self {
        self.rec.estimated_impact = impact;
        self
    }

    fn auto_fix(mut self, fix_type: FixType) -> Self {
        self.rec.is_auto_fixable = true;
        self.rec.fix_type = Some(fix_type);
        self
    }

    fn build(self) -> SeoRecommendation {
        self.rec
    }
}

impl RecommendationEngine {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Site-wide findings first, then per-page findings in rule order, stably
    /// sorted so critical comes first.
    pub fn generate(
        &self,
        pages: &[PageAnalysis],
        validation: &SiteValidation,
    ) -> Vec<SeoRecommendation> {
        let mut recs = Self::site_findings(validation);
        for page in pages {
            self.page_findings(page, &mut recs);
        }

        recs.sort_by_key(|rec| rec.severity);
        recs
    }

    fn site_findings(validation: &SiteValidation) -> Vec<SeoRecommendation> {
        let mut recs = Vec::new();

        if !validation.robots_txt_valid {
            recs.push(
                Finding::new(
                    Severity::Critical,
                    Category::Technical,
                    "robots.txt is missing or invalid",
                )
                .describe(
                    "robots.txt could not be fetched or does not declare both a User-agent \
                     group and a Sitemap location. Crawlers may miss or misread the site.",
                )
                .values("Missing or invalid", "User-agent and Sitemap directives present")
                .impact(Impact::High)
                .auto_fix(FixType::GenerateRobotsTxt)
                .build(),
            );
        }

        if !validation.sitemap_missing_pages.is_empty() {
            let missing = &validation.sitemap_missing_pages;
            recs.push(
                Finding::new(Severity::High, Category::Technical, "Pages missing from sitemap")
                    .describe(format!(
                        "{} configured page(s) are not listed in sitemap.xml: {}",
                        missing.len(),
                        missing.join(", ")
                    ))
                    .values(
                        format!("{} URLs in sitemap", validation.sitemap_page_count),
                        "Every configured page listed",
                    )
                    .impact(Impact::High)
                    .auto_fix(FixType::RegenerateSitemap)
                    .build(),
            );
        }

        if !validation.robots_blocked_pages.is_empty() {
            let blocked = &validation.robots_blocked_pages;
            recs.push(
                Finding::new(
                    Severity::High,
                    Category::Technical,
                    "Configured pages blocked by robots.txt",
                )
                .describe(format!(
                    "robots.txt disallows {} page(s) for all crawlers: {}",
                    blocked.len(),
                    blocked.join(", ")
                ))
                .values(format!("{} blocked", blocked.len()), "No audited page disallowed")
                .impact(Impact::High)
                .build(),
            );
        }

        if !validation.og_image_exists {
            recs.push(
                Finding::new(
                    Severity::High,
                    Category::Technical,
                    "Social preview image is missing",
                )
                .describe("The Open Graph preview image did not respond. Shared links render without an image.")
                .values("Not found", "1200x630 image served with a 2xx status")
                .impact(Impact::Medium)
                .build(),
            );
        }

        if !validation.manifest_exists {
            recs.push(
                Finding::new(Severity::Medium, Category::Technical, "Web app manifest is missing")
                    .describe("No web app manifest was found.")
                    .values("Not found", "manifest.json served with a 2xx status")
                    .impact(Impact::Low)
                    .auto_fix(FixType::GenerateManifest)
                    .build(),
            );
        }

        recs
    }

    fn page_findings(&self, page: &PageAnalysis, recs: &mut Vec<SeoRecommendation>) {
        let t = &self.thresholds;
        let path = page.path.as_str();

        if page.status_code != 200 {
            let title = if page.is_reachable() {
                format!("Page returned HTTP {}", page.status_code)
            } else {
                "Page is unreachable".to_string()
            };
            recs.push(
                Finding::new(Severity::Critical, Category::Technical, &title)
                    .page(path)
                    .describe(format!("{} did not return a 200 response.", page.url))
                    .values(page.status_code.to_string(), "200")
                    .impact(Impact::High)
                    .build(),
            );
        }

        if page.title.is_empty() {
            recs.push(
                Finding::new(Severity::Critical, Category::Content, "Missing page title")
                    .page(path)
                    .describe("The page has no <title> element.")
                    .values("None", format!("{}-{} characters", t.title_min_length, t.title_max_length))
                    .impact(Impact::High)
                    .auto_fix(FixType::GenerateTitle)
                    .build(),
            );
        } else if page.title_length < t.title_min_length {
            recs.push(
                Finding::new(Severity::Medium, Category::Content, "Page title is too short")
                    .page(path)
                    .describe(format!(
                        "Title is {} characters: \"{}\"",
                        page.title_length, page.title
                    ))
                    .values(
                        format!("{} characters", page.title_length),
                        format!("{}-{} characters", t.title_min_length, t.title_max_length),
                    )
                    .impact(Impact::Medium)
                    .auto_fix(FixType::GenerateTitle)
                    .build(),
            );
        } else if page.title_length > t.title_max_length {
            recs.push(
                Finding::new(Severity::Low, Category::Content, "Page title is too long")
                    .page(path)
                    .describe(format!(
                        "Title is {} characters and will be truncated in search results.",
                        page.title_length
                    ))
                    .values(
                        format!("{} characters", page.title_length),
                        format!("{}-{} characters", t.title_min_length, t.title_max_length),
                    )
                    .impact(Impact::Low)
                    .auto_fix(FixType::GenerateTitle)
                    .build(),
            );
        }

        if page.description.is_empty() {
            recs.push(
                Finding::new(Severity::High, Category::Content, "Missing meta description")
                    .page(path)
                    .describe("The page has no meta description.")
                    .values(
                        "None",
                        format!(
                            "{}-{} characters",
                            t.description_min_length, t.description_max_length
                        ),
                    )
                    .impact(Impact::High)
                    .auto_fix(FixType::GenerateMetaDescription)
                    .build(),
            );
        } else if page.description_length < t.description_min_length {
            recs.push(
                Finding::new(Severity::Medium, Category::Content, "Meta description is too short")
                    .page(path)
                    .describe(format!(
                        "Meta description is {} characters.",
                        page.description_length
                    ))
                    .values(
                        format!("{} characters", page.description_length),
                        format!(
                            "{}-{} characters",
                            t.description_min_length, t.description_max_length
                        ),
                    )
                    .impact(Impact::Medium)
                    .auto_fix(FixType::GenerateMetaDescription)
                    .build(),
            );
        }

        if !page.has_open_graph() {
            let missing: Vec<&str> = [
                ("og:title", &page.og_title),
                ("og:description", &page.og_description),
                ("og:image", &page.og_image),
            ]
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();
            recs.push(
                Finding::new(Severity::High, Category::Technical, "Missing Open Graph tags")
                    .page(path)
                    .describe(format!("Missing: {}", missing.join(", ")))
                    .values(
                        format!("{} of 3 present", 3 - missing.len()),
                        "og:title, og:description and og:image",
                    )
                    .impact(Impact::Medium)
                    .auto_fix(FixType::AddOpenGraphTags)
                    .build(),
            );
        }

        if page.h1_count == 0 {
            recs.push(
                Finding::new(Severity::High, Category::Content, "Missing H1 heading")
                    .page(path)
                    .describe("The page has no H1 heading.")
                    .values("0", "1")
                    .impact(Impact::High)
                    .build(),
            );
        } else if page.h1_count > 1 {
            recs.push(
                Finding::new(Severity::Medium, Category::Content, "Multiple H1 headings")
                    .page(path)
                    .describe(format!("H1 headings: {}", page.h1_values.join(" | ")))
                    .values(page.h1_count.to_string(), "1")
                    .impact(Impact::Medium)
                    .build(),
            );
        }

        if page.word_count < t.min_word_count {
            recs.push(
                Finding::new(Severity::Medium, Category::Content, "Thin content")
                    .page(path)
                    .describe(format!(
                        "The page has {} words of server-rendered content.",
                        page.word_count
                    ))
                    .values(
                        format!("{} words", page.word_count),
                        format!("At least {} words", t.min_word_count),
                    )
                    .impact(Impact::Medium)
                    .build(),
            );
        }

        let missing_alt = page.images_missing_alt();
        if missing_alt > 0 {
            recs.push(
                Finding::new(Severity::Medium, Category::Content, "Images missing alt text")
                    .page(path)
                    .describe(format!(
                        "{} of {} images have no alt text.",
                        missing_alt, page.img_count
                    ))
                    .values(format!("{} missing", missing_alt), "0 missing")
                    .impact(Impact::Medium)
                    .auto_fix(FixType::GenerateAltText)
                    .build(),
            );
        }

        if page.canonical.is_empty() {
            recs.push(
                Finding::new(Severity::Medium, Category::Technical, "Missing canonical tag")
                    .page(path)
                    .describe("No <link rel=\"canonical\"> was found.")
                    .values("None", page.url.clone())
                    .impact(Impact::Medium)
                    .auto_fix(FixType::AddCanonical)
                    .build(),
            );
        }

        if !page.is_legal_page() {
            if !page.has_json_ld {
                recs.push(
                    Finding::new(Severity::Medium, Category::StructuredData, "No structured data")
                        .page(path)
                        .describe("The page has no JSON-LD structured data.")
                        .values("None", "Relevant schema.org JSON-LD")
                        .impact(Impact::Medium)
                        .auto_fix(FixType::AddStructuredData)
                        .build(),
                );
            }

            if page.content_clarity_score < t.min_content_clarity {
                recs.push(
                    Finding::new(
                        Severity::Low,
                        Category::Geo,
                        "Low content clarity for AI answers",
                    )
                    .page(path)
                    .describe(
                        "Short sentences, a single H1 and clear H2 sections make content \
                         easier for answer engines to quote.",
                    )
                    .values(
                        page.content_clarity_score.to_string(),
                        format!("{}+", t.min_content_clarity),
                    )
                    .impact(Impact::Low)
                    .build(),
                );
            }

            if page.answerability_score < t.min_answerability {
                recs.push(
                    Finding::new(
                        Severity::Low,
                        Category::Geo,
                        "Low answerability for AI answers",
                    )
                    .page(path)
                    .describe(
                        "Question-style headings, FAQ schema, definitions and numbered steps \
                         help answer engines lift answers from the page.",
                    )
                    .values(
                        page.answerability_score.to_string(),
                        format!("{}+", t.min_answerability),
                    )
                    .impact(Impact::Low)
                    .build(),
                );
            }
        }

        if page.response_time_ms > t.max_response_time_ms {
            recs.push(
                Finding::new(Severity::Medium, Category::Performance, "Slow server response")
                    .page(path)
                    .describe(format!(
                        "The page took {} ms to respond.",
                        page.response_time_ms
                    ))
                    .values(
                        format!("{} ms", page.response_time_ms),
                        format!("Under {} ms", t.max_response_time_ms),
                    )
                    .impact(Impact::Medium)
                    .build(),
            );
        }
    }
}

/// Convenience entry point using the default thresholds.
pub fn generate_recommendations(
    pages: &[PageAnalysis],
    validation: &SiteValidation,
) -> Vec<SeoRecommendation> {
    RecommendationEngine::default().generate(pages, validation)
}
