use crate::models::{AuditResult, SeoRecommendation, Severity};
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    /// Number of findings at each severity, most urgent first.
    pub fn severity_counts(recommendations: &[SeoRecommendation]) -> [(Severity, usize); 4] {
        [
            Severity::Critical,
            Severity::High,
            Severity::Medium,
            Severity::Low,
        ]
        .map(|severity| {
            let count = recommendations
                .iter()
                .filter(|rec| rec.severity == severity)
                .count();
            (severity, count)
        })
    }

    pub fn print_text_report(report: &AuditResult) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "SEO / GEO Audit Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "Site".bright_white().bold(), report.site_url);
        println!("{}: {}", "Timestamp".bright_white().bold(), report.timestamp);
        println!(
            "{}: {} pages in {} ms",
            "Audited".bright_white().bold(),
            report.pages_audited,
            report.audit_duration_ms
        );
        println!();

        // Scores
        println!("{}", "Scores".bright_yellow().bold().underline());
        let scores = &report.scores;
        for (label, value) in [
            ("Overall", scores.overall),
            ("Technical", scores.technical),
            ("Content", scores.content),
            ("Structured data", scores.structured_data),
            ("Performance", scores.performance),
            ("GEO", scores.geo),
        ] {
            println!("  {:<17}{}", format!("{}:", label), Self::colored_score(value));
        }
        println!();

        // Site checks
        let validation = &report.validation;
        println!("{}", "Site Checks".bright_yellow().bold().underline());
        println!("  robots.txt:      {}", Self::pass_fail(validation.robots_txt_valid));
        println!(
            "  Sitemap:         {} URLs, {} configured page(s) missing",
            validation.sitemap_page_count,
            validation.sitemap_missing_pages.len()
        );
        println!("  OG image:        {}", Self::pass_fail(validation.og_image_exists));
        println!("  Manifest:        {}", Self::pass_fail(validation.manifest_exists));
        println!();

        // Pages
        println!("{}", "Pages".bright_yellow().bold().underline());
        for page in &report.pages {
            let status = match page.status_code {
                0 => "N/A".dimmed(),
                code if code < 300 => code.to_string().bright_green(),
                code if code < 400 => code.to_string().yellow(),
                code => code.to_string().bright_red(),
            };
            println!(
                "  {:<20} {}  {} words  {} ms",
                page.path, status, page.word_count, page.response_time_ms
            );
        }
        println!();

        // Recommendations
        if !report.recommendations.is_empty() {
            println!("{}", "Recommendations".bright_yellow().bold().underline());
            for (severity, count) in Self::severity_counts(&report.recommendations) {
                if count > 0 {
                    println!("  {}: {}", Self::severity_label(severity), count);
                }
            }
            println!();

            for rec in &report.recommendations {
                let scope = rec.page_path.as_deref().unwrap_or("site-wide");
                let fix = if rec.is_auto_fixable {
                    " [auto-fix]".bright_cyan()
                } else {
                    "".normal()
                };
                println!(
                    "  [{}] {} ({}){}",
                    Self::severity_label(rec.severity),
                    rec.title.bright_white(),
                    scope,
                    fix
                );
                if !rec.description.is_empty() {
                    println!("        {}", rec.description.dimmed());
                }
            }
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn save_json_report(report: &AuditResult, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)
            .with_context(|| format!("Failed to create report file: {}", filename))?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }

    fn colored_score(score: u32) -> ColoredString {
        let text = score.to_string();
        if score >= 80 {
            text.bright_green()
        } else if score >= 50 {
            text.yellow()
        } else {
            text.bright_red()
        }
    }

    fn severity_label(severity: Severity) -> ColoredString {
        match severity {
            Severity::Critical => "CRITICAL".bright_red().bold(),
            Severity::High => "HIGH    ".bright_red(),
            Severity::Medium => "MEDIUM  ".yellow(),
            Severity::Low => "LOW     ".bright_cyan(),
        }
    }

    fn pass_fail(ok: bool) -> ColoredString {
        if ok {
            "ok".bright_green()
        } else {
            "missing".bright_red()
        }
    }
}
