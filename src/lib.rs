pub mod analyzer;
pub mod audit;
pub mod cli;
pub mod config;
pub mod constants;
pub mod crawler;
pub mod geo;
pub mod http_client;
pub mod models;
pub mod recommendations;
pub mod reporter;
pub mod robots;
pub mod scoring;
pub mod site_checks;

use anyhow::Result;
use cli::Cli;
use colored::*;
use config::Config;
use crawler::SiteCrawler;
use http_client::HttpFetcher;
use recommendations::RecommendationEngine;
use reporter::Reporter;
use scoring::Scorer;
use std::path::Path;

pub async fn run(args: Cli) -> Result<()> {
    // Validate URL
    if !args.url.starts_with("http://") && !args.url.starts_with("https://") {
        anyhow::bail!("URL must start with http:// or https://");
    }

    let file_config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_default_paths()?.unwrap_or_default(),
    };
    let args = file_config.merge_with_cli(&args);
    let settings = file_config.audit_settings(&args)?;

    let is_text = args.output != "json";
    if is_text {
        println!("{}", "SEO / GEO Site Audit".bright_cyan().bold());
        println!("{}", "=".repeat(50).bright_blue());
        println!();
        println!("{} {}", "Auditing:".bright_white().bold(), args.url);
        println!(
            "{} {}",
            "Pages:".bright_white().bold(),
            settings.crawler.pages.len()
        );
        println!();
    }

    let fetcher = HttpFetcher::new(settings.crawler.page_timeout.as_secs().max(1))?;
    let mut crawler = SiteCrawler::new(fetcher, settings.crawler.clone())?;
    if args.verbose && is_text {
        crawler.enable_progress_bar();
    }

    let scorer = Scorer::new(settings.weights, settings.thresholds);
    let engine = RecommendationEngine::new(settings.thresholds);
    let report = audit::run_audit(&crawler, &scorer, &engine).await;

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => {
            Reporter::print_text_report(&report);
        }
    }

    if let Some(filename) = args.save {
        Reporter::save_json_report(&report, &filename)?;
    }

    Ok(())
}
