use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "seo-audit")]
#[command(about = "Audit a site's configured pages for SEO and generative-engine readiness", long_about = None)]
pub struct Cli {
    /// Site origin to audit, e.g. https://example.com
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save JSON report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Page path to audit (repeatable; replaces the default page list)
    #[arg(short, long = "page", value_name = "PATH")]
    pub pages: Vec<String>,

    /// Per-page fetch timeout in seconds (default: 10)
    #[arg(long, default_value_t = 10)]
    pub page_timeout: u64,

    /// Site-level check timeout in seconds (default: 5)
    #[arg(long, default_value_t = 5)]
    pub check_timeout: u64,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}
