//! Site-level resource checks run alongside the page crawl.

/// A robots file is valid when it was served successfully and declares both
/// a user-agent group and a sitemap.
pub fn robots_txt_is_valid(status: u16, body: &str) -> bool {
    if !(200..300).contains(&status) {
        return false;
    }
    let lower = body.to_lowercase();
    lower.contains("user-agent") && lower.contains("sitemap")
}

/// Returns the `<loc>` count and the configured paths whose absolute URL
/// does not appear in the sitemap body.
pub fn inspect_sitemap(body: &str, origin: &str, pages: &[String]) -> (usize, Vec<String>) {
    let count = body.matches("<loc>").count();
    let missing = pages
        .iter()
        .filter(|path| !body.contains(&format!("{origin}{path}")))
        .cloned()
        .collect();
    (count, missing)
}

/// Result used when the sitemap could not be fetched.
pub fn missing_sitemap(pages: &[String]) -> (usize, Vec<String>) {
    (0, pages.to_vec())
}
