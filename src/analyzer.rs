use crate::geo::{self, GeoInput};
use crate::models::PageAnalysis;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::collections::BTreeSet;
use url::Url;

// Cached selectors to avoid repeated parsing
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("meta description selector should be valid")
});
static OG_TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='og:title']").expect("og:title selector should be valid")
});
static OG_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='og:description']")
        .expect("og:description selector should be valid")
});
static OG_IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[property='og:image']").expect("og:image selector should be valid")
});
static TWITTER_CARD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='twitter:card']").expect("twitter:card selector should be valid")
});
static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel='canonical']").expect("canonical selector should be valid")
});
static VIEWPORT_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='viewport']").expect("viewport selector should be valid")
});
static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("h1 selector should be valid"));
static H2_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2").expect("h2 selector should be valid"));
static H3_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3").expect("h3 selector should be valid"));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("body selector should be valid"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static JSON_LD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script[type='application/ld+json']")
        .expect("json-ld selector should be valid")
});

// Raw-markup fallbacks for when the parsed tree comes back empty
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex should be valid"));
static META_DESC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<meta\s+[^>]*name\s*=\s*["']description["'][^>]*content\s*=\s*["']([^"']*)["']"#)
        .expect("meta description regex should be valid")
});
static H1_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("h1 regex should be valid"));
static H2_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>").expect("h2 regex should be valid"));
static H3_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h3[^>]*>(.*?)</h3>").expect("h3 regex should be valid"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex should be valid"));
static NON_CONTENT_BLOCK_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["head", "script", "style", "noscript", "nav", "footer", "svg"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}>"))
                .expect("block strip regex should be valid")
        })
        .collect()
});
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:[a-zA-Z]+|#\d+|#x[0-9a-fA-F]+);").expect("entity regex should be valid")
});
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));
static IMG_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<img\b[^>]*>").expect("img regex should be valid"));
static ALT_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)\balt\s*=\s*["']([^"']*)["']"#).expect("alt regex should be valid")
});
static HREF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*\bhref\s*=\s*["']([^"']*)["']"#).expect("href regex should be valid")
});
static JSON_LD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("json-ld regex should be valid")
});

/// Subtrees that never count as page content.
const EXCLUDED_TEXT_TAGS: &[&str] = &[
    "nav", "footer", "script", "style", "header", "noscript", "svg",
];

const MIN_TREE_WORDS: usize = 50;
const FALLBACK_MARKUP_LEN: usize = 1000;

pub struct PageAnalyzer;

impl PageAnalyzer {
    /// Builds a normalized analysis record from raw server markup.
    ///
    /// Never fails: missing or malformed markup yields zeroed fields. Each
    /// field group is read from the parsed tree first and from the raw
    /// markup only when the tree comes back empty.
    pub fn analyze(
        markup: &str,
        path: &str,
        url: &str,
        status_code: u16,
        response_time_ms: u64,
    ) -> PageAnalysis {
        let document = Html::parse_document(markup);
        let origin = Self::origin_of(url);

        let title = Self::extract_title(&document, markup);
        let description = Self::extract_description(&document, markup);

        let h1_values = Self::extract_headings(&document, &H1_SELECTOR, &H1_RE, markup);
        let h2_count = Self::extract_headings(&document, &H2_SELECTOR, &H2_RE, markup).len();
        let h3_count = Self::extract_headings(&document, &H3_SELECTOR, &H3_RE, markup).len();

        let body_text = Self::extract_body_text(&document, markup);
        let word_count = body_text.split_whitespace().count();

        let (img_count, img_with_alt) = Self::count_images(&document, markup);
        let (internal_links, external_links) = Self::count_links(&document, markup, &origin);

        let json_ld_types = Self::extract_json_ld_types(&document, markup);
        let has_faq_schema = json_ld_types.contains("FAQPage");
        let has_breadcrumb_schema = json_ld_types.contains("BreadcrumbList");
        let has_product_schema = json_ld_types.contains("Product");

        let geo_input = GeoInput {
            markup,
            body_text: &body_text,
            word_count,
            h1_count: h1_values.len(),
            h2_count,
            h3_count,
            has_faq_schema,
        };

        PageAnalysis {
            path: path.to_string(),
            url: url.to_string(),
            status_code,
            response_time_ms,
            title_length: title.chars().count(),
            title,
            description_length: description.chars().count(),
            description,
            og_title: Self::meta_content(&document, &OG_TITLE_SELECTOR),
            og_description: Self::meta_content(&document, &OG_DESC_SELECTOR),
            og_image: Self::meta_content(&document, &OG_IMAGE_SELECTOR),
            twitter_card: Self::meta_content(&document, &TWITTER_CARD_SELECTOR),
            canonical: Self::extract_canonical(&document),
            viewport: document.select(&VIEWPORT_SELECTOR).next().is_some(),
            word_count,
            h1_count: h1_values.len(),
            h2_count,
            h3_count,
            h1_values,
            img_count,
            img_with_alt,
            internal_links,
            external_links,
            has_json_ld: !json_ld_types.is_empty(),
            content_clarity_score: geo::content_clarity_score(&geo_input),
            answerability_score: geo::answerability_score(&geo_input),
            citation_worthiness_score: geo::citation_worthiness_score(&geo_input),
            json_ld_types,
            has_faq_schema,
            has_breadcrumb_schema,
            has_product_schema,
        }
    }

    /// Record for a page whose fetch failed at the transport level.
    pub fn unreachable(path: &str, url: &str) -> PageAnalysis {
        PageAnalysis {
            path: path.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    fn origin_of(url: &str) -> String {
        Url::parse(url)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_default()
    }

    fn extract_title(document: &Html, markup: &str) -> String {
        let title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();
        if !title.is_empty() {
            return title;
        }

        TITLE_RE
            .captures(markup)
            .map(|caps| strip_tags(&caps[1]))
            .unwrap_or_default()
    }

    fn extract_description(document: &Html, markup: &str) -> String {
        let description = Self::meta_content(document, &META_DESC_SELECTOR);
        if !description.is_empty() {
            return description;
        }

        META_DESC_RE
            .captures(markup)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_default()
    }

    fn meta_content(document: &Html, selector: &Selector) -> String {
        document
            .select(selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn extract_canonical(document: &Html) -> String {
        document
            .select(&CANONICAL_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    /// Heading texts for one level, falling back to a raw scan when the
    /// tree finds none of that level.
    fn extract_headings(
        document: &Html,
        selector: &Selector,
        pattern: &Regex,
        markup: &str,
    ) -> Vec<String> {
        let headings: Vec<String> = document
            .select(selector)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .collect();
        if !headings.is_empty() {
            return headings;
        }

        pattern
            .captures_iter(markup)
            .map(|caps| strip_tags(&caps[1]))
            .collect()
    }

    fn extract_body_text(document: &Html, markup: &str) -> String {
        let mut tree_text = String::new();
        if let Some(body) = document.select(&BODY_SELECTOR).next() {
            collect_content_text(body, &mut tree_text);
        }
        let tree_text = collapse_whitespace(&tree_text);
        let tree_words = tree_text.split_whitespace().count();

        if tree_words >= MIN_TREE_WORDS || markup.chars().count() <= FALLBACK_MARKUP_LEN {
            return tree_text;
        }

        let raw_text = raw_body_text(markup);
        if raw_text.split_whitespace().count() > tree_words {
            tracing::debug!(
                tree_words,
                raw_words = raw_text.split_whitespace().count(),
                "Using raw markup text over parsed body text"
            );
            raw_text
        } else {
            tree_text
        }
    }

    fn count_images(document: &Html, markup: &str) -> (usize, usize) {
        let mut count = 0;
        let mut with_alt = 0;
        for img in document.select(&IMG_SELECTOR) {
            count += 1;
            if img
                .value()
                .attr("alt")
                .is_some_and(|alt| !alt.trim().is_empty())
            {
                with_alt += 1;
            }
        }
        if count > 0 {
            return (count, with_alt);
        }

        for tag in IMG_TAG_RE.find_iter(markup) {
            count += 1;
            if ALT_ATTR_RE
                .captures(tag.as_str())
                .is_some_and(|caps| !caps[1].trim().is_empty())
            {
                with_alt += 1;
            }
        }
        (count, with_alt)
    }

    fn count_links(document: &Html, markup: &str, origin: &str) -> (usize, usize) {
        let tree = tally_links(
            document
                .select(&ANCHOR_SELECTOR)
                .filter_map(|el| el.value().attr("href")),
            origin,
        );
        if tree != (0, 0) {
            return tree;
        }

        tally_links(
            HREF_RE
                .captures_iter(markup)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str())),
            origin,
        )
    }

    fn extract_json_ld_types(document: &Html, markup: &str) -> BTreeSet<String> {
        let mut blocks: Vec<String> = document
            .select(&JSON_LD_SELECTOR)
            .map(|el| el.text().collect::<String>())
            .collect();
        if blocks.is_empty() {
            blocks = JSON_LD_RE
                .captures_iter(markup)
                .map(|caps| caps[1].to_string())
                .collect();
        }

        let mut types = BTreeSet::new();
        for block in blocks {
            match serde_json::from_str::<Value>(block.trim()) {
                Ok(value) => collect_schema_types(&value, &mut types),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unparseable JSON-LD block");
                }
            }
        }
        types
    }
}

/// Appends text under `element`, skipping non-content subtrees.
fn collect_content_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(el) => {
                if EXCLUDED_TEXT_TAGS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_content_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn raw_body_text(markup: &str) -> String {
    let mut text = markup.to_string();
    for block in NON_CONTENT_BLOCK_RES.iter() {
        text = block.replace_all(&text, " ").into_owned();
    }
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    collapse_whitespace(&text)
}

fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &regex::Captures<'_>| match &caps[0] {
            "&amp;" => "&",
            "&lt;" => "<",
            "&gt;" => ">",
            "&quot;" => "\"",
            "&#39;" | "&apos;" => "'",
            _ => " ",
        })
        .into_owned()
}

fn strip_tags(fragment: &str) -> String {
    collapse_whitespace(&decode_entities(&TAG_RE.replace_all(fragment, "")))
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Root-relative and same-origin hrefs are internal, other http(s) hrefs external.
fn tally_links<'a>(hrefs: impl Iterator<Item = &'a str>, origin: &str) -> (usize, usize) {
    let mut internal = 0;
    let mut external = 0;
    for href in hrefs {
        let href = href.trim();
        if href.starts_with('/') || is_same_origin(href, origin) {
            internal += 1;
        } else if href.starts_with("http") {
            external += 1;
        }
    }
    (internal, external)
}

fn is_same_origin(href: &str, origin: &str) -> bool {
    if origin.is_empty() {
        return false;
    }
    match href.strip_prefix(origin) {
        Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
        None => false,
    }
}

fn collect_schema_types(value: &Value, types: &mut BTreeSet<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_schema_types(item, types);
            }
        }
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => {
                    types.insert(t.clone());
                }
                Some(Value::Array(list)) => {
                    types.extend(list.iter().filter_map(Value::as_str).map(str::to_string));
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_schema_types(graph, types);
            }
        }
        _ => {}
    }
}
