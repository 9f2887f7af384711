//! Access point extraction from the source page
//!
//! The source page announces addresses in a section introduced by a marker
//! heading. Inside that section each address sits in an emphasis element
//! whose colored span carries a label, e.g.
//!
//! ```html
//! <h2>最新官网地址</h2>
//! <p><strong><span style="color: #0000ff">官方地址:</span> https://a.example 👉</strong></p>
//! ```
//!
//! What counts as a marker, an emphasis element or a label is defined by
//! [`ExtractionRules`]; this module only walks the tree.

use crate::config::ExtractionRules;
use crate::record::AccessPointRecord;
use crate::url::find_first_url;
use crate::ConfigError;
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";

/// Extracts access point records from source page HTML
#[derive(Debug, Clone)]
pub struct Extractor {
    rules: ExtractionRules,
    heading_selector: Selector,
    emphasis_selector: Selector,
    span_selector: Selector,
    label_style: String,
}

/// A label span that matched the rules, with the URL it announces
#[derive(Debug)]
struct LabelledUrl {
    url: String,
    label: String,
}

impl Extractor {
    /// Compiles the rules into selectors
    ///
    /// # Returns
    ///
    /// * `Ok(Extractor)` - Ready to extract
    /// * `Err(ConfigError)` - An emphasis tag is not a valid selector
    pub fn new(rules: ExtractionRules) -> Result<Self, ConfigError> {
        let emphasis = rules.emphasis_tags.join(", ");
        let emphasis_selector = Selector::parse(&emphasis).map_err(|e| {
            ConfigError::Validation(format!("Invalid emphasis tags '{}': {:?}", emphasis, e))
        })?;
        let heading_selector = Selector::parse(HEADING_SELECTOR)
            .map_err(|e| ConfigError::Validation(format!("Invalid heading selector: {:?}", e)))?;
        let span_selector = Selector::parse("span[style]")
            .map_err(|e| ConfigError::Validation(format!("Invalid span selector: {:?}", e)))?;
        let label_style = normalize_style(&rules.label_style);

        Ok(Self {
            rules,
            heading_selector,
            emphasis_selector,
            span_selector,
            label_style,
        })
    }

    pub fn rules(&self) -> &ExtractionRules {
        &self.rules
    }

    /// Extracts records from the page in discovery order
    ///
    /// # Algorithm
    ///
    /// 1. Find the first heading whose text contains the marker
    /// 2. Walk its following siblings until a heading of the same or higher level
    /// 3. In each sibling, visit emphasis elements holding a styled label span
    ///    whose text contains a label keyword
    /// 4. Take the first URL after the span inside the emphasis element, or
    ///    else in the text node right after the emphasis element
    /// 5. Keep the first record per URL
    ///
    /// A page without the marker, or a section without matches, yields an
    /// empty vector. That is a valid outcome, not an error.
    ///
    /// # Arguments
    ///
    /// * `html` - The source page
    /// * `discovered_at` - Timestamp stamped on every record of this run
    pub fn extract(&self, html: &str, discovered_at: DateTime<Utc>) -> Vec<AccessPointRecord> {
        let document = Html::parse_document(html);

        let heading = match self.find_marker_heading(&document) {
            Some(heading) => heading,
            None => {
                tracing::info!("Marker heading '{}' not found", self.rules.marker);
                return Vec::new();
            }
        };
        let level = heading_level(heading.value().name()).unwrap_or(6);

        let mut records = Vec::new();
        let mut seen = HashSet::new();

        for sibling in heading.next_siblings() {
            let Some(element) = ElementRef::wrap(sibling) else {
                continue;
            };

            if heading_level(element.value().name()).is_some_and(|l| l <= level) {
                break;
            }

            for emphasis in self.emphasis_elements(element) {
                let Some(found) = self.match_emphasis(emphasis) else {
                    continue;
                };

                if seen.insert(found.url.clone()) {
                    tracing::debug!("Found access point {} ({})", found.url, found.label);
                    records.push(AccessPointRecord::crawled(
                        found.url,
                        found.label,
                        discovered_at,
                    ));
                } else {
                    tracing::trace!("Skipping duplicate access point {}", found.url);
                }
            }
        }

        records
    }

    fn find_marker_heading<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document
            .select(&self.heading_selector)
            .find(|h| h.text().collect::<String>().contains(&self.rules.marker))
    }

    /// The element itself (if it is an emphasis tag) followed by its emphasis descendants
    fn emphasis_elements<'a>(&self, element: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let name = element.value().name();
        let is_emphasis = self
            .rules
            .emphasis_tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(name));

        let mut elements = Vec::new();
        if is_emphasis {
            elements.push(element);
        }
        elements.extend(element.select(&self.emphasis_selector));
        elements
    }

    fn match_emphasis(&self, emphasis: ElementRef<'_>) -> Option<LabelledUrl> {
        let (span, raw_label) = emphasis
            .select(&self.span_selector)
            .filter(|span| self.style_matches(span))
            .map(|span| (span, span.text().collect::<String>()))
            .find(|(_, label)| {
                self.rules
                    .label_keywords
                    .iter()
                    .any(|keyword| label.contains(keyword.as_str()))
            })?;

        let url = url_after_span(emphasis, span).or_else(|| url_in_next_text(emphasis))?;

        Some(LabelledUrl {
            url,
            label: self.clean_label(&raw_label),
        })
    }

    fn style_matches(&self, span: &ElementRef<'_>) -> bool {
        span.value()
            .attr("style")
            .is_some_and(|style| normalize_style(style).contains(&self.label_style))
    }

    fn clean_label(&self, raw: &str) -> String {
        let mut label = raw.to_string();
        for punctuation in &self.rules.label_strip {
            if !punctuation.is_empty() {
                label = label.replace(punctuation.as_str(), "");
            }
        }
        label.trim().to_string()
    }
}

/// Lowercases and drops whitespace so `color: #0000FF` matches `color:#0000ff`
fn normalize_style(style: &str) -> String {
    style
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parses `h1`..`h6` into 1..6
fn heading_level(tag: &str) -> Option<u8> {
    tag.strip_prefix('h')
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
}

/// First URL in the text that follows `span` inside `emphasis`
fn url_after_span(emphasis: ElementRef<'_>, span: ElementRef<'_>) -> Option<String> {
    let span_id = span.id();
    let mut past_span = false;
    let mut text = String::new();

    for node in emphasis.descendants() {
        if node.id() == span_id {
            past_span = true;
            continue;
        }
        if !past_span || node.ancestors().any(|a| a.id() == span_id) {
            continue;
        }
        if let Some(t) = node.value().as_text() {
            text.push_str(t);
            // Keep text from separate nodes from running together
            text.push(' ');
        }
    }

    find_first_url(&text)
}

/// First URL in the plain-text node immediately after `emphasis`
fn url_in_next_text(emphasis: ElementRef<'_>) -> Option<String> {
    let next = emphasis.next_sibling()?;
    let text = next.value().as_text()?;
    find_first_url(text)
}
