use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// ASCII punctuation removed from the end of a candidate URL
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']'];

fn scheme_regex() -> &'static Regex {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    SCHEME.get_or_init(|| Regex::new(r"(?i)https?://").expect("static regex is valid"))
}

/// Returns true if `c` can be part of a URL as written in announcement text
///
/// Printable ASCII (minus markup delimiters and quotes) and letters/digits of
/// any script are accepted, so internationalized hosts survive. Whitespace,
/// emoji and full-width punctuation end the URL.
fn is_url_char(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_graphic() && !matches!(c, '<' | '>' | '"' | '\'' | '`')
    } else {
        c.is_alphanumeric()
    }
}

/// Cuts a candidate at the first decorative character and trims trailing punctuation
///
/// # Examples
///
/// ```
/// use domain_scout::url::trim_decorations;
///
/// assert_eq!(trim_decorations("https://a.example 👉"), "https://a.example");
/// assert_eq!(trim_decorations("https://a.example👉click"), "https://a.example");
/// assert_eq!(trim_decorations("https://a.example."), "https://a.example");
/// ```
pub fn trim_decorations(candidate: &str) -> &str {
    let end = candidate
        .char_indices()
        .find(|(_, c)| !is_url_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(candidate.len());

    candidate[..end].trim_end_matches(TRAILING_PUNCTUATION)
}

/// Returns true if the string parses as an absolute http(s) URL with a host
pub fn is_absolute_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => {
            (url.scheme() == "http" || url.scheme() == "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Finds the first well-formed absolute URL in free text
///
/// Every `http://` or `https://` occurrence is tried in order; the first one
/// that survives [`trim_decorations`] and parses as an absolute URL wins.
///
/// # Arguments
///
/// * `text` - Text that may contain a URL
///
/// # Returns
///
/// The cleaned URL string, or None if the text has no usable URL
///
/// # Examples
///
/// ```
/// use domain_scout::url::find_first_url;
///
/// let text = "官方地址： https://zlib-official.example 👉 点击访问";
/// assert_eq!(find_first_url(text).as_deref(), Some("https://zlib-official.example"));
/// assert_eq!(find_first_url("no address here"), None);
/// ```
pub fn find_first_url(text: &str) -> Option<String> {
    scheme_regex().find_iter(text).find_map(|m| {
        let candidate = trim_decorations(&text[m.start()..]);
        if is_absolute_http_url(candidate) {
            Some(candidate.to_string())
        } else {
            None
        }
    })
}
