use crate::target::Target;
use crate::{TargetError, TargetResult};
use url::Url;

/// Scheme prepended to inputs that carry none
const DEFAULT_SCHEME: &str = "https://";

/// Normalizes raw user input into a [`Target`]
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Keep an explicit `http://` or `https://` scheme (case-insensitive)
/// 3. Reject any other explicit scheme (`ftp://`, `file://`, ...)
/// 4. Prefix `https://` when no scheme is present
/// 5. Parse; reject malformed URLs and URLs without a host
///
/// Normalization is idempotent: feeding the string form of a normalized
/// target back in yields the same target.
///
/// # Examples
///
/// ```
/// use trawl::target::normalize_target;
///
/// let target = normalize_target("example.com/docs").unwrap();
/// assert_eq!(target.as_str(), "https://example.com/docs");
///
/// let target = normalize_target("http://example.com/a?b=c").unwrap();
/// assert_eq!(target.as_str(), "http://example.com/a?b=c");
/// ```
pub fn normalize_target(raw: &str) -> TargetResult<Target> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TargetError::Empty);
    }

    let candidate = if has_http_scheme(raw) {
        raw.to_string()
    } else if let Some((scheme, _)) = raw.split_once("://") {
        return Err(TargetError::InvalidScheme(scheme.to_string()));
    } else {
        format!("{}{}", DEFAULT_SCHEME, raw)
    };

    let url = Url::parse(&candidate).map_err(|e| TargetError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(TargetError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(Target::from_url(url)),
        _ => Err(TargetError::MissingHost),
    }
}

fn has_http_scheme(raw: &str) -> bool {
    let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
