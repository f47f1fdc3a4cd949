use url::Url;

/// Returns `host[:port]` for a URL, the port only when it is explicit
///
/// # Examples
///
/// ```
/// use url::Url;
/// use trawl::target::host_and_port;
///
/// let url = Url::parse("https://EXAMPLE.com:8080/path").unwrap();
/// assert_eq!(host_and_port(&url), Some("example.com:8080".to_string()));
/// ```
pub fn host_and_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Returns true if `host` contains `fragment`, ignoring case
///
/// `www.google.com`, `google.com` and `news.google.com` all contain
/// `google.com`.
pub fn host_contains(host: &str, fragment: &str) -> bool {
    host.to_lowercase().contains(&fragment.to_lowercase())
}
