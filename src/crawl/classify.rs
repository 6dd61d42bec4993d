//! Link routing predicates. Plain substring containment against the site's markers;
//! no URL structure is assumed.

use url::Url;

use crate::strategy::SiteConfig;

/// Listing (pagination) link: the raw href contains the configured listing marker.
pub fn is_listing_link(href: &str, config: &SiteConfig) -> bool {
    !config.collection.is_empty() && href.contains(&config.collection)
}

/// Product link: the absolute URL contains the configured detail marker.
pub fn is_detail_link(absolute_url: &str, config: &SiteConfig) -> bool {
    !config.url_detail.is_empty() && absolute_url.contains(&config.url_detail)
}

/// Host is the site domain or its `www.` variant.
pub fn is_allowed(url: &Url, config: &SiteConfig) -> bool {
    match url.host_str() {
        Some(host) => {
            host == config.site
                || host
                    .strip_prefix("www.")
                    .is_some_and(|rest| rest == config.site)
        }
        None => false,
    }
}

/// Resolve `href` against the page it was found on. Fragment dropped; only http(s) kept.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}
