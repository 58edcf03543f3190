use url::Url;

/// Decide whether `raw_href` found on `page` points back into the same site.
///
/// A link is internal when it resolves to the page's host, or when its raw
/// form is a root-relative path or a bare fragment. If the href cannot be
/// resolved at all, only the raw-prefix check applies.
pub fn is_internal_link(raw_href: &str, page: &Url) -> bool {
    let raw = raw_href.trim();
    let relative_form = raw.starts_with('#') || (raw.starts_with('/') && !raw.starts_with("//"));

    match page.join(raw) {
        Ok(resolved) => relative_form || same_host(&resolved, page),
        Err(_) => relative_form,
    }
}

/// Resolve `raw` against `base`, keeping the raw value when that fails.
pub fn resolve(raw: &str, base: &Url) -> String {
    let raw = raw.trim();
    base.join(raw)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn same_host(link: &Url, page: &Url) -> bool {
    match (link.host_str(), page.host_str()) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}
