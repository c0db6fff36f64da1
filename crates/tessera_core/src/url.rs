//! Storage URL helpers.

/// Splice a style name before the extension: `name.ext` becomes
/// `name.<style>.ext`.
///
/// # Examples
///
/// ```
/// use tessera_core::style_url;
///
/// assert_eq!(style_url("a/b.png", "thumb"), "a/b.thumb.png");
/// assert_eq!(style_url("a/b", "thumb"), "a/b.thumb");
/// ```
pub fn style_url(url: &str, style: &str) -> String {
    let file_start = url.rfind('/').map(|i| i + 1).unwrap_or(0);
    match url[file_start..].rfind('.') {
        Some(dot) => {
            let split = file_start + dot;
            format!("{}.{}{}", &url[..split], style, &url[split..])
        }
        None => format!("{}.{}", url, style),
    }
}

/// Normalise an endpoint into a protocol-relative base and join `parts`
/// onto it.
///
/// The scheme (`http://` or `https://`) is stripped and `//` prefixed;
/// each part is trimmed of slashes before joining.
///
/// # Examples
///
/// ```
/// use tessera_core::media_url;
///
/// assert_eq!(media_url("https://cdn.example.com/", &[]), "//cdn.example.com");
/// assert_eq!(
///     media_url("http://cdn.example.com", &["/system/a.png"]),
///     "//cdn.example.com/system/a.png"
/// );
/// ```
pub fn media_url(base: &str, parts: &[&str]) -> String {
    let mut base = base.trim_end_matches('/');
    for scheme in ["https://", "http://"] {
        if let Some(stripped) = base.strip_prefix(scheme) {
            base = stripped;
        }
    }

    let base = format!("//{}", base);
    if parts.is_empty() {
        return base;
    }

    let joined = parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .collect::<Vec<_>>()
        .join("/");
    format!("{}/{}", base, joined)
}
