//! Validated, normalized URL submitted for a reputation check.

use std::fmt;
use url::Url;

/// Errors produced while validating caller input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// An absolute `http`/`https` URL in canonical form.
///
/// Construction is the only place caller input is validated; everything
/// downstream (providers, cache, history) receives this type and never the raw
/// string.
///
/// # Normalization Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. Only HTTP and HTTPS are accepted
/// 3. Hostname is lowercased
/// 4. Default ports (80/443) are removed by the URL parser
/// 5. Fragments are removed
/// 6. Path and query are preserved as-is
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetUrl(Url);

impl TargetUrl {
    /// Parses and normalizes caller input.
    ///
    /// # Errors
    ///
    /// - [`TargetUrlError::Empty`] for empty or whitespace-only input
    /// - [`TargetUrlError::InvalidFormat`] when the input is not an absolute URL
    /// - [`TargetUrlError::UnsupportedProtocol`] for `javascript:`, `ftp:`, `data:`, ...
    /// - [`TargetUrlError::MissingHost`] when no host is present
    pub fn parse(input: &str) -> Result<Self, TargetUrlError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(TargetUrlError::Empty);
        }

        let mut url =
            Url::parse(trimmed).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            _ => return Err(TargetUrlError::UnsupportedProtocol),
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(TargetUrlError::MissingHost)?
            .to_ascii_lowercase();
        url.set_host(Some(&host))
            .map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

        url.set_fragment(None);

        Ok(Self(url))
    }

    /// The normalized URL string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Host component, lowercased.
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Equivalent spellings of the URL for list-based lookups.
    ///
    /// Returns the normalized URL first, followed by the trailing-slash toggle
    /// and the `www.` toggle of each. Duplicates are removed, order is stable.
    pub fn variants(&self) -> Vec<String> {
        let mut bases = vec![self.0.clone()];

        let host = self.host().to_string();
        let toggled_host = match host.strip_prefix("www.") {
            Some(bare) => Some(bare.to_string()),
            None if self.0.domain().is_some() => Some(format!("www.{host}")),
            None => None,
        };
        if let Some(toggled) = toggled_host {
            let mut alt = self.0.clone();
            if alt.set_host(Some(&toggled)).is_ok() {
                bases.push(alt);
            }
        }

        let mut out: Vec<String> = Vec::with_capacity(bases.len() * 2);
        for base in &bases {
            for candidate in [base.to_string(), toggle_trailing_slash(base)] {
                if !out.contains(&candidate) {
                    out.push(candidate);
                }
            }
        }
        out
    }
}

/// Adds or removes the trailing slash of the path, leaving the query intact.
///
/// The bare-root form is rendered without its slash (`https://a.com`).
fn toggle_trailing_slash(url: &Url) -> String {
    let path = url.path();
    let toggled_path = if path.len() > 1 && path.ends_with('/') {
        path.trim_end_matches('/').to_string()
    } else if path == "/" {
        String::new()
    } else {
        format!("{path}/")
    };

    let origin = url[..url::Position::BeforePath].to_string();
    match url.query() {
        Some(q) => format!("{origin}{toggled_path}?{q}"),
        None => format!("{origin}{toggled_path}"),
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
