//! Image URL rewriting
//!
//! Image sources stored on blocks (uploaded files, page covers) are often
//! signed storage URLs that expire or need authentication. The service
//! exposes a proxy endpoint that serves them publicly:
//!
//! ```text
//! https://s3.us-west-2.amazonaws.com/secure.notion-static.com/abc/cat.png
//!   -> https://www.notion.so/image/https%3A%2F%2Fs3.us-west-2.amazonaws.com%2F...
//! /images/page-cover/gradients_11.jpg
//!   -> https://www.notion.so/images/page-cover/gradients_11.jpg
//! ```

use crate::config::NormalizerConfig;

/// Rewrites an image URL into one that is always accessible
///
/// Implementations are pure and never fail; on any doubt they return the
/// input unchanged.
pub trait ImageUrlProxy: Send + Sync {
    fn rewrite(&self, url: &str) -> String;
}

/// Default proxy that routes images through the service's `/image/` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotionImageProxy {
    host: String,
    enabled: bool,
}

impl NotionImageProxy {
    /// Create a proxy rooted at `host` (e.g. "https://www.notion.so")
    pub fn new(host: impl Into<String>) -> Self {
        let host = host.into().trim_end_matches('/').to_string();
        Self {
            host,
            enabled: true,
        }
    }

    /// A proxy that leaves every URL unchanged
    pub fn disabled() -> Self {
        Self {
            host: String::new(),
            enabled: false,
        }
    }

    pub fn from_config(config: &NormalizerConfig) -> Self {
        if config.proxy_images {
            Self::new(config.image_proxy_host.as_str())
        } else {
            Self::disabled()
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Default for NotionImageProxy {
    fn default() -> Self {
        Self::from_config(&NormalizerConfig::default())
    }
}

impl ImageUrlProxy for NotionImageProxy {
    fn rewrite(&self, url: &str) -> String {
        if !self.enabled || url.is_empty() {
            return url.to_string();
        }

        let proxy_prefix = format!("{}/image/", self.host);
        if url.starts_with(&proxy_prefix) || url.contains("//www.notion.so/image/") {
            return url.to_string();
        }

        // Built-in covers and icons served from the app itself
        if url.starts_with("/images/") {
            return format!("{}{}", self.host, url);
        }

        // Emoji icons, data: URIs and relative paths aren't proxied
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return url.to_string();
        }

        format!("{}{}", proxy_prefix, urlencoding::encode(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy() -> NotionImageProxy {
        NotionImageProxy::new("https://www.notion.so")
    }

    #[test]
    fn test_rewrites_absolute_urls() {
        assert_eq!(
            proxy().rewrite("https://s3.test/a b.png"),
            "https://www.notion.so/image/https%3A%2F%2Fs3.test%2Fa%20b.png"
        );
    }

    #[test]
    fn test_builtin_images_get_host_prefix() {
        assert_eq!(
            proxy().rewrite("/images/page-cover/gradients_11.jpg"),
            "https://www.notion.so/images/page-cover/gradients_11.jpg"
        );
    }

    #[test]
    fn test_leaves_already_proxied_urls() {
        let url = "https://www.notion.so/image/https%3A%2F%2Fs3.test%2Fa.png";
        assert_eq!(proxy().rewrite(url), url);

        let custom = NotionImageProxy::new("https://img.example.com/");
        let url = "https://img.example.com/image/x";
        assert_eq!(custom.rewrite(url), url);
    }

    #[test]
    fn test_leaves_non_urls() {
        assert_eq!(proxy().rewrite(""), "");
        assert_eq!(proxy().rewrite("✉️"), "✉️");
        assert_eq!(proxy().rewrite("data:image/png;base64,AAAA"), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_disabled_is_identity() {
        let url = "https://s3.test/a.png";
        assert_eq!(NotionImageProxy::disabled().rewrite(url), url);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let custom = NotionImageProxy::new("https://img.example.com/");
        assert_eq!(custom.host(), "https://img.example.com");
        assert_eq!(
            custom.rewrite("/images/x.png"),
            "https://img.example.com/images/x.png"
        );
    }
}
