/// Configuration for block normalization
use serde::{Deserialize, Serialize};

/// Default host of the image proxy endpoint
pub const DEFAULT_IMAGE_PROXY_HOST: &str = "https://www.notion.so";

/// Environment variable overriding `image_proxy_host`
pub const ENV_IMAGE_PROXY_HOST: &str = "NOTION_IMAGE_PROXY_HOST";

/// Environment variable overriding `proxy_images` ("0", "false", "no", "off" disable)
pub const ENV_PROXY_IMAGES: &str = "NOTION_PROXY_IMAGES";

/// Settings for [`BlockNormalizer`](crate::services::BlockNormalizer)
///
/// All fields use `#[serde(default)]` so partial configuration files
/// deserialize without error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Rewrite image URLs through the proxy endpoint
    #[serde(default = "default_proxy_images")]
    pub proxy_images: bool,

    /// Host serving the `/image/` proxy endpoint and built-in `/images/`
    #[serde(default = "default_image_proxy_host")]
    pub image_proxy_host: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            proxy_images: default_proxy_images(),
            image_proxy_host: default_image_proxy_host(),
        }
    }
}

fn default_proxy_images() -> bool {
    true
}

fn default_image_proxy_host() -> String {
    DEFAULT_IMAGE_PROXY_HOST.to_string()
}

impl NormalizerConfig {
    /// Defaults overlaid with `NOTION_PROXY_IMAGES` and `NOTION_IMAGE_PROXY_HOST`
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(ENV_PROXY_IMAGES).ok().as_deref(),
            std::env::var(ENV_IMAGE_PROXY_HOST).ok().as_deref(),
        )
    }

    /// Apply raw override values as read from the environment
    fn with_overrides(mut self, proxy_images: Option<&str>, host: Option<&str>) -> Self {
        if let Some(flag) = proxy_images {
            self.proxy_images = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        if let Some(host) = host.map(str::trim).filter(|h| !h.is_empty()) {
            tracing::info!("Using image proxy host from {}: {}", ENV_IMAGE_PROXY_HOST, host);
            self.image_proxy_host = host.trim_end_matches('/').to_string();
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let host = self.image_proxy_host.trim();
        if host.is_empty() {
            return Err("image_proxy_host cannot be empty".to_string());
        }

        if !(host.starts_with("https://") || host.starts_with("http://")) {
            return Err(format!(
                "image_proxy_host must start with http:// or https://, got '{}'",
                host
            ));
        }

        Ok(())
    }
}
