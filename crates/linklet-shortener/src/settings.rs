use linklet_storage::DEFAULT_STORAGE_KEY;
use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_LINKS: usize = 5;
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configures a [`LinkService`](crate::LinkService).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Backend key holding the serialized collection.
    #[builder(default = DEFAULT_STORAGE_KEY.to_string(), setter(into))]
    pub storage_key: String,
    /// Maximum number of links the collection may hold at once.
    #[builder(default = DEFAULT_MAX_LINKS)]
    pub max_links: usize,
    /// Delay before a scheduled redirect resolves its code.
    #[builder(default = DEFAULT_REDIRECT_DELAY)]
    pub redirect_delay: Duration,
    /// Origin that short URLs are built on, e.g. `https://lnk.example`.
    #[builder(default = DEFAULT_BASE_URL.to_string(), setter(into))]
    pub base_url: String,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ShortenerSettings::default();
        assert_eq!(settings.storage_key, "shortenedUrls");
        assert_eq!(settings.max_links, 5);
        assert_eq!(settings.redirect_delay, Duration::from_secs(1));
        assert_eq!(settings.base_url, "http://localhost:3000");
    }

    #[test]
    fn overrides() {
        let settings = ShortenerSettings::builder()
            .storage_key("links")
            .max_links(2)
            .redirect_delay(Duration::ZERO)
            .base_url("https://lnk.example")
            .build();
        assert_eq!(settings.storage_key, "links");
        assert_eq!(settings.max_links, 2);
        assert_eq!(settings.redirect_delay, Duration::ZERO);
        assert_eq!(settings.base_url, "https://lnk.example");
    }
}
