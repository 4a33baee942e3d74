use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    /// Scheme and host of the upstream web API, e.g. `"https://alkoteka.com"`.
    pub base_url: String,
    pub city_name: String,
    /// Upstream `city_uuid` resolved from `city_name`.
    pub city_id: String,
    pub categories_path: PathBuf,
    pub proxies_path: PathBuf,
    pub output_path: PathBuf,
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
    pub inter_request_delay_ms: u64,
    pub max_attempts: u32,
    pub backoff_initial_secs: u64,
    pub backoff_step_secs: u64,
    pub listing_page_size: u32,
    pub proxy_login: Option<String>,
    pub proxy_password: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("base_url", &self.base_url)
            .field("city_name", &self.city_name)
            .field("city_id", &self.city_id)
            .field("categories_path", &self.categories_path)
            .field("proxies_path", &self.proxies_path)
            .field("output_path", &self.output_path)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("max_attempts", &self.max_attempts)
            .field("backoff_initial_secs", &self.backoff_initial_secs)
            .field("backoff_step_secs", &self.backoff_step_secs)
            .field("listing_page_size", &self.listing_page_size)
            .field("proxy_login", &self.proxy_login)
            .field(
                "proxy_password",
                &self.proxy_password.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
