use std::time::Duration;

/// Origin of the trends service. Fixed in this version.
pub const DEFAULT_BASE_ORIGIN: &str = "http://localhost:8000";

/// Path of the trends endpoint on the service.
pub const TRENDS_PATH: &str = "/api/trends";

/// Background refresh cadence (5 minutes).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_USER_AGENT: &str = concat!("trends-dashboard/", env!("CARGO_PKG_VERSION"));

/// Runtime settings shared by the trends client and the refresh controller.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub base_origin: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_origin: DEFAULT_BASE_ORIGIN.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DashboardConfig {
    /// Point the dashboard at a different service origin (tests use a loopback one).
    pub fn with_base_origin(mut self, origin: impl Into<String>) -> Self {
        self.base_origin = origin.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn trends_url(&self) -> String {
        format!("{}{}", self.base_origin.trim_end_matches('/'), TRENDS_PATH)
    }
}
