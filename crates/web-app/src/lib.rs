#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::time::Duration;

mod branding;
mod context;
pub mod log;
mod mutation;
mod service;
mod settings;
mod token;

pub use branding::{
    Branding, BrandingRepository, BrandingService, DEFAULT_MANIFEST, Partner, PartnerError,
};
pub use context::{AppContext, ListOwner, Modal};
pub use mutation::{Mutation, MutationError, MutationState};
pub use service::Service;
pub use settings::{Settings, SettingsRepository, SettingsService, Theme, WeightUnit};
pub use token::TokenRepository;

const DEFAULT_API_URL: &str = "api";
const DEFAULT_PLAN_GENERATION_MIN_DELAY: Duration = Duration::from_millis(2500);

/// Build-time configuration of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the REST API, relative to the origin of the application if not absolute.
    pub api_url: String,
    /// Minimum time the plan generation step is displayed during onboarding.
    pub plan_generation_min_delay: Duration,
}

impl Config {
    /// Configuration from the `FORMA_API_URL` and `FORMA_PLAN_GENERATION_MIN_MS` variables at
    /// build time.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            option_env!("FORMA_API_URL"),
            option_env!("FORMA_PLAN_GENERATION_MIN_MS"),
        )
    }

    #[must_use]
    pub fn new(api_url: Option<&str>, plan_generation_min_ms: Option<&str>) -> Self {
        let api_url = match api_url.map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => DEFAULT_API_URL.to_string(),
        };
        let plan_generation_min_delay = match plan_generation_min_ms {
            Some(ms) => ms.trim().parse::<u64>().map_or_else(
                |_| {
                    ::log::warn!("invalid minimum plan generation delay: {ms}");
                    DEFAULT_PLAN_GENERATION_MIN_DELAY
                },
                Duration::from_millis,
            ),
            None => DEFAULT_PLAN_GENERATION_MIN_DELAY,
        };
        Self {
            api_url,
            plan_generation_min_delay,
        }
    }

    /// Elapses after the minimum plan generation delay.
    pub async fn plan_generation_delay(&self) {
        gloo_timers::future::sleep(self.plan_generation_min_delay).await;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}
