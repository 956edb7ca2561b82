use std::any::Any;

use cardledger_states::{State, state_assign_impl};
use ustr::Ustr;

const PROD_BASE_URL: &str = "https://api.cardledger.app";

/// Backend endpoint configuration.
///
/// Registered as a state so commands can snapshot it; tests and the web
/// entry point override the base URL through [`ApiConfig::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Scheme and host without a trailing slash.
    pub base_url: Ustr,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Ustr::from(PROD_BASE_URL),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: Ustr::from(base_url.trim_end_matches('/')),
        }
    }

    /// Canonical base for REST calls: `{base_url}/api`.
    ///
    /// `Ustr` keeps the joined URL interned; it is rebuilt on every call
    /// site but allocated once per distinct base.
    pub fn api_url(&self) -> Ustr {
        Ustr::from(&format!("{}/api", self.base_url))
    }
}

impl State for ApiConfig {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}
