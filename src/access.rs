//! Navigation access gate for premium sections.

use crate::models::session::Session;
use leptos::logging::log;
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/login";
pub const PRICING_PATH: &str = "/pricing";

/// Outcome of checking a navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Carries the login URL, with the original target as `?redirect=`.
    RedirectToLogin(String),
    RedirectToPricing(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGate {
    premium_prefixes: Vec<String>,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(["/tutors", "/integrity", "/whiteboard"])
    }
}

impl AccessGate {
    pub fn new<I, P>(premium_prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let premium_prefixes = premium_prefixes
            .into_iter()
            .map(Into::into)
            .map(|prefix: String| prefix.trim_end_matches('/').to_string())
            .filter(|prefix| !prefix.is_empty())
            .collect();
        Self { premium_prefixes }
    }

    pub fn premium_prefixes(&self) -> &[String] {
        &self.premium_prefixes
    }

    /// Prefixes match whole path segments: `/tutors` covers `/tutors/42` but
    /// not `/tutorsx`.
    pub fn is_premium(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        self.premium_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub fn check(&self, path: &str, session: Option<&Session>) -> Access {
        if !self.is_premium(path) {
            return Access::Allow;
        }
        match session {
            None => {
                log!("[GATE] Anonymous visit to {}, sending to login", path);
                Access::RedirectToLogin(format!(
                    "{LOGIN_PATH}?redirect={}",
                    urlencoding::encode(path)
                ))
            }
            Some(session) if !session.tier.is_paid() => {
                log!("[GATE] {} needs a paid tier for {}", session.user_id, path);
                Access::RedirectToPricing(PRICING_PATH.to_string())
            }
            Some(_) => Access::Allow,
        }
    }
}
