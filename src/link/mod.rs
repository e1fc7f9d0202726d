//! Survey link construction.
//!
//! The routing core never formats survey URLs itself; it asks a
//! [`SurveyLinkBuilder`] supplied by the host deployment.

use std::str::FromStr;

use crate::config::LinkConfig;

/// Builds the participant URL for a survey and access token
pub trait SurveyLinkBuilder: Send + Sync {
    fn build_link(&self, survey_id: &str, token: &str) -> String;
}

impl<F> SurveyLinkBuilder for F
where
    F: Fn(&str, &str) -> String + Send + Sync,
{
    fn build_link(&self, survey_id: &str, token: &str) -> String {
        self(survey_id, token)
    }
}

/// URL layout used by the survey host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// `{base}/?r=survey/index&sid={sid}&token={token}`
    #[default]
    Query,
    /// `{base}/index.php/survey/index/sid/{sid}/token/{token}`
    Path,
}

impl FromStr for LinkStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" => Ok(LinkStyle::Query),
            "path" => Ok(LinkStyle::Path),
            other => Err(format!("unknown link style: {}", other)),
        }
    }
}

/// Link builder for a survey host at a fixed base URL
#[derive(Debug, Clone)]
pub struct HostLinkBuilder {
    base_url: String,
    style: LinkStyle,
}

impl HostLinkBuilder {
    pub fn new(base_url: impl Into<String>, style: LinkStyle) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, style }
    }

    /// Build from configuration; an unknown style falls back to `query`.
    pub fn from_config(config: &LinkConfig) -> Self {
        let style = config.style.parse().unwrap_or_else(|e: String| {
            tracing::warn!(error = %e, "Falling back to query-style survey links");
            LinkStyle::Query
        });
        Self::new(config.base_url.clone(), style)
    }
}

impl SurveyLinkBuilder for HostLinkBuilder {
    fn build_link(&self, survey_id: &str, token: &str) -> String {
        match self.style {
            LinkStyle::Query => format!(
                "{}/?r=survey/index&sid={}&token={}",
                self.base_url, survey_id, token
            ),
            LinkStyle::Path => format!(
                "{}/index.php/survey/index/sid/{}/token/{}",
                self.base_url, survey_id, token
            ),
        }
    }
}
