use crate::errors::ClientError;
use crate::routines::resolve_routines_path;
use reqwest::Url;
use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub routines_path: PathBuf,
    /// Locations on which the full plan is loaded on first view.
    pub plan_pages: Vec<String>,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            routines_path: resolve_routines_path(),
            plan_pages: default_plan_pages(),
        }
    }

    /// Reads the environment; `api_url` overrides `WORKOUT_API_URL`.
    pub fn from_env(api_url: Option<&str>) -> Result<Self, ClientError> {
        let api_url = resolve_api_url(api_url)?;
        let mut config = Self::new(api_url);
        if let Ok(pages) = env::var("WORKOUT_PLAN_PAGES") {
            let pages = parse_plan_pages(&pages);
            if !pages.is_empty() {
                config.plan_pages = pages;
            }
        }
        Ok(config)
    }

    pub fn is_plan_page(&self, location: &str) -> bool {
        is_plan_location(&self.plan_pages, location)
    }
}

pub fn is_plan_location(pages: &[String], location: &str) -> bool {
    let path = location_path(location);
    pages.iter().any(|page| location_path(page) == path)
}

/// `override_url` wins over `WORKOUT_API_URL`, which wins over the default.
pub fn resolve_api_url(override_url: Option<&str>) -> Result<Url, ClientError> {
    let raw = match override_url {
        Some(url) => url.to_string(),
        None => env::var("WORKOUT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
    };
    Url::parse(&raw).map_err(|err| ClientError::validation(format!("invalid api url '{raw}': {err}")))
}

pub fn default_plan_pages() -> Vec<String> {
    vec!["/".to_string(), "/workout_plan".to_string()]
}

fn parse_plan_pages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .map(|page| location_path(page).to_string())
        .collect()
}

/// Strips scheme/host, query and fragment, and a trailing slash.
fn location_path(location: &str) -> &str {
    let without_origin = match location.find("://") {
        Some(index) => {
            let rest = &location[index + 3..];
            rest.find('/').map(|slash| &rest[slash..]).unwrap_or("/")
        }
        None => location,
    };
    let end = without_origin
        .find(['?', '#'])
        .unwrap_or(without_origin.len());
    let path = &without_origin[..end];
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else if path.is_empty() {
        "/"
    } else {
        path
    }
}
