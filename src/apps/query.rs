//! List filters and their query-string form.
//!
//! The filters a user picks (tags, keywords, "created by me", module, status)
//! round-trip through a query string so a filtered list can be shared or
//! restored. [`AppListParams`] is the request a data source receives.

use super::{App, AppMode};
use serde::Serialize;
use url::form_urlencoded;

const TAG_IDS: &str = "tagIDs";
const KEYWORDS: &str = "keywords";
const IS_CREATED_BY_ME: &str = "isCreatedByMe";
const MODULE: &str = "module";
const APP_STATUS: &str = "appStatus";

/// Requests ask for this many apps per page unless configured otherwise
pub const DEFAULT_FETCH_LIMIT: u32 = 30;

/// Filters selected on the app list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppsQuery {
    pub tag_ids: Vec<String>,
    pub keywords: Option<String>,
    pub is_created_by_me: bool,
    pub module: Option<String>,
    pub app_status: Option<String>,
}

impl AppsQuery {
    /// Read the filters out of a query string such as `?tagIDs=a;b&keywords=bot`
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        // First occurrence wins, as with URLSearchParams.get
        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        let non_empty = |key: &str| get(key).filter(|v| !v.is_empty()).map(str::to_string);

        Self {
            tag_ids: get(TAG_IDS)
                .map(|v| {
                    v.split(';')
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            keywords: non_empty(KEYWORDS),
            is_created_by_me: get(IS_CREATED_BY_ME) == Some("true"),
            module: non_empty(MODULE),
            app_status: non_empty(APP_STATUS),
        }
    }

    /// Write the filters into `existing`, keeping every unrelated parameter
    pub fn apply_to(&self, existing: &str) -> String {
        let existing = existing.strip_prefix('?').unwrap_or(existing);
        let mut params = SearchParams::parse(existing);

        if self.tag_ids.is_empty() {
            params.delete(TAG_IDS);
        } else {
            params.set(TAG_IDS, &self.tag_ids.join(";"));
        }

        params.set_or_delete(KEYWORDS, self.keywords.as_deref());
        params.set_or_delete(
            IS_CREATED_BY_ME,
            self.is_created_by_me.then_some("true"),
        );
        params.set_or_delete(MODULE, self.module.as_deref());
        params.set_or_delete(APP_STATUS, self.app_status.as_deref());

        params.serialize()
    }

    /// The filters alone, as a query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.apply_to("")
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Ordered parameter list with URLSearchParams set/delete semantics
struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    fn parse(query: &str) -> Self {
        Self(form_urlencoded::parse(query.as_bytes()).into_owned().collect())
    }

    /// Replace the first `key` in place and drop the rest, or append
    fn set(&mut self, key: &str, value: &str) {
        match self.0.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.0[first].1 = value.to_string();
                let mut index = 0;
                self.0.retain(|(k, _)| {
                    let keep = k != key || index == first;
                    index += 1;
                    keep
                });
            }
            None => self.0.push((key.to_string(), value.to_string())),
        }
    }

    fn delete(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    fn set_or_delete(&mut self, key: &str, value: Option<&str>) {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => self.set(key, value),
            None => self.delete(key),
        }
    }

    fn serialize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// Parameters of one app-list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppListParams {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    /// Name substring; empty matches everything
    pub name: String,
    pub tag_ids: Vec<String>,
    pub is_created_by_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AppMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_status: Option<String>,
}

impl AppListParams {
    /// Build the first-page request for the filters and selected tab
    pub fn from_query(query: &AppsQuery, tab: &str, limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            name: query.keywords.clone().unwrap_or_default(),
            tag_ids: query.tag_ids.clone(),
            is_created_by_me: query.is_created_by_me,
            mode: AppMode::from_tab(tab),
            module: query.module.clone(),
            app_status: query.app_status.clone(),
        }
    }

    /// Same request for another page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Whether `app` passes every requested filter
    pub fn matches(&self, app: &App, current_user: Option<&str>) -> bool {
        if !self.name.is_empty()
            && !app
                .name
                .to_lowercase()
                .contains(&self.name.to_lowercase())
        {
            return false;
        }

        if !self.tag_ids.iter().all(|id| app.has_tag(id)) {
            return false;
        }

        if self.is_created_by_me {
            match (current_user, app.created_by.as_deref()) {
                (Some(user), Some(creator)) if user == creator => {}
                _ => return false,
            }
        }

        if self.mode.is_some_and(|mode| mode != app.mode) {
            return false;
        }

        if let Some(module) = &self.module {
            if app.module.map(|m| m.as_str()) != Some(module.as_str()) {
                return false;
            }
        }

        if let Some(status) = &self.app_status {
            if app.app_status.map(|s| s.as_str()) != Some(status.as_str()) {
                return false;
            }
        }

        true
    }
}

impl Default for AppListParams {
    fn default() -> Self {
        Self::from_query(&AppsQuery::default(), "all", DEFAULT_FETCH_LIMIT)
    }
}
