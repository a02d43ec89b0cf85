//! The app catalogue: records, list queries, and where the records come from.

pub mod infinite;
pub mod query;
pub mod source;

pub use infinite::InfiniteAppList;
pub use query::{AppListParams, AppsQuery};
pub use source::{AppListPage, AppSource, FileAppSource, SourceError};

use crate::pager::Item;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One application record as the remote API returns it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub mode: AppMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<AppModule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_status: Option<AppStatus>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item for App {
    fn id(&self) -> &str {
        &self.id
    }
}

impl App {
    /// Whether the app carries the tag with `tag_id`
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }

    /// Comma separated tag names
    pub fn tag_names(&self) -> String {
        self.tags
            .iter()
            .map(|tag| tag.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A label attached to apps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_tag_type")]
    pub kind: String,
    #[serde(default)]
    pub binding_count: u32,
}

fn default_tag_type() -> String {
    "app".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

macro_rules! string_enum {
    (
        $name:ident,
        $kind:literal,
        { $($variant:ident => ($wire:literal, $label:literal)),+ $(,)? }
    ) => {
        // Not every enum cycles through its variants or writes wire values
        #[allow(dead_code)]
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire value used by the API and in query strings
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Human readable label
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ParseEnumError { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

/// Application type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppMode {
    Workflow,
    AdvancedChat,
    Chat,
    AgentChat,
    Completion,
}

string_enum!(AppMode, "app mode", {
    Workflow => ("workflow", "Workflow"),
    AdvancedChat => ("advanced-chat", "Chatflow"),
    Chat => ("chat", "Chatbot"),
    AgentChat => ("agent-chat", "Agent"),
    Completion => ("completion", "Completion"),
});

impl AppMode {
    /// Mode selected by a list tab; `all` and unknown tabs select every mode
    pub fn from_tab(tab: &str) -> Option<Self> {
        tab.parse().ok()
    }
}

/// Business area an app belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppModule {
    Global,
    College,
    Major,
    Skill,
    Career,
    Region,
}

string_enum!(AppModule, "module", {
    Global => ("global", "Global"),
    College => ("college", "College"),
    Major => ("major", "Major"),
    Skill => ("skill", "Skill"),
    Career => ("career", "Career"),
    Region => ("region", "Region"),
});

/// Delivery state of an app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AppStatus {
    Testing,
    InProgress,
    Completed,
}

string_enum!(AppStatus, "app status", {
    Testing => ("testing", "Testing"),
    InProgress => ("inProgress", "In progress"),
    Completed => ("completed", "Completed"),
});

/// How the list is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Table,
}

string_enum!(ViewMode, "view mode", {
    Grid => ("grid", "Grid"),
    Table => ("table", "Table"),
});

impl ViewMode {
    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::Table,
            ViewMode::Table => ViewMode::Grid,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A deterministic app for tests
    pub fn app(id: &str, name: &str, mode: AppMode) -> App {
        App {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            mode,
            module: None,
            app_status: None,
            tags: Vec::new(),
            author_name: None,
            created_by: None,
            updated_at: None,
        }
    }

    pub fn tag(id: &str, name: &str) -> Tag {
        Tag {
            id: id.to_string(),
            name: name.to_string(),
            kind: "app".to_string(),
            binding_count: 0,
        }
    }

    /// `n` workflow apps named "App 0".."App n-1"
    pub fn apps(n: usize) -> Vec<App> {
        (0..n)
            .map(|i| app(&format!("app-{i}"), &format!("App {i}"), AppMode::Workflow))
            .collect()
    }
}
