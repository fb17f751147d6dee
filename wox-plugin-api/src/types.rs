//! Plugin metadata and query types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The trigger keyword that makes a plugin answer keyword-less queries
pub const GLOBAL_TRIGGER_KEYWORD: &str = "*";

/// Plugin metadata, as declared in a plugin's `plugin.json`
///
/// Immutable once parsed. The core shares one `Arc<Metadata>` between the
/// instance, its host and every query result it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub min_wox_version: String,
    pub runtime: Runtime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub website: String,
    /// Entry point, relative to the plugin directory (unused by in-process plugins)
    #[serde(default)]
    pub entry: String,
    #[serde(default)]
    pub trigger_keywords: Vec<String>,
    #[serde(default)]
    pub commands: Vec<MetadataCommand>,
    #[serde(default, rename = "SupportedOS")]
    pub supported_os: Vec<String>,
}

impl Metadata {
    /// Minimal metadata for a plugin; remaining fields are empty
    pub fn new(id: impl Into<String>, name: impl Into<String>, runtime: Runtime) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author: String::new(),
            version: String::new(),
            min_wox_version: String::new(),
            runtime,
            description: String::new(),
            icon: String::new(),
            website: String::new(),
            entry: String::new(),
            trigger_keywords: Vec::new(),
            commands: Vec::new(),
            supported_os: Vec::new(),
        }
    }

    /// Builder: set declared trigger keywords
    pub fn with_trigger_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the website
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = website.into();
        self
    }

    /// Whether the plugin declares `keyword` as one of its trigger keywords
    pub fn declares_trigger_keyword(&self, keyword: &str) -> bool {
        self.trigger_keywords.iter().any(|k| k == keyword)
    }
}

/// A sub-command a plugin advertises (e.g. `wpm install`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataCommand {
    pub command: String,
    #[serde(default)]
    pub description: String,
}

/// The runtime a plugin's code executes under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Runtime {
    Dotnet,
    Nodejs,
    Python,
    Go,
}

/// Broad family of host a [`Runtime`] needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    /// A managed-runtime host process
    Managed,
    /// A script-runtime host process
    Script,
    /// Compiled into the launcher itself
    InProcess,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Runtime::Dotnet => "Dotnet",
            Runtime::Nodejs => "Nodejs",
            Runtime::Python => "Python",
            Runtime::Go => "Go",
        }
    }

    pub fn kind(&self) -> RuntimeKind {
        match self {
            Runtime::Dotnet => RuntimeKind::Managed,
            Runtime::Nodejs | Runtime::Python => RuntimeKind::Script,
            Runtime::Go => RuntimeKind::InProcess,
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Runtime {
    type Err = String;

    /// Runtime tags are matched case-insensitively (`DOTNET`, `dotnet`, `Dotnet`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dotnet" => Ok(Runtime::Dotnet),
            "nodejs" => Ok(Runtime::Nodejs),
            "python" => Ok(Runtime::Python),
            "go" => Ok(Runtime::Go),
            other => Err(format!("unsupported runtime: {other}")),
        }
    }
}

impl TryFrom<String> for Runtime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Runtime> for String {
    fn from(runtime: Runtime) -> Self {
        runtime.as_str().to_string()
    }
}

/// A user query, already split into trigger keyword and search term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Keyword selecting which plugins should answer; `None` for a global query
    pub trigger_keyword: Option<String>,
    /// Remaining free-text search term
    pub search: String,
}

impl Query {
    /// A query aimed at plugins that declare `trigger_keyword`
    pub fn new(trigger_keyword: impl Into<String>, search: impl Into<String>) -> Self {
        let trigger_keyword = trigger_keyword.into();
        Self {
            trigger_keyword: (!trigger_keyword.is_empty()).then_some(trigger_keyword),
            search: search.into(),
        }
    }

    /// A keyword-less query, answered by global plugins
    pub fn global(search: impl Into<String>) -> Self {
        Self {
            trigger_keyword: None,
            search: search.into(),
        }
    }

    /// The trigger keyword, or `""` when there is none
    pub fn trigger_keyword(&self) -> &str {
        self.trigger_keyword.as_deref().unwrap_or_default()
    }

    pub fn is_global(&self) -> bool {
        self.trigger_keyword().is_empty()
    }

    /// The query as the user typed it
    pub fn raw_query(&self) -> String {
        if self.is_global() {
            self.search.clone()
        } else {
            format!("{} {}", self.trigger_keyword(), self.search)
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_query())
    }
}
