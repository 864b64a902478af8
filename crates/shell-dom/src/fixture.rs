use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a document fixture.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Browser window dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub width: f64,
    pub height: f64,
}

impl Default for WindowMetrics {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// Declarative element description used to build a [`crate::MemoryDom`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub tag: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    /// Natural content height.
    #[serde(default)]
    pub height: f64,
    /// Fixed width; `None` fills the parent.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Image load state; only meaningful for `img` elements.
    #[serde(default = "default_complete")]
    pub complete: bool,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

fn default_complete() -> bool {
    true
}

impl NodeSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            height: 0.0,
            width: None,
            complete: true,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.styles.insert(property.into(), value.into());
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Mark an image as still loading.
    pub fn pending(mut self) -> Self {
        self.complete = false;
        self
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// A whole page: window, navigation context and body content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFixture {
    #[serde(default)]
    pub window: WindowMetrics,
    #[serde(default)]
    pub referrer: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub body: Vec<NodeSpec>,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl Default for DocumentFixture {
    fn default() -> Self {
        Self {
            window: WindowMetrics::default(),
            referrer: String::new(),
            host: default_host(),
            body: Vec::new(),
        }
    }
}

impl DocumentFixture {
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}
