//! App shell configuration system
//!
//! This crate provides the configuration object the page controllers are built
//! from: the selectors they resolve against the document, the styling feature
//! flags, and the timing/layout constants. Settings can be loaded from
//! `appshell.toml`; every field has a default matching the stock templates.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "appshell.toml";

/// Upper bound for `handoff.delay_ms`.
pub const MAX_HANDOFF_DELAY_MS: u64 = 60_000;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`ShellConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed fine but is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Main configuration structure for the app shell
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    /// Selectors resolved against the live document at initialize time
    pub selectors: SelectorConfig,
    /// Styling policy switches
    pub features: FeatureFlags,
    /// Side navigation panel settings
    pub navigation: NavigationConfig,
    /// Entry transition settings
    pub entry: EntryConfig,
    /// App library grid settings
    pub library: LibraryConfig,
    /// Tile activation hand-off settings
    pub handoff: HandoffConfig,
    /// Demo runner settings
    pub demo: DemoConfig,
}

/// Selector constants for every region the controllers touch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectorConfig {
    /// Wrapper carrying the panel state marker and the height override
    pub wrapper: String,
    /// Toggle affordance for the side panel
    pub toggle_nav: String,
    /// Navigation region; its absence disables the panel
    pub app_navigation: String,
    /// Header region of an app page
    pub app_header: String,
    /// Content region of an app page (measured for viewport fit)
    pub app_content: String,
    /// Container holding the library tiles
    pub tile_container: String,
    /// Selector for a single tile, scoped to the container
    pub tile_item: String,
    /// Header regions of the library page that slide away on hand-off
    pub library_headers: Vec<String>,
    /// Full-screen overlay shown during hand-off
    pub curtain: String,
}

/// Styling policy switches. The stock templates disagree on these, so each
/// one is a flag rather than a fixed behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeatureFlags {
    /// Wire the navigation panel and viewport height controllers
    pub navigation_shell: bool,
    /// Wire the app library tile grid controller
    pub app_library: bool,
    /// Entry transition touches the header region
    pub header_transition: bool,
    /// Entry transition also touches the content region
    pub content_transition: bool,
    /// Toggling also resizes the toggle affordance
    pub toggle_width_animation: bool,
}

/// Toggle affordance geometry for each panel state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    pub open_toggle_width: String,
    pub open_toggle_margin: String,
    pub closed_toggle_width: String,
    pub closed_toggle_margin: String,
}

/// Entry transition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntryConfig {
    /// Path of the app library page; arriving from it enables the entry transition
    pub library_path: String,
}

/// App library grid configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Fixed column width handed to the layout engine, in pixels
    pub column_width: f64,
    /// Horizontal gap between columns, in pixels
    pub gutter: f64,
    /// Tile attribute holding the destination URL
    pub url_attribute: String,
}

/// Tile activation hand-off configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HandoffConfig {
    /// Delay between activation and navigation, in milliseconds
    pub delay_ms: u64,
    /// Stacking order given to the activated tile
    pub tile_z_index: i32,
    /// `margin-top` applied to library headers so they slide out
    pub header_exit_margin: String,
}

/// Demo runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DemoConfig {
    /// JSON document fixture to load instead of the built-in sample page
    pub fixture: Option<PathBuf>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            wrapper: "#app-content-wrapper".to_string(),
            toggle_nav: ".toggle-nav".to_string(),
            app_navigation: "#app-navigation".to_string(),
            app_header: ".tethys-app-header".to_string(),
            app_content: "#app-content".to_string(),
            tile_container: "#app-list".to_string(),
            tile_item: ".app-container".to_string(),
            library_headers: vec![".header-wrapper".to_string(), "#app-library-header".to_string()],
            curtain: "#app-curtain".to_string(),
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            navigation_shell: true,
            app_library: true,
            header_transition: true,
            content_transition: true,
            toggle_width_animation: true,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            open_toggle_width: "15px".to_string(),
            open_toggle_margin: "5px".to_string(),
            closed_toggle_width: "20px".to_string(),
            closed_toggle_margin: "0".to_string(),
        }
    }
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            library_path: "/apps/".to_string(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            column_width: 240.0,
            gutter: 0.0,
            url_attribute: "href".to_string(),
        }
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            delay_ms: 800,
            tile_z_index: 100,
            header_exit_margin: "-100px".to_string(),
        }
    }
}

impl ShellConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the appshell.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location (appshell.toml in the current
    /// directory) or return default configuration if the file is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Check numeric ranges and path shapes that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.library.column_width.is_finite() || self.library.column_width <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "library.column_width",
                reason: format!("must be a positive number, got {}", self.library.column_width),
            });
        }
        if !self.library.gutter.is_finite() || self.library.gutter < 0.0 {
            return Err(ConfigError::Invalid {
                field: "library.gutter",
                reason: format!("must be zero or positive, got {}", self.library.gutter),
            });
        }
        if self.handoff.delay_ms > MAX_HANDOFF_DELAY_MS {
            return Err(ConfigError::Invalid {
                field: "handoff.delay_ms",
                reason: format!(
                    "must be at most {MAX_HANDOFF_DELAY_MS}, got {}",
                    self.handoff.delay_ms
                ),
            });
        }
        if !self.entry.library_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                field: "entry.library_path",
                reason: format!("must be an absolute path, got {:?}", self.entry.library_path),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.entry.library_path, "/apps/");
        assert_eq!(config.library.column_width, 240.0);
        assert_eq!(config.handoff.delay_ms, 800);
        assert!(config.features.toggle_width_animation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = ShellConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ShellConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed = ShellConfig::from_toml_str(
            r#"
            [features]
            content_transition = false

            [library]
            column_width = 180.0
            "#,
        )
        .unwrap();
        assert!(!parsed.features.content_transition);
        assert!(parsed.features.header_transition);
        assert_eq!(parsed.library.column_width, 180.0);
        assert_eq!(parsed.selectors.tile_item, ".app-container");
    }

    #[test]
    fn test_rejects_non_positive_column_width() {
        let err = ShellConfig::from_toml_str("[library]\ncolumn_width = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "library.column_width",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unbounded_handoff_delay() {
        let err = ShellConfig::from_toml_str(&format!("[handoff]\ndelay_ms = {}\n", i64::MAX))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "handoff.delay_ms", .. }));

        let at_limit = format!("[handoff]\ndelay_ms = {MAX_HANDOFF_DELAY_MS}\n");
        assert!(ShellConfig::from_toml_str(&at_limit).is_ok());
    }

    #[test]
    fn test_rejects_relative_library_path() {
        let err = ShellConfig::from_toml_str("[entry]\nlibrary_path = \"apps/\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "entry.library_path", .. }));
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if appshell.toml doesn't exist
        let config = ShellConfig::load_or_default();
        assert!(config.validate().is_ok());
    }
}
