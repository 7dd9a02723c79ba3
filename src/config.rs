use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::local::expand_tilde;

/// Settings as they may appear in `config.yaml`. Every field is optional so a
/// partial file can be combined with environment variables and flags.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub screenshot_dir: Option<String>,
    pub copy_to_clipboard: Option<bool>,
    pub open_in_browser: Option<bool>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub screenshot_dir: Option<String>,
    pub no_copy: bool,
    pub open: bool,
}

/// Resolved user preferences, passed explicitly to the client and dispatcher.
#[derive(Debug, Clone)]
pub struct Preferences {
    pub base_url: String,
    pub api_token: String,
    pub screenshot_dir: PathBuf,
    pub copy_to_clipboard: bool,
    pub open_in_browser: bool,
}

/// Default location of the config file, e.g. `~/.config/zipline/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zipline").join("config.yaml"))
}

fn default_screenshot_dir() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read a config file. A missing file yields an empty config.
pub fn load_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Load the given config file, or the default one when no path is given.
pub fn load_config(config_path: Option<&Path>) -> Result<FileConfig> {
    match config_path {
        Some(path) => load_file_config(path),
        None => match default_config_path() {
            Some(path) => load_file_config(&path),
            None => Ok(FileConfig::default()),
        },
    }
}

/// Screenshot directory from an explicit override, the config file, or the
/// desktop directory, in that order.
pub fn resolve_screenshot_dir(file: &FileConfig, dir_override: Option<&str>) -> PathBuf {
    dir_override
        .or(file.screenshot_dir.as_deref())
        .map(expand_tilde)
        .unwrap_or_else(default_screenshot_dir)
}

impl Preferences {
    /// Load the config file (if any) and layer the overrides on top.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        Self::resolve(load_config(config_path)?, overrides)
    }

    /// Merge file settings with overrides. Overrides win.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let screenshot_dir = resolve_screenshot_dir(&file, overrides.screenshot_dir.as_deref());

        let base_url = overrides
            .base_url
            .or(file.base_url)
            .filter(|s| !s.trim().is_empty())
            .context(
                "Zipline base URL not configured\n\n\
                 Set it with --base-url, the ZIPLINE_BASE_URL environment variable,\n\
                 or `base_url:` in the config file:\n  \
                 export ZIPLINE_BASE_URL=https://zipline.example.com",
            )?;

        let api_token = overrides
            .api_token
            .or(file.api_token)
            .filter(|s| !s.trim().is_empty())
            .context(
                "Zipline API token not configured\n\n\
                 Set it with --token, the ZIPLINE_TOKEN environment variable,\n\
                 or `api_token:` in the config file:\n  \
                 export ZIPLINE_TOKEN=your-token-here\n\n\
                 The token is shown on your Zipline user settings page.",
            )?;

        let copy_to_clipboard = !overrides.no_copy && file.copy_to_clipboard.unwrap_or(true);
        let open_in_browser = overrides.open || file.open_in_browser.unwrap_or(false);

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_token: api_token.trim().to_string(),
            screenshot_dir,
            copy_to_clipboard,
            open_in_browser,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn overrides() -> Overrides {
        Overrides {
            base_url: Some("https://zip.example.com/".to_string()),
            api_token: Some("token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let prefs = Preferences::resolve(FileConfig::default(), overrides()).unwrap();
        assert_eq!(prefs.base_url, "https://zip.example.com");
        assert_eq!(prefs.api_token, "token");
        assert!(prefs.copy_to_clipboard);
        assert!(!prefs.open_in_browser);
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = FileConfig {
            base_url: Some("https://file.example.com".to_string()),
            api_token: Some("file-token".to_string()),
            copy_to_clipboard: Some(true),
            open_in_browser: Some(false),
            ..Default::default()
        };
        let mut o = overrides();
        o.no_copy = true;
        o.open = true;

        let prefs = Preferences::resolve(file, o).unwrap();
        assert_eq!(prefs.base_url, "https://zip.example.com");
        assert_eq!(prefs.api_token, "token");
        assert!(!prefs.copy_to_clipboard);
        assert!(prefs.open_in_browser);
    }

    #[test]
    fn test_resolve_keeps_file_screenshot_dir() {
        let file = FileConfig {
            base_url: Some("https://file.example.com".to_string()),
            api_token: Some("file-token".to_string()),
            screenshot_dir: Some("/from/file".to_string()),
            ..Default::default()
        };

        let prefs = Preferences::resolve(file, Overrides::default()).unwrap();
        assert_eq!(prefs.base_url, "https://file.example.com");
        assert_eq!(prefs.api_token, "file-token");
        assert_eq!(prefs.screenshot_dir, PathBuf::from("/from/file"));
    }

    #[test]
    fn test_missing_token() {
        let o = Overrides {
            base_url: Some("https://zip.example.com".to_string()),
            ..Default::default()
        };
        let err = Preferences::resolve(FileConfig::default(), o).unwrap_err();
        assert!(err.to_string().contains("API token not configured"));
    }

    #[test]
    fn test_missing_base_url() {
        let o = Overrides {
            api_token: Some("token".to_string()),
            ..Default::default()
        };
        let err = Preferences::resolve(FileConfig::default(), o).unwrap_err();
        assert!(err.to_string().contains("base URL not configured"));
    }

    #[test]
    fn test_load_file_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url: https://yaml.example.com\napi_token: yaml-token\ncopy_to_clipboard: false\nscreenshot_dir: /tmp/shots"
        )
        .unwrap();

        let prefs = Preferences::load(Some(file.path()), Overrides::default()).unwrap();
        assert_eq!(prefs.base_url, "https://yaml.example.com");
        assert_eq!(prefs.api_token, "yaml-token");
        assert!(!prefs.copy_to_clipboard);
        assert_eq!(prefs.screenshot_dir, PathBuf::from("/tmp/shots"));
    }

    #[test]
    fn test_resolve_screenshot_dir() {
        let file = FileConfig {
            screenshot_dir: Some("/from/file".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_screenshot_dir(&file, Some("/from/flag")),
            PathBuf::from("/from/flag")
        );
        assert_eq!(resolve_screenshot_dir(&file, None), PathBuf::from("/from/file"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_file_config(&dir.path().join("nope.yaml")).unwrap();
        assert!(config.base_url.is_none());
    }
}
