//! Loader targets and the external navigation policy.
//!
//! The presentation loader itself is an external collaborator; the host
//! only decides *what* to load - a live development endpoint or the
//! packaged document, with an optional navigation hint - and where
//! outbound links are allowed to go.

use std::path::PathBuf;

use tracing::{debug, warn};

use sill_core::config::HostConfig;

/// What a window loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderTarget {
    /// Live development endpoint. The hint rides along as a fragment.
    DevServer { url: String, hint: Option<String> },
    /// Packaged document on disk.
    Packaged {
        document: PathBuf,
        hint: Option<String>,
    },
}

impl LoaderTarget {
    /// One-line description for logs.
    pub fn describe(&self) -> String {
        match self {
            LoaderTarget::DevServer { url, hint: None } => url.clone(),
            LoaderTarget::DevServer {
                url,
                hint: Some(hint),
            } => format!("{}#{}", url, hint),
            LoaderTarget::Packaged {
                document,
                hint: None,
            } => document.display().to_string(),
            LoaderTarget::Packaged {
                document,
                hint: Some(hint),
            } => format!("{}#{}", document.display(), hint),
        }
    }
}

/// Resolves loader targets from the host's mode.
#[derive(Debug, Clone)]
pub struct LoaderSettings {
    dev_server_url: Option<String>,
    packaged_document: PathBuf,
}

impl LoaderSettings {
    pub fn new(dev_server_url: Option<String>, packaged_document: PathBuf) -> Self {
        Self {
            dev_server_url,
            packaged_document,
        }
    }

    pub fn from_config(config: &HostConfig) -> Self {
        Self::new(config.dev_server_url.clone(), config.packaged_document())
    }

    /// Target for a window. Presence of the dev endpoint selects dev mode.
    pub fn target(&self, hint: Option<&str>) -> LoaderTarget {
        let hint = hint.filter(|h| !h.is_empty()).map(str::to_string);
        match &self.dev_server_url {
            Some(url) => LoaderTarget::DevServer {
                url: url.clone(),
                hint,
            },
            None => LoaderTarget::Packaged {
                document: self.packaged_document.clone(),
                hint,
            },
        }
    }
}

/// What the host does with an external navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDisposition {
    /// Hand the link to the OS's default external handler.
    OpenExternal,
    /// The in-app window never navigates to it.
    Deny,
}

/// Secure-scheme links go to the OS; everything else is denied.
pub fn route_navigation(url: &str) -> NavigationDisposition {
    if url.starts_with("https:") {
        NavigationDisposition::OpenExternal
    } else {
        NavigationDisposition::Deny
    }
}

/// Open a link with the OS's default external handler, best effort.
pub fn open_external(url: &str) {
    #[cfg(target_os = "macos")]
    let spawned = std::process::Command::new("open").arg(url).spawn();

    #[cfg(target_os = "windows")]
    let spawned = std::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .spawn();

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let spawned = std::process::Command::new("xdg-open").arg(url).spawn();

    match spawned {
        Ok(_) => debug!(event = "host.loader.external_opened", url = url),
        Err(e) => warn!(event = "host.loader.external_open_failed", url = url, error = %e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_server_presence_selects_dev_mode() {
        let settings = LoaderSettings::new(
            Some("http://localhost:5173".to_string()),
            PathBuf::from("/app/dist/index.html"),
        );
        assert_eq!(
            settings.target(None),
            LoaderTarget::DevServer {
                url: "http://localhost:5173".to_string(),
                hint: None,
            }
        );
    }

    #[test]
    fn test_packaged_mode_with_hint() {
        let settings = LoaderSettings::new(None, PathBuf::from("/app/dist/index.html"));
        assert_eq!(
            settings.target(Some("settings")),
            LoaderTarget::Packaged {
                document: PathBuf::from("/app/dist/index.html"),
                hint: Some("settings".to_string()),
            }
        );
    }

    #[test]
    fn test_empty_hint_is_dropped() {
        let settings = LoaderSettings::new(None, PathBuf::from("/app/dist/index.html"));
        assert_eq!(
            settings.target(Some("")),
            LoaderTarget::Packaged {
                document: PathBuf::from("/app/dist/index.html"),
                hint: None,
            }
        );
    }

    #[test]
    fn test_describe_appends_hint_as_fragment() {
        let target = LoaderTarget::DevServer {
            url: "http://localhost:5173".to_string(),
            hint: Some("about".to_string()),
        };
        assert_eq!(target.describe(), "http://localhost:5173#about");
    }

    #[test]
    fn test_route_navigation_policy() {
        assert_eq!(
            route_navigation("https://example.com"),
            NavigationDisposition::OpenExternal
        );
        assert_eq!(
            route_navigation("http://example.com"),
            NavigationDisposition::Deny
        );
        assert_eq!(
            route_navigation("file:///etc/passwd"),
            NavigationDisposition::Deny
        );
        assert_eq!(route_navigation(""), NavigationDisposition::Deny);
    }
}
