use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::fs;

pub const CONFIG_FILE: &str = "config.json";

const FKEY_PLACEHOLDER: &str = "YOUR_FKEY_HERE";
const COOKIE_PLACEHOLDER: &str = "YOUR_SESSION_COOKIE_HERE";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SiteCredentials {
    // Anti-forgery token from the moderator's logged-in session
    pub fkey: String,
    // Raw `Cookie` header value for the same session
    pub cookie: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    // Map of site host -> session credentials
    pub sites: HashMap<String, SiteCredentials>,
    // Per-request timeout; absent means requests may wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        let mut sites = HashMap::new();
        sites.insert(
            "stackoverflow.com".to_string(),
            SiteCredentials {
                fkey: FKEY_PLACEHOLDER.to_string(),
                cookie: COOKIE_PLACEHOLDER.to_string(),
            },
        );
        Config {
            sites,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads the configuration from `path`. If the file doesn't exist,
    /// it creates a default one and asks the moderator to fill it.
    pub async fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        if !path.exists() {
            Config::default().save(path).await?;

            eprintln!(
                "Created default {}. Please fill in your session fkey and cookie.",
                path.display()
            );
            return Err("Configuration file created. Please update it and restart.".into());
        }

        let content = fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;

        if config.sites.is_empty() {
            return Err(format!("No sites configured in {}.", path.display()).into());
        }

        if let Some((host, _)) = config.sites.iter().find(|(_, c)| c.is_placeholder()) {
            return Err(format!(
                "Please replace the placeholder credentials for {} in {} with your session values.",
                host,
                path.display()
            )
            .into());
        }

        Ok(config)
    }

    /// Saves the current configuration state to `path`.
    pub async fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Finds credentials for a page host. An exact match wins, otherwise a
    /// configured site the host is a sub-domain of.
    pub fn credentials_for(&self, host: &str) -> Option<&SiteCredentials> {
        let host = host.to_ascii_lowercase();
        if let Some(credentials) = self.sites.get(&host) {
            return Some(credentials);
        }
        self.sites
            .iter()
            .filter(|(site, _)| host.ends_with(&format!(".{}", site.to_ascii_lowercase())))
            .max_by_key(|(site, _)| site.len())
            .map(|(_, credentials)| credentials)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl SiteCredentials {
    fn is_placeholder(&self) -> bool {
        self.fkey == FKEY_PLACEHOLDER || self.cookie == COOKIE_PLACEHOLDER
    }
}
