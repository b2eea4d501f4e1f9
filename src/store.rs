use crate::error::*;
use crate::types::*;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/// Persistence boundary for the site collection and settings. Loads return
/// defaults when nothing has been saved yet; saves replace the whole
/// document.
pub trait SiteStore {
    fn load_sites(&self) -> Result<Vec<Site>>;
    fn save_sites(&self, sites: &[Site]) -> Result<()>;
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&self, settings: &Settings) -> Result<()>;
}

pub struct LocalFsStore {
    root: PathBuf,
}

impl LocalFsStore {
    pub fn new() -> Result<Self> {
        let proj = ProjectDirs::from("io", "sitewatch", "sitewatch")
            .ok_or_else(|| MonitorError::Storage("could not resolve data dir".into()))?;
        let root = proj.data_local_dir().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Store rooted at an explicit directory instead of the platform data
    /// dir. The directory is created if missing.
    pub fn with_root(root: PathBuf) -> Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn sites_path(&self) -> PathBuf {
        self.root.join("sites.json")
    }

    fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }
}

impl SiteStore for LocalFsStore {
    fn load_sites(&self) -> Result<Vec<Site>> {
        let p = self.sites_path();
        if !p.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&p)?;
        // A corrupt document yields an empty collection rather than an
        // error, so a damaged file never locks the tool out.
        Ok(serde_json::from_reader(file).unwrap_or_default())
    }

    fn save_sites(&self, sites: &[Site]) -> Result<()> {
        let file = fs::File::create(self.sites_path())?;
        serde_json::to_writer_pretty(file, sites)?;
        Ok(())
    }

    fn load_settings(&self) -> Result<Settings> {
        let p = self.settings_path();
        if !p.exists() {
            return Ok(Settings::default());
        }
        let file = fs::File::open(&p)?;
        Ok(serde_json::from_reader(file).unwrap_or_default())
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let file = fs::File::create(self.settings_path())?;
        serde_json::to_writer_pretty(file, settings)?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::new_site;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "sitewatch-store-{tag}-{}-{}",
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[test]
    fn empty_store_loads_defaults() {
        let root = temp_root("defaults");
        let store = LocalFsStore::with_root(root.clone()).unwrap();
        assert!(store.load_sites().unwrap().is_empty());
        assert_eq!(store.load_settings().unwrap(), Settings::default());
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn sites_round_trip() {
        let root = temp_root("sites");
        let store = LocalFsStore::with_root(root.clone()).unwrap();
        let sites = vec![new_site(
            "https://example.com/",
            Some("Example"),
            vec!["prod".into()],
            String::new(),
        )];
        store.save_sites(&sites).unwrap();
        let loaded = store.load_sites().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].url, "https://example.com/");
        assert_eq!(loaded[0].name, "Example");
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn settings_round_trip() {
        let root = temp_root("settings");
        let store = LocalFsStore::with_root(root.clone()).unwrap();
        let mut settings = Settings::default();
        settings.check_interval_ms = 60_000;
        settings.notifications.slow_response = true;
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings().unwrap(), settings);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn corrupt_sites_file_yields_empty_collection() {
        let root = temp_root("corrupt");
        let store = LocalFsStore::with_root(root.clone()).unwrap();
        fs::write(root.join("sites.json"), "{not json").unwrap();
        assert!(store.load_sites().unwrap().is_empty());
        let _ = fs::remove_dir_all(root);
    }
}
