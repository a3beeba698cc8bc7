use crate::core::session::Profile;
use crate::error::SetupError;
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// ProfileStore keeps all profiles in one JSON file that maps the profile name to its car and
/// money. A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    pub fn open(path: &Path) -> anyhow::Result<ProfileStore> {
        let profiles: BTreeMap<String, Profile> = if path.is_file() {
            let fh = OpenOptions::new()
                .read(true)
                .open(path)
                .context(format!("Failed to open profile file {}!", path.display()))?;
            serde_json::from_reader(&fh)
                .context(format!("Failed to parse profile file {}!", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(ProfileStore {
            path: path.to_owned(),
            profiles,
        })
    }

    /// list returns the names of all stored profiles in alphabetical order.
    pub fn list(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn load(&self, name: &str) -> Result<Profile, SetupError> {
        self.profiles
            .get(name)
            .cloned()
            .ok_or_else(|| SetupError::UnknownProfile(name.to_owned()))
    }

    /// create adds a new profile with the default car and no money and writes the store.
    pub fn create(&mut self, name: &str) -> anyhow::Result<Profile> {
        if self.profiles.contains_key(name) {
            return Err(SetupError::DuplicateProfile(name.to_owned()).into());
        }
        let profile = Profile::new(name);
        self.save(&profile)?;
        Ok(profile)
    }

    /// save inserts or replaces the profile and writes the whole store to disk.
    pub fn save(&mut self, profile: &Profile) -> anyhow::Result<()> {
        self.profiles
            .insert(profile.name.to_owned(), profile.to_owned());

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .context(format!("Failed to create profile directory {}!", dir.display()))?;
        }
        let fh = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .context(format!("Failed to open profile file {}!", self.path.display()))?;
        serde_json::to_writer_pretty(&fh, &self.profiles)
            .context(format!("Failed to write profile file {}!", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        let mut store = ProfileStore::open(&path).unwrap();
        assert!(store.list().is_empty());

        let mut profile = store.create("zoe").unwrap();
        store.create("adam").unwrap();
        profile.money = 750;
        profile.car.engine = "turbo".to_owned();
        store.save(&profile).unwrap();

        let store = ProfileStore::open(&path).unwrap();
        assert_eq!(store.list(), vec!["adam", "zoe"]);
        assert_eq!(store.load("zoe").unwrap(), profile);
        assert_eq!(store.load("adam").unwrap().money, 0);
    }

    #[test]
    fn unknown_and_duplicate_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::open(&dir.path().join("p.json")).unwrap();
        store.create("zoe").unwrap();

        assert!(matches!(
            store.load("nobody"),
            Err(SetupError::UnknownProfile(_))
        ));
        let err = store.create("zoe").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::DuplicateProfile(_))
        ));
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = ProfileStore::open(&path).unwrap_err();
        assert!(format!("{}", err).starts_with("Failed to parse profile file"));
    }
}
