//! Word list used to reject profane pet names.
//!
//! The list is a plain text file, one word per line. It is re-read whenever
//! its modification time changes, so operators can edit it without a reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

pub struct Denylist {
    state: Mutex<DenylistState>,
}

struct DenylistState {
    path: PathBuf,
    words: Vec<String>,
    mtime: Option<SystemTime>,
}

impl Denylist {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Denylist {
            state: Mutex::new(DenylistState {
                path: path.into(),
                words: Vec::new(),
                mtime: None,
            }),
        }
    }

    /// Points the list at another file. The new file is read on next use.
    pub fn set_path(&self, path: impl Into<PathBuf>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let path = path.into();
        if state.path != path {
            state.path = path;
            state.words.clear();
            state.mtime = None;
        }
    }

    /// Whether `name` contains any listed word, ignoring case.
    ///
    /// A missing or unreadable file means nothing is filtered.
    pub fn is_profane(&self, name: &str) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.refresh();

        let lower = name.to_lowercase();
        state.words.iter().any(|word| lower.contains(word.as_str()))
    }

    pub fn len(&self) -> usize {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.refresh();
        state.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DenylistState {
    fn refresh(&mut self) {
        let Some(mtime) = modified(&self.path) else {
            if self.mtime.take().is_some() {
                log::warn!(
                    "Beastmaster: {} disappeared, profanity filter is now empty",
                    self.path.display()
                );
            }
            self.words.clear();
            return;
        };
        if self.mtime == Some(mtime) {
            return;
        }

        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                log::warn!(
                    "Beastmaster: Could not open {}, skipping profanity filter: {e}",
                    self.path.display()
                );
                self.words.clear();
                self.mtime = None;
                return;
            }
        };

        self.words = data
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        self.mtime = Some(mtime);
        log::info!(
            "Beastmaster: Loaded {} profane words from {}",
            self.words.len(),
            self.path.display()
        );
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;

    fn write_list(path: &Path, words: &str, mtime: SystemTime) {
        let mut file = File::create(path).unwrap();
        file.write_all(words.as_bytes()).unwrap();
        file.set_modified(mtime).unwrap();
    }

    #[test]
    fn missing_file_filters_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let list = Denylist::new(dir.path().join("absent.txt"));
        assert!(!list.is_profane("Darn"));
        assert!(list.is_empty());
    }

    #[test]
    fn matches_substrings_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profanity.txt");
        write_list(&path, "darn\n\n  HECK \n", SystemTime::UNIX_EPOCH + Duration::from_secs(1000));

        let list = Denylist::new(path.clone());
        assert_eq!(list.len(), 2);
        assert!(list.is_profane("Darnell"));
        assert!(list.is_profane("Oheckno"));
        assert!(!list.is_profane("Fang"));
    }

    #[test]
    fn reloads_when_modified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profanity.txt");
        write_list(&path, "darn\n", SystemTime::UNIX_EPOCH + Duration::from_secs(1000));

        let list = Denylist::new(path.clone());
        assert!(list.is_profane("Darn"));
        assert!(!list.is_profane("Fang"));

        write_list(&path, "fang\n", SystemTime::UNIX_EPOCH + Duration::from_secs(2000));
        assert!(!list.is_profane("Darn"));
        assert!(list.is_profane("Fang"));
    }

    #[test]
    fn switching_path_drops_old_words() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.txt");
        write_list(&first, "darn\n", SystemTime::UNIX_EPOCH + Duration::from_secs(1000));

        let list = Denylist::new(first.clone());
        assert!(list.is_profane("Darn"));
        list.set_path(dir.path().join("missing.txt"));
        assert!(!list.is_profane("Darn"));
    }

    #[test]
    fn deleted_file_clears_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profanity.txt");
        write_list(&path, "darn
", SystemTime::UNIX_EPOCH + Duration::from_secs(1000));

        let list = Denylist::new(path.clone());
        assert!(list.is_profane("Darn"));

        fs::remove_file(&path).unwrap();
        assert!(!list.is_profane("Darn"));
        assert!(list.is_empty());

        write_list(&path, "darn
", SystemTime::UNIX_EPOCH + Duration::from_secs(1000));
        assert!(list.is_profane("Darn"));
    }
}
