//! Process-wide UI state: screen lock, file selection and theme

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::store::Store;

/// Whether the dashboard controls are locked against accidental input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    #[default]
    Unlocked,
    Locked,
}

impl LockState {
    pub fn is_locked(self) -> bool {
        self == LockState::Locked
    }

    pub fn toggled(self) -> Self {
        match self {
            LockState::Unlocked => LockState::Locked,
            LockState::Locked => LockState::Unlocked,
        }
    }
}

/// Colour scheme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Files picked in the file manager, in selection order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelection {
    paths: Vec<PathBuf>,
}

impl FileSelection {
    /// Select `path` if it is not selected, deselect it otherwise.
    /// Returns whether the path is selected afterwards.
    pub fn toggle(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if let Some(index) = self.paths.iter().position(|p| *p == path) {
            self.paths.remove(index);
            false
        } else {
            self.paths.push(path);
            true
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Independent stores shared by every view
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub lock: Store<LockState>,
    pub selection: Store<FileSelection>,
    pub theme: Store<Theme>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_lock(&self) {
        self.lock.update(|lock| *lock = lock.toggled());
    }

    pub fn toggle_theme(&self) {
        self.theme.update(|theme| *theme = theme.toggled());
    }

    pub fn toggle_file(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.selection.update(move |selection| {
            selection.toggle(path);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn defaults() {
        let state = UiState::new();
        assert_eq!(state.lock.get(), LockState::Unlocked);
        assert_eq!(state.theme.get(), Theme::Dark);
        assert!(state.selection.get().is_empty());
    }

    #[test]
    fn toggles_flip_values() {
        let state = UiState::new();
        state.toggle_lock();
        assert!(state.lock.get().is_locked());
        state.toggle_lock();
        assert!(!state.lock.get().is_locked());

        state.toggle_theme();
        assert_eq!(state.theme.get(), Theme::Light);
    }

    #[test]
    fn file_selection_toggle_keeps_order_without_duplicates() {
        let mut selection = FileSelection::default();
        assert!(selection.toggle("/data/dark_001.fits"));
        assert!(selection.toggle("/data/dark_002.fits"));
        assert!(!selection.toggle("/data/dark_001.fits"));
        assert!(selection.toggle("/data/dark_001.fits"));

        assert_eq!(
            selection.paths(),
            &[
                PathBuf::from("/data/dark_002.fits"),
                PathBuf::from("/data/dark_001.fits")
            ]
        );
        assert!(selection.contains(Path::new("/data/dark_002.fits")));
        selection.clear();
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn stores_notify_independently() {
        let state = UiState::new();
        let theme_changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&theme_changes);
        state
            .theme
            .subscribe(move |theme| sink.lock().unwrap().push(*theme));

        state.toggle_lock();
        state.toggle_file("/data/light_001.fits");
        state.toggle_theme();

        assert_eq!(*theme_changes.lock().unwrap(), vec![Theme::Light]);
        assert_eq!(state.selection.get().len(), 1);
    }
}
