use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Ordered list of track references with a movable cursor.
///
/// References are opaque strings, usually file paths. Duplicates are allowed
/// and insertion order is playlist order. The cursor is `None` until a track
/// has been selected and always stays inside the list once set.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<String>,
    cursor: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the playlist with the contents of a line-oriented file.
    ///
    /// Empty lines are skipped, everything else is taken verbatim. The
    /// replacement is all-or-nothing: a read failure leaves the current
    /// tracks and cursor untouched. Returns the number of tracks loaded.
    pub fn load_from_file(&mut self, path: &Path) -> Result<usize> {
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let tracks: Vec<String> = raw
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        self.cursor = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
        Ok(self.tracks.len())
    }

    /// Writes every reference, one per line, in current order.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let mut contents = String::new();
        for track in &self.tracks {
            contents.push_str(track);
            contents.push('\n');
        }
        fs::write(path, contents).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Appends a reference. The first track added to an empty playlist
    /// becomes the current one.
    pub fn add(&mut self, reference: impl Into<String>) {
        self.tracks.push(reference.into());
        if self.cursor.is_none() {
            self.cursor = Some(0);
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn at(&self, index: usize) -> Result<&str> {
        self.tracks
            .get(index)
            .map(String::as_str)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.tracks.len(),
            })
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(String::as_str)
    }

    // Only called after the index has been validated against the list.
    pub(crate) fn set_cursor(&mut self, index: usize) {
        debug_assert!(index < self.tracks.len());
        self.cursor = Some(index);
    }
}
