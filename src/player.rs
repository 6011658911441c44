use crate::audio::{AudioBackend, PlaybackStatus, TrackHandle};
use crate::error::{Error, Result};
use crate::playlist::Playlist;
use log::debug;
use std::path::Path;

/// Transport controller over one playlist and at most one opened track.
///
/// The loaded handle always belongs to the playlist cursor's track and was
/// opened successfully; every other state is `None`. Volume and loop flag
/// are player-level configuration, re-applied to each newly opened handle.
pub struct Player {
    playlist: Playlist,
    backend: Box<dyn AudioBackend>,
    loaded: Option<Box<dyn TrackHandle>>,
    volume: f32,
    looping: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerStatus {
    Idle,
    Loaded {
        playback: PlaybackStatus,
        track: String,
        volume: f32,
        looping: bool,
    },
}

impl Player {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            playlist: Playlist::new(),
            backend,
            loaded: None,
            volume: 100.0,
            looping: false,
        }
    }

    /// Stops and releases any loaded track, then opens the one at `index`.
    ///
    /// The release happens before the open is attempted, so a failed open
    /// always leaves the player idle with the cursor unchanged. Opening the
    /// current index again is a full reopen; volume and loop flag are
    /// re-applied either way.
    pub fn open_track(&mut self, index: usize) -> Result<()> {
        let len = self.playlist.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        if let Some(mut old) = self.loaded.take() {
            old.stop();
        }

        let reference = self.playlist.at(index)?.to_string();
        let mut handle = match self.backend.open(&reference) {
            Ok(handle) => handle,
            Err(err) => {
                return Err(Error::Open {
                    reference,
                    reason: format!("{err:#}"),
                });
            }
        };
        handle.set_volume(self.volume);
        handle.set_looping(self.looping);
        self.playlist.set_cursor(index);
        self.loaded = Some(handle);
        debug!("opened track {index}: {reference}");
        Ok(())
    }

    /// Starts playback, opening the cursor's track first if nothing is
    /// loaded (track 0 when the cursor was never set).
    pub fn play(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            if self.playlist.is_empty() {
                return Err(Error::EmptyPlaylist);
            }
            let index = self.playlist.cursor().unwrap_or(0);
            self.open_track(index)?;
        }
        self.start_loaded()
    }

    pub fn pause(&mut self) {
        if let Some(handle) = self.loaded.as_mut() {
            handle.pause();
        }
    }

    /// Halts playback but keeps the track loaded; the next `play` restarts
    /// it from the beginning.
    pub fn stop(&mut self) {
        if let Some(handle) = self.loaded.as_mut() {
            handle.stop();
        }
    }

    /// Opens and plays the next track, wrapping from the last back to the
    /// first.
    pub fn next(&mut self) -> Result<()> {
        self.step(|cursor, len| (cursor + 1) % len)
    }

    /// Opens and plays the previous track, wrapping from the first back to
    /// the last.
    pub fn previous(&mut self) -> Result<()> {
        self.step(|cursor, len| (cursor + len - 1) % len)
    }

    fn step(&mut self, advance: impl Fn(usize, usize) -> usize) -> Result<()> {
        let len = self.playlist.len();
        if len == 0 {
            return Ok(());
        }
        let target = match self.playlist.cursor() {
            Some(cursor) => advance(cursor, len),
            None => 0,
        };
        self.open_track(target)?;
        self.start_loaded()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 100.0);
        if let Some(handle) = self.loaded.as_mut() {
            handle.set_volume(self.volume);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Flips the loop flag, pushes it to the loaded handle if any, and
    /// returns the new state.
    pub fn toggle_loop(&mut self) -> bool {
        self.set_looping(!self.looping);
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if let Some(handle) = self.loaded.as_mut() {
            handle.set_looping(looping);
        }
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn status(&self) -> PlayerStatus {
        let Some(handle) = self.loaded.as_ref() else {
            return PlayerStatus::Idle;
        };
        let track = self
            .playlist
            .cursor()
            .and_then(|cursor| self.playlist.at(cursor).ok())
            .unwrap_or_default()
            .to_string();
        PlayerStatus::Loaded {
            playback: handle.status(),
            track,
            volume: self.volume,
            looping: self.looping,
        }
    }

    /// Replaces the playlist from a file. The loaded track, if any, keeps
    /// playing; only the list and cursor change.
    pub fn load_playlist(&mut self, path: &Path) -> Result<usize> {
        self.playlist.load_from_file(path)
    }

    pub fn save_playlist(&self, path: &Path) -> Result<()> {
        self.playlist.save_to_file(path)
    }

    pub fn add_track(&mut self, reference: impl Into<String>) {
        self.playlist.add(reference);
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    fn start_loaded(&mut self) -> Result<()> {
        let Some(handle) = self.loaded.as_mut() else {
            return Ok(());
        };
        if let Err(err) = handle.play() {
            let reference = self
                .playlist
                .cursor()
                .and_then(|cursor| self.playlist.at(cursor).ok())
                .unwrap_or_default()
                .to_string();
            self.loaded = None;
            return Err(Error::Open {
                reference,
                reason: format!("{err:#}"),
            });
        }
        Ok(())
    }
}
