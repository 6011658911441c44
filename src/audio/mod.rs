use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Paused,
    Playing,
}

impl PlaybackStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Paused => "Paused",
            Self::Playing => "Playing",
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One opened track. Exactly one handle exists at a time; the player drops
/// the old one before opening a replacement.
pub trait TrackHandle {
    /// Starts or resumes playback. A stopped or finished track restarts
    /// from the beginning.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn stop(&mut self);
    /// Volume in the 0..100 range; the caller clamps.
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, looping: bool);
    fn status(&self) -> PlaybackStatus;
}

/// Opens track references into handles.
pub trait AudioBackend {
    fn open(&mut self, reference: &str) -> Result<Box<dyn TrackHandle>>;
}

pub struct RodioBackend {
    stream: OutputStream,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let builder = OutputStreamBuilder::from_default_device()
            .context("failed to open default system output device")?;
        let mut stream = builder
            .with_error_callback(|_| {})
            .open_stream_or_fallback()
            .context("failed to start default output stream")?;
        stream.log_on_drop(false);
        Ok(Self { stream })
    }
}

impl AudioBackend for RodioBackend {
    fn open(&mut self, reference: &str) -> Result<Box<dyn TrackHandle>> {
        let path = Path::new(reference);
        // Probe the reference now so open failures surface here; the real
        // source is decoded at each (re)start.
        let file =
            File::open(path).with_context(|| format!("failed to open track {}", path.display()))?;
        Decoder::try_from(file)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        let sink = Sink::connect_new(self.stream.mixer());
        Ok(Box::new(RodioTrack {
            path: path.to_path_buf(),
            sink,
            looping: false,
        }))
    }
}

pub struct RodioTrack {
    path: PathBuf,
    sink: Sink,
    looping: bool,
}

fn append_decoded(sink: &Sink, path: &Path, looping: bool) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("failed to open track {}", path.display()))?;
    let source = Decoder::try_from(file)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    if looping {
        sink.append(source.repeat_infinite());
    } else {
        sink.append(source);
    }
    Ok(())
}

impl TrackHandle for RodioTrack {
    fn play(&mut self) -> Result<()> {
        // An empty sink means never started, stopped, or played to the end;
        // all three restart from the beginning.
        if self.sink.empty() {
            append_decoded(&self.sink, &self.path, self.looping)?;
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume / 100.0);
    }

    fn set_looping(&mut self, looping: bool) {
        // Applies when a source is next appended; a toggle mid-play takes
        // effect on the next restart or reopen.
        self.looping = looping;
    }

    fn status(&self) -> PlaybackStatus {
        if self.sink.empty() {
            PlaybackStatus::Stopped
        } else if self.sink.is_paused() {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        }
    }
}

/// Device-free backend used when no audio output can be opened and by the
/// test suites. Handles track status, volume and loop flag in memory.
#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for NullBackend {
    fn open(&mut self, reference: &str) -> Result<Box<dyn TrackHandle>> {
        Ok(Box::new(NullTrack::new(reference)))
    }
}

#[derive(Debug)]
pub struct NullTrack {
    reference: String,
    status: PlaybackStatus,
    volume: f32,
    looping: bool,
}

impl NullTrack {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            status: PlaybackStatus::Stopped,
            volume: 100.0,
            looping: false,
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn looping(&self) -> bool {
        self.looping
    }
}

impl TrackHandle for NullTrack {
    fn play(&mut self) -> Result<()> {
        self.status = PlaybackStatus::Playing;
        Ok(())
    }

    fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
    }

    fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn status(&self) -> PlaybackStatus {
        self.status
    }
}
