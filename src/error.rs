use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("playlist file {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("track index {index} out of range (playlist has {len} tracks)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to open track {reference}: {reason}")]
    Open { reference: String, reason: String },

    #[error("no tracks in playlist")]
    EmptyPlaylist,
}

pub type Result<T> = std::result::Result<T, Error>;
