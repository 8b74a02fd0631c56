use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while opening an MP3 stream.
///
/// Only construction reports errors. Once a reader exists, steady-state
/// problems (sync loss, codec failure, a read error mid-stream) surface
/// as a short read from `read_frames`, never through this type.
#[derive(Debug, Error)]
pub enum Mp3Error {
    /// The input path could not be opened.
    #[error("cannot open {}: {}", .path.display(), .source)]
    Open { path: PathBuf, source: io::Error },
    /// Seek or read failed while probing the stream for an ID3v2 tag.
    #[error("I/O error while probing stream header: {0}")]
    Io(#[from] io::Error),
    /// The stream opened but no decodable MP3 frame was found in it.
    #[error("no decodable MP3 frame found in stream")]
    Unsupported,
}
