use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::Stream;

/// Fatal trace decoding errors.
///
/// A clean end of stream is not an error; the decoder reports it as `None`.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{stream} trace: unknown event tag {tag} in record at offset {offset:#x}")]
    UnknownTag { stream: Stream, offset: u64, tag: u8 },
    #[error("{stream} trace: record at offset {offset:#x} truncated while reading {field}")]
    CorruptRecord {
        stream: Stream,
        offset: u64,
        field: &'static str,
    },
    #[error("{stream} trace: read failed at offset {offset:#x}: {source}")]
    Io {
        stream: Stream,
        offset: u64,
        #[source]
        source: io::Error,
    },
}

impl DecodeError {
    /// The stream that failed.
    pub const fn stream(&self) -> Stream {
        match self {
            Self::UnknownTag { stream, .. }
            | Self::CorruptRecord { stream, .. }
            | Self::Io { stream, .. } => *stream,
        }
    }

    /// Byte offset of the record being decoded.
    pub const fn offset(&self) -> u64 {
        match self {
            Self::UnknownTag { offset, .. }
            | Self::CorruptRecord { offset, .. }
            | Self::Io { offset, .. } => *offset,
        }
    }
}

/// Comparison errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to open trace {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
