//! Opening trace files.
//!
//! Files ending in `.zst` or `.zstd` are decompressed on the fly; anything
//! else is read as raw records. The content is never sniffed: a raw trace
//! can legitimately start with the bytes of a zstd frame magic.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Boxed byte source handed to the decoder.
pub type TraceReader = Box<dyn Read>;

/// Container format of a trace file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    None,
    Zstd,
}

impl Compression {
    /// Choose by file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("zst" | "zstd") => Self::Zstd,
            _ => Self::None,
        }
    }
}

/// Open a trace file for decoding, choosing compression by extension.
pub fn open_trace(path: &Path) -> Result<TraceReader> {
    open_trace_with(path, Compression::from_path(path))
}

/// Open a trace file with an explicit container format.
pub fn open_trace_with(path: &Path, compression: Compression) -> Result<TraceReader> {
    let open_err = |source| Error::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_err)?;
    let reader = from_reader(BufReader::new(file), compression).map_err(open_err)?;
    debug!(?compression, "opened trace {}", path.display());
    Ok(reader)
}

/// Wrap a buffered reader, decompressing it if requested.
pub fn from_reader<R: BufRead + 'static>(
    reader: R,
    compression: Compression,
) -> io::Result<TraceReader> {
    match compression {
        Compression::None => Ok(Box::new(reader)),
        Compression::Zstd => Ok(Box::new(zstd::stream::Decoder::with_buffer(reader)?)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::disasm::NullDisassembler;
    use crate::record::{Record, encode};
    use crate::{EventPayload, Stream, TraceDecoder};

    fn read_all(mut reader: TraceReader) -> Vec<u8> {
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        let data = vec![1u8, 2, 3, 4, 5];
        let reader = from_reader(Cursor::new(data.clone()), Compression::None).unwrap();
        assert_eq!(read_all(reader), data);
    }

    #[test]
    fn test_zstd_is_decompressed() {
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let compressed = zstd::encode_all(&data[..], 3).unwrap();
        let reader = from_reader(Cursor::new(compressed), Compression::Zstd).unwrap();
        assert_eq!(read_all(reader), data);
    }

    #[test]
    fn test_raw_trace_starting_with_zstd_magic() {
        // pc 0xFD2FB528 encodes as 28 B5 2F FD, the zstd frame magic.
        let record = Record::new(
            0xFD2F_B528,
            0x0000_0013,
            EventPayload::RegWrite {
                reg: 5,
                value: 0x2A,
            },
        );
        let bytes = encode(&[record]);
        assert_eq!(&bytes[..4], &[0x28, 0xB5, 0x2F, 0xFD]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emu.bin");
        std::fs::write(&path, &bytes).unwrap();

        let Ok(reader) = open_trace(&path) else {
            panic!("expected raw trace to open");
        };
        let mut dec = TraceDecoder::new(reader, Stream::Emu, NullDisassembler);
        let event = dec.next_event().unwrap().unwrap();
        assert_eq!(event.record(), record);
        assert!(dec.next_event().unwrap().is_none());
    }

    #[test]
    fn test_compression_from_extension() {
        assert_eq!(Compression::from_path(Path::new("rtl.bin.zst")), Compression::Zstd);
        assert_eq!(Compression::from_path(Path::new("rtl.zstd")), Compression::Zstd);
        assert_eq!(Compression::from_path(Path::new("rtl.bin")), Compression::None);
        assert_eq!(Compression::from_path(Path::new("rtl")), Compression::None);
    }

    #[test]
    fn test_empty_source() {
        let reader = from_reader(Cursor::new(Vec::new()), Compression::None).unwrap();
        assert!(read_all(reader).is_empty());
    }

    #[test]
    fn test_missing_file() {
        let Err(err) = open_trace(Path::new("/nonexistent/rvtrace/trace.bin")) else {
            panic!("expected open failure");
        };
        assert!(matches!(err, Error::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/rvtrace/trace.bin"));
    }
}
