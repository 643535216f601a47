use derive_more::From;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use io_enum::{Read, Write};
use std::io;
use std::io::{Read, Seek, SeekFrom, Write};

/// Leading bytes of a gzip stream (RFC 1952).
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Write, From)]
pub enum Compressor<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
}

impl<W: Write> Compressor<W> {
    pub fn gzip(writer: W) -> Self {
        GzEncoder::new(writer, Compression::default()).into()
    }

    /// Flushes any pending compressed data and returns the inner writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Compressor::Plain(w) => Ok(w),
            Compressor::Gzip(w) => w.finish(),
        }
    }
}

#[derive(Read, From)]
pub enum Decompressor<R: Read> {
    Plain(R),
    Gzip(GzDecoder<R>),
}

impl<R: Read + Seek> Decompressor<R> {
    /// Wraps `reader` with gzip decoding when the stream starts with the
    /// gzip magic bytes. Detection never consults the file name.
    pub fn sniff(mut reader: R) -> io::Result<Self> {
        let mut magic = [0u8; 2];
        let mut filled = 0;
        while filled < magic.len() {
            match reader.read(&mut magic[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        reader.seek(SeekFrom::Start(0))?;

        if filled == magic.len() && magic == GZIP_MAGIC {
            Ok(GzDecoder::new(reader).into())
        } else {
            Ok(Decompressor::Plain(reader))
        }
    }
}
