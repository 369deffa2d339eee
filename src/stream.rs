//! Stream backends: memory-mapped sources and sinks with a buffered file
//! fallback, behind the `Source`/`Sink` pair.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut};

use crate::error::PlyError;

/// Default write reservation: 100 MiB, truncated down to the actual size on
/// release. A sizing hint, not a hard limit on file size in general — but a
/// mapped sink never grows past its reservation.
pub const DEFAULT_RESERVE: usize = 100 * 1024 * 1024;

fn open_error(path: &Path, source: io::Error) -> PlyError {
    PlyError::Open {
        path: path.to_path_buf(),
        source,
    }
}

/// Read-only mapping of an entire existing file. Reads advance a cursor over
/// the mapped bytes; `fill_buf` hands out the mapped slice directly.
pub struct MappedSource {
    mmap: Mmap,
    pos: usize,
}

impl MappedSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PlyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        // SAFETY: the mapping is read-only; the file must not be truncated by
        // another process while the map is live.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| open_error(path, e))?;
        log::debug!("mapped {} read-only ({} bytes)", path.display(), mmap.len());
        Ok(Self { mmap, pos: 0 })
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl Read for MappedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.pos..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl BufRead for MappedSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.mmap.len());
    }
}

/// Write mapping over a file pre-sized to a reservation. Writes advance a put
/// position inside the reservation; on release the mapping is torn down and
/// the file truncated to the bytes actually written.
pub struct MappedSink {
    path: PathBuf,
    file: File,
    map: Option<MmapMut>,
    pos: usize,
}

impl MappedSink {
    /// Create (or open) `path` and reserve `reserve` bytes for writing.
    pub fn create(path: impl AsRef<Path>, reserve: usize) -> Result<Self, PlyError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| open_error(path, e))?;
        file.set_len(reserve as u64).map_err(|e| open_error(path, e))?;
        // SAFETY: the map is exclusive to this handle and dropped before the
        // backing file is truncated in `close`.
        let map = unsafe { MmapMut::map_mut(&file) }.map_err(|e| open_error(path, e))?;
        log::debug!(
            "mapped {} read-write ({} bytes reserved)",
            path.display(),
            reserve
        );
        Ok(Self {
            path: path.to_path_buf(),
            file,
            map: Some(map),
            pos: 0,
        })
    }

    /// Reserved capacity in bytes; 0 once closed.
    pub fn capacity(&self) -> usize {
        self.map.as_ref().map_or(0, |m| m.len())
    }

    /// Current put position from the start of the file.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unmap and truncate the file to the bytes actually written. Idempotent;
    /// also runs from `Drop`.
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(map) = self.map.take() {
            map.flush()?;
            drop(map);
            self.file.set_len(self.pos as u64)?;
            log::debug!("truncated {} to {} bytes", self.path.display(), self.pos);
        }
        Ok(())
    }
}

impl Write for MappedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let map = self
            .map
            .as_mut()
            .ok_or_else(|| io::Error::other("mapped sink already closed"))?;
        let end = self.pos + buf.len();
        if end > map.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("mapped reservation of {} bytes exhausted", map.len()),
            ));
        }
        map[self.pos..end].copy_from_slice(buf);
        self.pos = end;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(map) = self.map.as_ref() {
            map.flush()?;
        }
        Ok(())
    }
}

impl Seek for MappedSink {
    /// Seek within `[0, capacity]`; targets outside the reservation fail
    /// rather than grow the mapping.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let cap = self.capacity() as i64;
        let target = match pos {
            SeekFrom::Start(n) => n as i64,
            SeekFrom::Current(d) => self.pos as i64 + d,
            SeekFrom::End(d) => cap + d,
        };
        if target < 0 || target > cap {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek outside the mapped reservation",
            ));
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}

impl Drop for MappedSink {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::warn!("failed to release mapped file {}: {err}", self.path.display());
        }
    }
}

/// Input stream: mapped or plain buffered file.
pub enum Source {
    Mapped(MappedSource),
    Buffered(BufReader<File>),
}

impl Source {
    pub fn mapped(path: impl AsRef<Path>) -> Result<Self, PlyError> {
        Ok(Source::Mapped(MappedSource::open(path)?))
    }

    pub fn buffered(path: impl AsRef<Path>) -> Result<Self, PlyError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        Ok(Source::Buffered(BufReader::new(file)))
    }
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Mapped(s) => s.read(buf),
            Source::Buffered(s) => s.read(buf),
        }
    }
}

impl BufRead for Source {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Source::Mapped(s) => s.fill_buf(),
            Source::Buffered(s) => s.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Source::Mapped(s) => s.consume(amt),
            Source::Buffered(s) => s.consume(amt),
        }
    }
}

/// Output stream: mapped or plain buffered file.
pub enum Sink {
    Mapped(MappedSink),
    Buffered(BufWriter<File>),
}

impl Sink {
    pub fn mapped(path: impl AsRef<Path>, reserve: usize) -> Result<Self, PlyError> {
        Ok(Sink::Mapped(MappedSink::create(path, reserve)?))
    }

    pub fn buffered(path: impl AsRef<Path>) -> Result<Self, PlyError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| open_error(path, e))?;
        Ok(Sink::Buffered(BufWriter::new(file)))
    }

    /// Flush and, for a mapped sink, unmap and truncate. Idempotent.
    pub fn finish(&mut self) -> Result<(), PlyError> {
        match self {
            Sink::Mapped(s) => Ok(s.close()?),
            Sink::Buffered(s) => Ok(s.flush()?),
        }
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Mapped(s) => s.write(buf),
            Sink::Buffered(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Mapped(s) => s.flush(),
            Sink::Buffered(s) => s.flush(),
        }
    }
}
