use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;
use log::{debug, warn};
use memmap2::Mmap;
use crate::error::TraceError;

// 4096 is the standard block size (or a multiple of it) on most systems
const BUFFER_SIZE: usize = 16 * 4096;

/// An open trace file, either memory mapped or read through a buffer
pub enum TraceSource {
    Mapped(Cursor<Mmap>),
    Buffered(BufReader<File>),
}

/// Opens a trace for sequential reading.
///
/// Non-empty traces are memory mapped on unix, which saves a copy for large traces. Empty files,
/// other platforms, and files which can't be mapped are read through a `BufReader` instead
pub fn open_trace(path: impl AsRef<Path>) -> Result<TraceSource, TraceError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if file.metadata()?.len() > 0 {
        if let Some(mapped) = map_trace(&file, path) {
            return Ok(mapped);
        }
    }
    Ok(TraceSource::Buffered(BufReader::with_capacity(BUFFER_SIZE, file)))
}

#[cfg(unix)]
fn map_trace(file: &File, path: &Path) -> Option<TraceSource> {
    use memmap2::Advice;
    // Safety: the trace is only read, and isn't expected to change while the simulator runs
    match unsafe { Mmap::map(file) } {
        Ok(map) => {
            if let Err(e) = map.advise(Advice::Sequential) {
                debug!("Sequential access advice for {} was refused: {e}", path.display());
            }
            Some(TraceSource::Mapped(Cursor::new(map)))
        }
        Err(e) => {
            warn!("Couldn't memory map {}, falling back to buffered reads: {e}", path.display());
            None
        }
    }
}

#[cfg(not(unix))]
fn map_trace(_file: &File, _path: &Path) -> Option<TraceSource> {
    None
}

impl Read for TraceSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            TraceSource::Mapped(r) => r.read(buf),
            TraceSource::Buffered(r) => r.read(buf),
        }
    }
}

impl BufRead for TraceSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            TraceSource::Mapped(r) => r.fill_buf(),
            TraceSource::Buffered(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            TraceSource::Mapped(r) => r.consume(amt),
            TraceSource::Buffered(r) => r.consume(amt),
        }
    }
}
