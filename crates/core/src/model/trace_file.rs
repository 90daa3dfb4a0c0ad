use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Trace;
use crate::progress::Progress;

/// Files up to this size are read into memory; larger files are re-read
/// from disk on every text query.
pub const DEFAULT_IN_MEMORY_LIMIT: u64 = 512 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum TraceFileError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Largest file size (bytes) that is buffered in memory.
    pub in_memory_limit: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            in_memory_limit: DEFAULT_IN_MEMORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexEntry {
    timestamp: f64,
    /// Byte offset of the start of the line.
    offset: u64,
}

enum Store {
    Memory(Vec<u8>),
    Seekable(Mutex<BufReader<File>>),
}

/// Primary event store: a line-oriented text log indexed by timestamp.
///
/// Each line of the form `TIMESTAMP REST...` becomes one event. Lines
/// without a leading number are not indexed. The index is sorted by
/// timestamp once loading completes and never changes afterwards; a reload
/// builds a new `TraceFile`.
pub struct TraceFile {
    source: Option<PathBuf>,
    index: Vec<IndexEntry>,
    store: Store,
    resorted: bool,
}

impl TraceFile {
    /// Load and index a text trace from disk.
    pub fn open(
        path: impl AsRef<Path>,
        options: &LoadOptions,
        mut progress: Option<&mut dyn Progress>,
    ) -> Result<Self, TraceFileError> {
        let path = path.as_ref();
        let open_err = |source: io::Error| TraceFileError::Open {
            path: path.to_path_buf(),
            source,
        };
        let read_err = |source: io::Error| TraceFileError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(open_err)?;
        let size = file.metadata().map_err(read_err)?.len();

        if let Some(p) = progress.as_deref_mut() {
            p.reset();
            p.set_range(0, size);
        }

        let mut trace = if size <= options.in_memory_limit {
            let mut data = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
            file.read_to_end(&mut data).map_err(read_err)?;
            Self::index_buffer(data, progress)
        } else {
            Self::index_seekable(file, progress).map_err(read_err)?
        };
        trace.source = Some(path.to_path_buf());

        log::debug!(
            "indexed {} events from {} ({} bytes, {}{})",
            trace.index.len(),
            path.display(),
            size,
            if trace.is_in_memory() { "in memory" } else { "streamed" },
            if trace.resorted { ", re-sorted" } else { "" },
        );
        Ok(trace)
    }

    /// Index a trace that is already in memory.
    pub fn from_bytes(data: Vec<u8>, mut progress: Option<&mut dyn Progress>) -> Self {
        if let Some(p) = progress.as_deref_mut() {
            p.reset();
            p.set_range(0, data.len() as u64);
        }
        Self::index_buffer(data, progress)
    }

    fn index_buffer(data: Vec<u8>, mut progress: Option<&mut dyn Progress>) -> Self {
        let mut indexer = Indexer::default();
        let mut offset = 0u64;
        for line in data.split(|&b| b == b'\n') {
            if let Some((timestamp, _)) = parse_timestamp(line) {
                indexer.push(timestamp, offset);
            }
            offset += line.len() as u64 + 1;
            if let Some(p) = progress.as_deref_mut() {
                p.set_value(offset.min(data.len() as u64));
            }
        }
        let (index, resorted) = indexer.finish();
        Self {
            source: None,
            index,
            store: Store::Memory(data),
            resorted,
        }
    }

    fn index_seekable(file: File, mut progress: Option<&mut dyn Progress>) -> io::Result<Self> {
        let mut reader = BufReader::new(file);
        let mut indexer = Indexer::default();
        let mut line = Vec::new();
        let mut offset = 0u64;
        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }
            if let Some((timestamp, _)) = parse_timestamp(&line) {
                indexer.push(timestamp, offset);
            }
            offset += read as u64;
            if let Some(p) = progress.as_deref_mut() {
                p.set_value(offset);
            }
        }
        let (index, resorted) = indexer.finish();
        Ok(Self {
            source: None,
            index,
            store: Store::Seekable(Mutex::new(reader)),
            resorted,
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_in_memory(&self) -> bool {
        matches!(self.store, Store::Memory(_))
    }

    /// Whether the input was out of order and had to be sorted.
    pub fn was_resorted(&self) -> bool {
        self.resorted
    }

    fn read_line_at(&self, offset: u64) -> Option<Cow<'_, [u8]>> {
        match &self.store {
            Store::Memory(data) => {
                let start = usize::try_from(offset).ok()?;
                let rest = data.get(start..)?;
                let end = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
                Some(Cow::Borrowed(&rest[..end]))
            }
            Store::Seekable(reader) => {
                let mut reader = reader.lock().ok()?;
                let mut line = Vec::new();
                let result = reader
                    .seek(SeekFrom::Start(offset))
                    .and_then(|_| reader.read_until(b'\n', &mut line));
                match result {
                    Ok(0) => None,
                    Ok(_) => Some(Cow::Owned(line)),
                    Err(e) => {
                        log::warn!("failed to read event line at offset {offset}: {e}");
                        None
                    }
                }
            }
        }
    }
}

impl Trace for TraceFile {
    fn num_events(&self) -> usize {
        self.index.len()
    }

    fn event_time(&self, idx: usize) -> f64 {
        self.index.get(idx).map_or(0.0, |e| e.timestamp)
    }

    fn event_text(&self, idx: usize, full: bool) -> Option<Cow<'_, str>> {
        let entry = self.index.get(idx)?;
        match self.read_line_at(entry.offset)? {
            Cow::Borrowed(line) => line_text(line, full).map(String::from_utf8_lossy),
            Cow::Owned(line) => line_text(&line, full)
                .map(|text| Cow::Owned(String::from_utf8_lossy(text).into_owned())),
        }
    }

    fn find_events(&self, t: f64) -> (Option<usize>, Option<usize>) {
        let split = self.index.partition_point(|e| e.timestamp < t);
        (
            split.checked_sub(1),
            (split < self.index.len()).then_some(split),
        )
    }
}

/// Collects index entries and remembers whether they arrived in order.
#[derive(Default)]
struct Indexer {
    entries: Vec<IndexEntry>,
    monotonic: bool,
}

impl Indexer {
    fn push(&mut self, timestamp: f64, offset: u64) {
        if self.entries.is_empty() {
            self.monotonic = true;
        } else if self
            .entries
            .last()
            .is_some_and(|prev| timestamp < prev.timestamp)
        {
            self.monotonic = false;
        }
        self.entries.push(IndexEntry { timestamp, offset });
    }

    fn finish(mut self) -> (Vec<IndexEntry>, bool) {
        let resort = !self.entries.is_empty() && !self.monotonic;
        if resort {
            log::debug!("timestamps not monotonic, sorting {} events", self.entries.len());
            // `sort_by` is stable: equal timestamps keep file order.
            self.entries
                .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        }
        (self.entries, resort)
    }
}

/// Parse the leading decimal number of a line (after optional whitespace).
/// Returns the value and the number of bytes consumed.
pub(crate) fn parse_timestamp(line: &[u8]) -> Option<(f64, usize)> {
    let start = line.iter().position(|b| !b.is_ascii_whitespace())?;
    let bytes = &line[start..];

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    let value: f64 = std::str::from_utf8(&bytes[..end]).ok()?.parse().ok()?;
    value.is_finite().then_some((value, start + end))
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Trim the line terminator and, unless `full`, the timestamp field.
fn line_text(line: &[u8], full: bool) -> Option<&[u8]> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if full {
        return Some(line);
    }
    let (_, consumed) = parse_timestamp(line)?;
    let rest = &line[consumed..];
    let detail_start = rest.iter().position(|b| !b.is_ascii_whitespace())?;
    Some(&rest[detail_start..])
}
