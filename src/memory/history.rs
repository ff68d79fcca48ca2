//! Append-only conversation log stored as JSON Lines.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::models::{Role, Turn};
use crate::errors::ChainError;

/// Durable, ordered record of every committed turn.
#[derive(Debug)]
pub struct MessageLog {
    path: PathBuf,
    turns: Vec<Turn>,
    /// Bytes of the file known to hold complete records.
    committed_len: u64,
}

#[derive(Debug, PartialEq, Eq)]
enum Tail {
    Clean,
    /// Trailing bytes past `valid_len` must be cut: a record cut off
    /// mid-write, or an exchange that never got its reply.
    Torn,
    /// Last record is complete but lacks its newline.
    Unterminated,
}

#[derive(Debug)]
struct Scan {
    turns: Vec<Turn>,
    /// File offset just past each record in `turns`.
    ends: Vec<u64>,
    valid_len: u64,
    tail: Tail,
}

fn io_error(path: &Path, error: io::Error) -> ChainError {
    ChainError::Persistence(format!("{}: {}", path.display(), error))
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn scan(bytes: &[u8]) -> Result<Scan, ChainError> {
    let mut turns = Vec::new();
    let mut ends = Vec::new();
    let mut offset = 0;
    let mut line_no = 0;

    while offset < bytes.len() {
        line_no += 1;
        let rest = &bytes[offset..];

        let Some(end) = rest.iter().position(|&b| b == b'\n') else {
            if is_blank(rest) {
                return Ok(Scan {
                    turns,
                    ends,
                    valid_len: offset as u64,
                    tail: Tail::Torn,
                });
            }
            return Ok(match serde_json::from_slice::<Turn>(rest) {
                Ok(turn) => {
                    turns.push(turn);
                    ends.push(bytes.len() as u64);
                    Scan {
                        turns,
                        ends,
                        valid_len: bytes.len() as u64,
                        tail: Tail::Unterminated,
                    }
                }
                Err(_) => Scan {
                    turns,
                    ends,
                    valid_len: offset as u64,
                    tail: Tail::Torn,
                },
            });
        };

        let line = &rest[..end];
        if !is_blank(line) {
            let turn = serde_json::from_slice::<Turn>(line).map_err(|e| {
                ChainError::Persistence(format!("Malformed log record on line {}: {}", line_no, e))
            })?;
            turns.push(turn);
            ends.push((offset + end + 1) as u64);
        }
        offset += end + 1;
    }

    Ok(Scan {
        turns,
        ends,
        valid_len: bytes.len() as u64,
        tail: Tail::Clean,
    })
}

/// An exchange is written as one buffer that opens with the human turn. A
/// crash partway through can leave that turn on disk without its reply, so
/// trailing human turns are cut back to the last complete exchange.
fn drop_unanswered_tail(scan: &mut Scan) -> usize {
    let mut dropped = 0;
    while scan.turns.last().is_some_and(|t| t.role == Role::Human) {
        scan.turns.pop();
        scan.ends.pop();
        dropped += 1;
    }

    if dropped > 0 {
        scan.valid_len = scan.ends.last().copied().unwrap_or(0);
        scan.tail = Tail::Torn;
    }
    dropped
}

fn write_record(file: &mut File, buffer: &[u8]) -> io::Result<()> {
    file.write_all(buffer)?;
    file.flush()?;
    file.sync_data()
}

impl MessageLog {
    /// Open the log at `path`, loading every complete exchange. A missing
    /// file is an empty log. A torn last record, and any human turn left
    /// without a reply after it, are truncated from the file.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Persistence`] if the file cannot be read or holds
    /// a malformed record anywhere but its unterminated last line.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ChainError> {
        let path = path.into();

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(io_error(&path, e)),
        };

        let mut scan = scan(&bytes)?;
        let unanswered = drop_unanswered_tail(&mut scan);
        if unanswered > 0 {
            warn!(
                "Dropping {} unanswered turn(s) at the end of {}",
                unanswered,
                path.display()
            );
        }
        let mut committed_len = scan.valid_len;

        match scan.tail {
            Tail::Clean => {}
            Tail::Torn => {
                warn!(
                    "Truncating {} trailing bytes from {}",
                    bytes.len() as u64 - scan.valid_len,
                    path.display()
                );
                OpenOptions::new()
                    .write(true)
                    .open(&path)
                    .and_then(|file| file.set_len(scan.valid_len))
                    .map_err(|e| io_error(&path, e))?;
            }
            Tail::Unterminated => {
                warn!("Terminating last record in {}", path.display());
                let mut file = OpenOptions::new()
                    .append(true)
                    .open(&path)
                    .map_err(|e| io_error(&path, e))?;
                write_record(&mut file, b"\n").map_err(|e| io_error(&path, e))?;
                committed_len += 1;
            }
        }

        debug!("Loaded {} turns from {}", scan.turns.len(), path.display());

        Ok(Self {
            path,
            turns: scan.turns,
            committed_len,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every committed turn, oldest first.
    #[must_use]
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of completed exchanges; each one opens with a human turn.
    #[must_use]
    pub fn exchange_count(&self) -> usize {
        self.turns.iter().filter(|t| t.role == Role::Human).count()
    }

    /// A human turn appended on its own counts as unanswered until a reply
    /// follows, and is dropped by the next [`MessageLog::open`] if none does.
    ///
    /// # Errors
    ///
    /// See [`MessageLog::append_all`].
    pub fn append(&mut self, turn: Turn) -> Result<(), ChainError> {
        self.append_all(vec![turn])
    }

    /// Append `turns` with a single write. A failed write is rolled back, so
    /// either all of them become visible through [`MessageLog::all`] or none
    /// do. After a crash mid-write, [`MessageLog::open`] cuts the file back to
    /// the last complete exchange.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Persistence`] if the file cannot be opened or
    /// written.
    pub fn append_all(&mut self, turns: Vec<Turn>) -> Result<(), ChainError> {
        if turns.is_empty() {
            return Ok(());
        }

        let mut buffer = Vec::new();
        for turn in &turns {
            serde_json::to_writer(&mut buffer, turn)?;
            buffer.push(b'\n');
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_error(&self.path, e))?;

        if let Err(e) = write_record(&mut file, &buffer) {
            // Roll back so the next append starts on a record boundary.
            if let Err(truncate_err) = file.set_len(self.committed_len) {
                warn!(
                    "Could not roll back partial write to {}: {}",
                    self.path.display(),
                    truncate_err
                );
            }
            return Err(io_error(&self.path, e));
        }

        self.committed_len += buffer.len() as u64;
        self.turns.extend(turns);
        Ok(())
    }
}
