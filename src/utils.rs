use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use encoding_rs::{DecoderResult, Encoding, UTF_8};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

const SNIFF_LEN: u64 = 4096;

/// What to do with byte sequences that are not valid in the text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InvalidBytePolicy {
    /// Silently skip malformed sequences.
    #[default]
    Drop,
    /// Substitute U+FFFD for each malformed sequence.
    Replace,
    /// Refuse to decode the file.
    Error,
}

#[derive(Debug, Clone, Copy)]
pub struct TextDecoding {
    pub encoding: &'static Encoding,
    pub on_invalid: InvalidBytePolicy,
    pub normalize_eol: bool,
}

impl Default for TextDecoding {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            on_invalid: InvalidBytePolicy::Drop,
            normalize_eol: false,
        }
    }
}

impl TextDecoding {
    /// Decodes `bytes`; on failure returns the offset just past the first
    /// malformed sequence.
    pub fn decode(&self, bytes: &[u8]) -> std::result::Result<String, usize> {
        let content = match self.on_invalid {
            InvalidBytePolicy::Replace => self
                .encoding
                .decode_without_bom_handling(bytes)
                .0
                .into_owned(),
            policy => {
                let mut decoder = self.encoding.new_decoder_without_bom_handling();
                let capacity = decoder
                    .max_utf8_buffer_length_without_replacement(bytes.len())
                    .unwrap_or(bytes.len());
                let mut out = String::with_capacity(capacity);
                let mut consumed = 0;
                loop {
                    let (result, read) = decoder.decode_to_string_without_replacement(
                        &bytes[consumed..],
                        &mut out,
                        true,
                    );
                    consumed += read;
                    match result {
                        DecoderResult::InputEmpty => break,
                        DecoderResult::OutputFull => {
                            let remaining = bytes.len() - consumed;
                            out.reserve(
                                decoder
                                    .max_utf8_buffer_length_without_replacement(remaining)
                                    .unwrap_or(remaining)
                                    .max(4),
                            );
                        }
                        DecoderResult::Malformed(_, _) => {
                            if policy == InvalidBytePolicy::Error {
                                return Err(consumed);
                            }
                        }
                    }
                }
                out
            }
        };

        if self.normalize_eol {
            Ok(content.replace("\r\n", "\n").replace('\r', "\n"))
        } else {
            Ok(content)
        }
    }
}

fn is_control(b: u8) -> bool {
    (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x08 | 0x0c | 0x1b)) || b == 0x7f
}

/// Sniffs the head of a file. A NUL byte marks it binary, as does a head
/// where more than 30% of the bytes are control characters or (when decoding
/// as UTF-8) malformed sequences. Empty files are text.
pub fn is_probably_binary(path: &Path, decoding: &TextDecoding) -> io::Result<bool> {
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;
    if head.is_empty() {
        return Ok(false);
    }
    if head.contains(&0) {
        return Ok(true);
    }

    let mut suspicious = head.iter().filter(|&&b| is_control(b)).count();
    if decoding.encoding == UTF_8 {
        suspicious += head.utf8_chunks().map(|c| c.invalid().len()).sum::<usize>();
    }
    Ok(suspicious * 10 > head.len() * 3)
}

pub fn read_text(path: &Path, decoding: &TextDecoding) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::read(path, e))?;
    decoding.decode(&bytes).map_err(|offset| Error::Decode {
        path: path.to_path_buf(),
        encoding: decoding.encoding.name(),
        offset,
    })
}

pub fn file_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

pub fn file_bytes_equal(p1: &Path, p2: &Path) -> io::Result<bool> {
    if fs::metadata(p1)?.len() != fs::metadata(p2)?.len() {
        return Ok(false);
    }
    Ok(file_digest(p1)? == file_digest(p2)?)
}

/// One-line summary of a file's metadata for binary mismatch reports.
pub fn describe_file(path: &Path) -> io::Result<String> {
    let meta = fs::metadata(path)?;
    let modified = meta
        .modified()
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|_| "unknown".to_string());
    Ok(format!(
        "{} ({} bytes, modified {}, sha256 {})",
        path.display(),
        meta.len(),
        modified,
        file_digest(path)?
    ))
}

/// Writes `text` next to `path` and renames it into place.
pub fn write_text_atomic(path: &Path, text: &str) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
