//! Resource archive appended to a onefile executable.
//!
//! Layout: `<executable bytes><archive bytes><trailer>` where the 24-byte
//! trailer is `payload_len: u64 LE`, `flags: u64 LE` and the magic
//! `VDLPAYLD`. The archive is a tar stream, gzip-compressed when
//! [`FLAG_COMPRESSED`] is set.

use super::StartupError;
use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

pub const MAGIC: &[u8; 8] = b"VDLPAYLD";
pub const TRAILER_LEN: usize = 24;
pub const FLAG_COMPRESSED: u64 = 1;

/// Fixed-size footer locating the payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayloadTrailer {
    pub payload_len: u64,
    pub flags: u64,
}

impl PayloadTrailer {
    pub fn new(payload_len: u64, compressed: bool) -> Self {
        Self {
            payload_len,
            flags: if compressed { FLAG_COMPRESSED } else { 0 },
        }
    }

    pub fn compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn to_bytes(&self) -> [u8; TRAILER_LEN] {
        let mut bytes = [0u8; TRAILER_LEN];
        bytes[..8].copy_from_slice(&self.payload_len.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.flags.to_le_bytes());
        bytes[16..].copy_from_slice(MAGIC);
        bytes
    }

    /// Parses a trailer; `None` when the magic does not match.
    pub fn parse(bytes: &[u8; TRAILER_LEN]) -> Option<Self> {
        if &bytes[16..] != MAGIC {
            return None;
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&bytes[..8]);
        let payload_len = u64::from_le_bytes(word);
        word.copy_from_slice(&bytes[8..16]);
        let flags = u64::from_le_bytes(word);
        Some(Self { payload_len, flags })
    }
}

/// Reads the payload appended to `exe`, if there is one.
pub fn read_payload(exe: &Path) -> Result<Option<(PayloadTrailer, Vec<u8>)>, StartupError> {
    let mut file = File::open(exe).map_err(StartupError::io("opening executable", exe))?;
    let len = file
        .metadata()
        .map_err(StartupError::io("reading executable metadata", exe))?
        .len();
    if len < TRAILER_LEN as u64 {
        return Ok(None);
    }

    let mut raw = [0u8; TRAILER_LEN];
    file.seek(SeekFrom::End(-(TRAILER_LEN as i64)))
        .and_then(|_| file.read_exact(&mut raw))
        .map_err(StartupError::io("reading payload trailer", exe))?;
    let Some(trailer) = PayloadTrailer::parse(&raw) else {
        return Ok(None);
    };

    let available = len - TRAILER_LEN as u64;
    if trailer.payload_len > available {
        return Err(StartupError::CorruptPayload {
            path: exe.to_path_buf(),
            reason: format!(
                "trailer claims {} bytes but only {} precede it",
                trailer.payload_len, available
            ),
        });
    }

    let mut payload = vec![0u8; trailer.payload_len as usize];
    file.seek(SeekFrom::Start(available - trailer.payload_len))
        .and_then(|_| file.read_exact(&mut payload))
        .map_err(StartupError::io("reading payload", exe))?;
    Ok(Some((trailer, payload)))
}

/// Unpacks a payload archive into `dest`.
pub fn unpack(payload: &[u8], compressed: bool, dest: &Path) -> Result<(), StartupError> {
    let result = if compressed {
        tar::Archive::new(GzDecoder::new(payload)).unpack(dest)
    } else {
        tar::Archive::new(payload).unpack(dest)
    };
    result.map_err(StartupError::io("unpacking resources", dest))
}
