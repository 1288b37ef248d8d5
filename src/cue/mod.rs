use crate::cd::msf::Msf;
use crate::cue::error::{CueError, CueResult};
use crate::cue::models::{CueFile, CueSheet, TrackDescriptor};
use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};
use std::io::Read;
use std::path::{Path, PathBuf};

pub mod error;
pub mod models;

lazy_static! {
    static ref TRACK_RE: Regex = Regex::new(r"(?i)^\s*TRACK\s+(\d+)\s+([A-Z0-9/]+)\s*$").unwrap();
    static ref INDEX01_RE: Regex =
        Regex::new(r"(?i)^\s*INDEX\s+01\s+(\d{2}):(\d{2}):(\d{2})\s*$").unwrap();
    static ref FILE_RE: Regex =
        Regex::new(r#"(?i)^\s*FILE\s+(?:"([^"]*)"|'([^']*)'|(\S+))\s+BINARY\s*$"#).unwrap();
}

pub struct CueParser {
    cue_path: PathBuf,
}

impl CueParser {
    pub fn new(cue_path: impl AsRef<Path>) -> Self {
        Self {
            cue_path: cue_path.as_ref().to_path_buf(),
        }
    }

    pub async fn parse(&self) -> CueResult<CueSheet> {
        let data = tokio::fs::read(&self.cue_path).await?;
        Self::parse_bytes(&data)
    }

    pub fn parse_reader(mut reader: impl Read) -> CueResult<CueSheet> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::parse_bytes(&data)
    }

    /// Sheets are treated as Latin-1 so any 8-bit filename survives decoding.
    pub fn parse_bytes(data: &[u8]) -> CueResult<CueSheet> {
        let text: String = data.iter().map(|&b| b as char).collect();
        Self::parse_str(&text)
    }

    /// Collects one descriptor per track, taken from the track's first
    /// INDEX 01 line. Tracks that never see an INDEX 01 are dropped.
    pub fn parse_str(text: &str) -> CueResult<CueSheet> {
        let mut file = None;
        let mut file_count = 0;
        let mut tracks = Vec::new();
        let mut pending: Option<(u32, String)> = None;

        for line in text.lines() {
            if let Some(caps) = TRACK_RE.captures(line) {
                let number = caps[1].parse::<u32>()?;

                if let Some((dropped, _)) = pending.replace((number, caps[2].to_string())) {
                    debug!("Track {dropped} has no INDEX 01, skipping it");
                }
            } else if let Some(caps) = INDEX01_RE.captures(line) {
                if let Some((number, mode_label)) = pending.take() {
                    let index01 = parse_msf(&caps)?;

                    debug!("Track {number} ({mode_label}) starts at {index01}");

                    tracks.push(TrackDescriptor {
                        number,
                        mode_label,
                        index01,
                    });
                }
            } else if let Some(caps) = FILE_RE.captures(line) {
                file_count += 1;

                if file.is_none() {
                    let filename = caps
                        .get(1)
                        .or_else(|| caps.get(2))
                        .or_else(|| caps.get(3))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();

                    file = Some(CueFile { filename });
                }
            }
        }

        if let Some((dropped, _)) = pending {
            debug!("Track {dropped} has no INDEX 01, skipping it");
        }

        if tracks.is_empty() {
            return Err(CueError::NoTracks);
        }

        Ok(CueSheet {
            file,
            file_count,
            tracks,
        })
    }
}

fn parse_msf(caps: &Captures<'_>) -> CueResult<Msf> {
    Ok(Msf {
        minutes: caps[1].parse()?,
        seconds: caps[2].parse()?,
        frames: caps[3].parse()?,
    })
}

/// Advisory text when the selected BIN differs from the one the sheet names.
/// Never blocks a conversion.
pub fn bin_mismatch_warning(selected: &str, referenced: Option<&str>) -> Option<String> {
    let referenced = referenced?;

    if selected.to_lowercase() == referenced.to_lowercase() {
        return None;
    }

    Some(format!(
        "CUE references '{referenced}' but the selected BIN is '{selected}'. Proceeding anyway."
    ))
}
