//! Track-mode detection without a CUE sheet.
//!
//! An ISO 9660 image keeps its Primary Volume Descriptor in logical sector
//! 16, with the standard identifier `CD001` one byte into the sector. Each
//! candidate geometry puts that byte at a different raw position, so probing
//! those positions tells the geometry apart.

use crate::cd::TrackMode;
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::PathBuf;
use tokio::task;

/// ISO 9660 standard identifier.
pub const PRIMARY_VOLUME_SIGNATURE: &[u8] = b"CD001";

/// Markers a PlayStation disc carries somewhere in its data track.
pub const PLAYSTATION_SIGNATURES: [&[u8]; 2] = [b"SYSTEM.CNF", b"PLAYSTATION"];

/// Logical sector of the Primary Volume Descriptor.
pub const PVD_SECTOR: u64 = 16;

/// Probed in order, the first hit wins.
const CANDIDATES: [TrackMode; 3] = [
    TrackMode::Mode1_2048,
    TrackMode::Mode1_2352,
    TrackMode::Mode2_2352,
];

const SCAN_CHUNK_SIZE: usize = 64 * 1024;

/// Raw byte position where `mode` stores byte 1 of the PVD sector.
pub fn signature_position(mode: TrackMode) -> u64 {
    PVD_SECTOR * mode.raw_sector_size() as u64 + mode.data_offset() as u64 + 1
}

pub fn detect_track_mode<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<TrackMode>> {
    detect_track_mode_with(reader, &[PRIMARY_VOLUME_SIGNATURE])
}

/// Reads just far enough to cover every candidate position, then looks for
/// any of `markers` at each of them.
pub fn detect_track_mode_with<R: Read + ?Sized>(
    reader: &mut R,
    markers: &[&[u8]],
) -> io::Result<Option<TrackMode>> {
    let longest = markers.iter().map(|m| m.len()).max().unwrap_or(0);
    if longest == 0 {
        return Ok(None);
    }

    let limit = CANDIDATES
        .iter()
        .map(|&mode| signature_position(mode))
        .max()
        .unwrap_or(0)
        + longest as u64;

    let mut head = Vec::new();
    (&mut *reader).take(limit).read_to_end(&mut head)?;

    let detected = CANDIDATES.into_iter().find(|&mode| {
        let position = signature_position(mode) as usize;
        markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .any(|marker| head.get(position..position + marker.len()) == Some(*marker))
    });

    match detected {
        Some(mode) => debug!("Found signature for {mode} at byte {}", signature_position(mode)),
        None => debug!("No signature found in the first {} bytes", head.len()),
    }

    Ok(detected)
}

/// True if any non-empty marker occurs anywhere in the stream.
pub fn scan_stream_for_signatures<R: Read + ?Sized>(
    reader: &mut R,
    markers: &[&[u8]],
) -> io::Result<bool> {
    let markers: Vec<&[u8]> = markers.iter().copied().filter(|m| !m.is_empty()).collect();
    let Some(longest) = markers.iter().map(|m| m.len()).max() else {
        return Ok(false);
    };

    // Keep the tail of the previous chunk so markers split across reads match.
    let overlap = longest - 1;
    let mut window = vec![0u8; overlap + SCAN_CHUNK_SIZE];
    let mut carried = 0;

    loop {
        let read = match reader.read(&mut window[carried..]) {
            Ok(0) => return Ok(false),
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        let filled = &window[..carried + read];
        if markers
            .iter()
            .any(|marker| filled.windows(marker.len()).any(|w| w == *marker))
        {
            return Ok(true);
        }

        carried = overlap.min(filled.len());
        let tail_start = filled.len() - carried;
        window.copy_within(tail_start..tail_start + carried, 0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageReport {
    pub mode: Option<TrackMode>,
    /// A PlayStation boot marker occurs somewhere in the image.
    pub playstation: bool,
}

pub async fn inspect_image(path: PathBuf) -> io::Result<ImageReport> {
    task::spawn_blocking(move || -> io::Result<ImageReport> {
        let mode = detect_track_mode(&mut BufReader::new(File::open(&path)?))?;

        let mut reader = BufReader::with_capacity(SCAN_CHUNK_SIZE, File::open(&path)?);
        let playstation = scan_stream_for_signatures(&mut reader, &PLAYSTATION_SIGNATURES)?;

        Ok(ImageReport { mode, playstation })
    })
    .await?
}
