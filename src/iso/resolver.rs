use crate::cue::models::CueSheet;
use crate::detect::detect_track_mode;
use crate::iso::boundary::resolve_data_track;
use crate::iso::error::{IsoError, IsoResult};
use crate::iso::models::DataTrack;
use log::warn;
use std::io::Read;

/// Anything that can tell where the data track lives and how its sectors
/// are laid out.
pub trait DataTrackResolver {
    fn resolve_data_track(&mut self, total_len: u64) -> IsoResult<DataTrack>;
}

impl DataTrackResolver for CueSheet {
    fn resolve_data_track(&mut self, total_len: u64) -> IsoResult<DataTrack> {
        resolve_data_track(&self.tracks, total_len)
    }
}

/// Sheetless resolution: probes the image for a volume descriptor and
/// treats the whole image as the data track.
pub struct SignatureResolver<R> {
    reader: R,
}

impl<R: Read> SignatureResolver<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> DataTrackResolver for SignatureResolver<R> {
    fn resolve_data_track(&mut self, total_len: u64) -> IsoResult<DataTrack> {
        let mode = detect_track_mode(&mut self.reader)?.ok_or(IsoError::NoSignatureFound)?;

        if total_len == 0 {
            return Err(IsoError::InvalidTrackSize {
                start: 0,
                end: total_len,
            });
        }

        Ok(DataTrack {
            mode,
            start: 0,
            end: total_len,
        })
    }
}

/// Tries `primary`, and `secondary` when the primary cannot produce a
/// usable geometry. I/O errors are never retried.
pub struct FallbackResolver<A, B> {
    primary: A,
    secondary: B,
}

impl<A, B> FallbackResolver<A, B> {
    pub fn new(primary: A, secondary: B) -> Self {
        Self { primary, secondary }
    }
}

impl<A: DataTrackResolver, B: DataTrackResolver> DataTrackResolver for FallbackResolver<A, B> {
    fn resolve_data_track(&mut self, total_len: u64) -> IsoResult<DataTrack> {
        match self.primary.resolve_data_track(total_len) {
            Err(e) if e.is_mode_resolution_failure() => {
                warn!("{e}, falling back to signature detection");
                self.secondary.resolve_data_track(total_len)
            }
            other => other,
        }
    }
}
