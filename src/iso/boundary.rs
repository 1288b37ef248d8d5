use crate::cd::TrackMode;
use crate::cue::models::TrackDescriptor;
use crate::iso::error::{IsoError, IsoResult};
use crate::iso::models::DataTrack;
use log::debug;

/// Picks the first MODE1/MODE2 track and bounds it by the next track's
/// start, or by the image length when it is the last one.
pub fn resolve_data_track(tracks: &[TrackDescriptor], total_len: u64) -> IsoResult<DataTrack> {
    let (position, track) = tracks
        .iter()
        .enumerate()
        .find(|(_, track)| track.is_data())
        .ok_or(IsoError::NoDataTrack)?;

    let mode = TrackMode::resolve(Some(&track.mode_label))?;

    let start = track.start_byte_offset();
    let end = tracks
        .get(position + 1)
        .map(|next| next.start_byte_offset())
        .unwrap_or(total_len);

    if end <= start {
        return Err(IsoError::InvalidTrackSize { start, end });
    }

    debug!(
        "Data track {} ({mode}) spans bytes {start}..{end}",
        track.number
    );

    Ok(DataTrack { mode, start, end })
}
