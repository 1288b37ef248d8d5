//! Converts raw BIN/CUE optical disc dumps into plain 2048-byte ISO images.
//!
//! The engine works on caller-supplied byte streams: [`iso::convert`] parses
//! the CUE sheet, locates the first data track and strips every raw sector
//! down to its user data. [`detect`] infers the sector geometry of an image
//! that comes without a sheet.

pub mod cd;
pub mod cue;
pub mod detect;
pub mod iso;

pub use cd::TrackMode;
pub use iso::convert;
pub use iso::error::{IsoError, IsoResult};
pub use iso::models::{Completion, ConversionSummary, DataTrack};
