use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

pub mod msf;

/// Size of a physical CD sector, the grid every MSF timecode addresses.
pub const RAW_SECTOR_SIZE: usize = 2352;
/// ISO 9660 logical sector payload.
pub const ISO_SECTOR_SIZE: usize = 2048;

pub const MODE1_DATA_OFFSET: usize = 16; // 12 sync + 4 header
pub const MODE2_DATA_OFFSET: usize = 24; // 12 sync + 4 header + 8 subheader

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported track mode: {0}")]
pub struct UnsupportedTrackModeError(pub String);

/// Sector geometries a data track can be stripped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackMode {
    Mode1_2352,
    Mode2_2352,
    Mode1_2048,
}

impl TrackMode {
    pub const ALL: [TrackMode; 3] = [
        TrackMode::Mode1_2352,
        TrackMode::Mode2_2352,
        TrackMode::Mode1_2048,
    ];

    /// Looks a label up case-insensitively. A missing label is unsupported too.
    pub fn resolve(label: Option<&str>) -> Result<Self, UnsupportedTrackModeError> {
        match label {
            Some(label) => label.parse(),
            None => Err(UnsupportedTrackModeError(String::new())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrackMode::Mode1_2352 => "MODE1/2352",
            TrackMode::Mode2_2352 => "MODE2/2352",
            TrackMode::Mode1_2048 => "MODE1/2048",
        }
    }

    pub fn raw_sector_size(&self) -> usize {
        match self {
            TrackMode::Mode1_2352 | TrackMode::Mode2_2352 => RAW_SECTOR_SIZE,
            TrackMode::Mode1_2048 => ISO_SECTOR_SIZE,
        }
    }

    pub fn data_offset(&self) -> usize {
        match self {
            TrackMode::Mode1_2352 => MODE1_DATA_OFFSET,
            TrackMode::Mode2_2352 => MODE2_DATA_OFFSET,
            TrackMode::Mode1_2048 => 0,
        }
    }

    pub fn data_size(&self) -> usize {
        ISO_SECTOR_SIZE
    }
}

impl FromStr for TrackMode {
    type Err = UnsupportedTrackModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackMode::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedTrackModeError(s.to_string()))
    }
}

impl Display for TrackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(mode: TrackMode) -> (usize, usize, usize) {
        (mode.raw_sector_size(), mode.data_offset(), mode.data_size())
    }

    #[test]
    fn resolves_known_modes() {
        let mode1 = TrackMode::resolve(Some("MODE1/2352")).unwrap();
        let mode2 = TrackMode::resolve(Some("MODE2/2352")).unwrap();
        let cooked = TrackMode::resolve(Some("MODE1/2048")).unwrap();

        assert_eq!(geometry(mode1), (2352, 16, 2048));
        assert_eq!(geometry(mode2), (2352, 24, 2048));
        assert_eq!(geometry(cooked), (2048, 0, 2048));
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(
            TrackMode::resolve(Some("mode1/2352")),
            Ok(TrackMode::Mode1_2352)
        );
        assert_eq!("Mode2/2352".parse::<TrackMode>(), Ok(TrackMode::Mode2_2352));
    }

    #[test]
    fn unknown_label_is_unsupported_and_named() {
        let err = TrackMode::resolve(Some("SOMETHING/UNKNOWN")).unwrap_err();
        assert_eq!(err, UnsupportedTrackModeError("SOMETHING/UNKNOWN".to_string()));
        assert_eq!(err.to_string(), "Unsupported track mode: SOMETHING/UNKNOWN");
    }

    #[test]
    fn missing_label_is_unsupported() {
        assert!(TrackMode::resolve(None).is_err());
    }

    #[test]
    fn whole_label_must_match() {
        assert!("MODE1/23520".parse::<TrackMode>().is_err());
        assert!("MODE2/2336".parse::<TrackMode>().is_err());
        assert!("AUDIO".parse::<TrackMode>().is_err());
    }

    #[test]
    fn display_uses_canonical_label() {
        assert_eq!(TrackMode::Mode1_2048.to_string(), "MODE1/2048");
    }
}
