use crate::iso::error::{IsoError, IsoResult};
use crate::iso::models::{Completion, ConversionSummary, DataTrack};
use log::{debug, warn};
use std::io::{self, ErrorKind, Read, Write};

/// Copies the user data of every whole raw sector in `track` from `reader`
/// to `writer`, dropping sync, header, EDC/ECC and subchannel bytes.
///
/// `reader` must be positioned at the start of the raw image. `on_progress`
/// is called after each sector with the consumed fraction of the span.
pub fn strip_sectors<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    track: &DataTrack,
    mut on_progress: F,
) -> IsoResult<ConversionSummary>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(f32),
{
    skip_to_track_start(reader, track.start)?;

    let mode = track.mode;
    let sector_size = mode.raw_sector_size() as u64;
    let data_range = mode.data_offset()..mode.data_offset() + mode.data_size();
    let span = track.span();

    let mut buffer = vec![0u8; mode.raw_sector_size()];
    let mut consumed = 0u64;
    let mut sectors_written = 0u64;

    let completion = loop {
        let remaining = span - consumed;

        if remaining == 0 {
            break Completion::Drained;
        }

        if remaining < sector_size {
            debug!("Discarding trailing partial sector of {remaining} bytes");
            break Completion::TrailingPartialSector {
                discarded: remaining,
            };
        }

        match reader.read_exact(&mut buffer) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                warn!(
                    "BIN ended {remaining} bytes before the end of the data track, conversion may have ended slightly early"
                );
                break Completion::EndOfInput { missing: remaining };
            }
            Err(e) => return Err(e.into()),
        }

        writer.write_all(&buffer[data_range.clone()])?;

        consumed += sector_size;
        sectors_written += 1;

        on_progress((consumed as f64 / span as f64).min(1.0) as f32);
    };

    writer.flush()?;

    Ok(ConversionSummary {
        sectors_written,
        bytes_written: sectors_written * mode.data_size() as u64,
        completion,
    })
}

/// Consumes exactly `offset` bytes. Running dry first is fatal.
fn skip_to_track_start<R: Read + ?Sized>(reader: &mut R, offset: u64) -> IsoResult<()> {
    let mut remaining = offset;

    while remaining > 0 {
        let skipped = io::copy(&mut (&mut *reader).take(remaining), &mut io::sink())?;

        if skipped == 0 {
            return Err(IsoError::SeekPastEnd {
                offset,
                reached: offset - remaining,
            });
        }

        remaining -= skipped;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cd::TrackMode;
    use std::io::Cursor;

    const RAW: usize = 2352;

    /// Raw image whose sector `i` carries user data filled with `i` and
    /// junk everywhere else.
    fn raw_image(mode: TrackMode, sectors: usize, extra: usize) -> Vec<u8> {
        let size = mode.raw_sector_size();
        let mut data = vec![0xEEu8; size * sectors + extra];

        for sector in 0..sectors {
            let start = sector * size + mode.data_offset();
            data[start..start + mode.data_size()].fill(sector as u8);
        }

        data
    }

    fn whole_image(mode: TrackMode, len: usize) -> DataTrack {
        DataTrack {
            mode,
            start: 0,
            end: len as u64,
        }
    }

    #[test]
    fn strips_mode1_sectors() {
        let image = raw_image(TrackMode::Mode1_2352, 3, 0);
        let track = whole_image(TrackMode::Mode1_2352, image.len());
        let mut out: Vec<u8> = Vec::new();

        let summary = strip_sectors(&mut Cursor::new(&image), &mut out, &track, |_| {}).unwrap();

        assert_eq!(out.len(), 3 * 2048);
        for i in 0..3 {
            let src = &image[i * RAW + 16..i * RAW + 16 + 2048];
            assert_eq!(&out[i * 2048..(i + 1) * 2048], src);
            assert!(out[i * 2048..(i + 1) * 2048].iter().all(|&b| b == i as u8));
        }
        assert_eq!(summary.sectors_written, 3);
        assert_eq!(summary.bytes_written, 3 * 2048);
        assert_eq!(summary.completion, Completion::Drained);
    }

    #[test]
    fn strips_mode2_sectors_at_offset_24() {
        let image = raw_image(TrackMode::Mode2_2352, 2, 0);
        let track = whole_image(TrackMode::Mode2_2352, image.len());
        let mut out: Vec<u8> = Vec::new();

        strip_sectors(&mut Cursor::new(&image), &mut out, &track, |_| {}).unwrap();

        assert_eq!(&out[..2048], &image[24..24 + 2048]);
        assert_eq!(&out[2048..], &image[RAW + 24..RAW + 24 + 2048]);
    }

    #[test]
    fn cooked_sectors_are_copied_verbatim() {
        let image: Vec<u8> = (0..4 * 2048).map(|i| (i % 251) as u8).collect();
        let track = whole_image(TrackMode::Mode1_2048, image.len());
        let mut out: Vec<u8> = Vec::new();

        strip_sectors(&mut Cursor::new(&image), &mut out, &track, |_| {}).unwrap();

        assert_eq!(out, image);
    }

    #[test]
    fn trailing_partial_sector_is_discarded() {
        let image = raw_image(TrackMode::Mode1_2352, 1, 100);
        let track = whole_image(TrackMode::Mode1_2352, image.len());
        let mut out: Vec<u8> = Vec::new();

        let summary = strip_sectors(&mut Cursor::new(&image), &mut out, &track, |_| {}).unwrap();

        assert_eq!(out.len(), 2048);
        assert_eq!(
            summary.completion,
            Completion::TrailingPartialSector { discarded: 100 }
        );
        assert!(!summary.is_complete());
    }

    #[test]
    fn early_end_of_input_is_not_an_error() {
        // Range claims two sectors, the source holds one and a bit.
        let image = raw_image(TrackMode::Mode1_2352, 1, 100);
        let track = whole_image(TrackMode::Mode1_2352, 2 * RAW);
        let mut out: Vec<u8> = Vec::new();

        let summary = strip_sectors(&mut Cursor::new(&image), &mut out, &track, |_| {}).unwrap();

        assert_eq!(out.len(), 2048);
        assert_eq!(summary.sectors_written, 1);
        assert_eq!(
            summary.completion,
            Completion::EndOfInput {
                missing: RAW as u64
            }
        );
    }

    #[test]
    fn skips_to_track_start_and_stops_at_track_end() {
        let image = raw_image(TrackMode::Mode1_2352, 5, 0);
        let track = DataTrack {
            mode: TrackMode::Mode1_2352,
            start: 2 * RAW as u64,
            end: 4 * RAW as u64,
        };
        let mut out: Vec<u8> = Vec::new();

        strip_sectors(&mut Cursor::new(&image), &mut out, &track, |_| {}).unwrap();

        assert_eq!(out.len(), 2 * 2048);
        assert!(out[..2048].iter().all(|&b| b == 2));
        assert!(out[2048..].iter().all(|&b| b == 3));
    }

    #[test]
    fn seeking_past_end_is_fatal() {
        let image = raw_image(TrackMode::Mode1_2352, 1, 0);
        let track = DataTrack {
            mode: TrackMode::Mode1_2352,
            start: 3 * RAW as u64,
            end: 4 * RAW as u64,
        };
        let mut out: Vec<u8> = Vec::new();

        let err = strip_sectors(&mut Cursor::new(&image), &mut out, &track, |_| {}).unwrap_err();

        assert!(matches!(
            err,
            IsoError::SeekPastEnd {
                offset: 7056,
                reached: 2352
            }
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let image = raw_image(TrackMode::Mode1_2352, 4, 10);
        let track = whole_image(TrackMode::Mode1_2352, image.len());
        let mut reported = Vec::new();

        strip_sectors(&mut Cursor::new(&image), &mut Vec::<u8>::new(), &track, |p| {
            reported.push(p)
        })
        .unwrap();

        assert_eq!(reported.len(), 4);
        assert!(reported.windows(2).all(|w| w[0] <= w[1]));
        assert!(reported.iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert!(*reported.last().unwrap() < 1.0);
    }

    #[test]
    fn progress_reaches_one_when_drained() {
        let image = raw_image(TrackMode::Mode1_2352, 2, 0);
        let track = whole_image(TrackMode::Mode1_2352, image.len());
        let mut last = 0.0;

        strip_sectors(&mut Cursor::new(&image), &mut Vec::<u8>::new(), &track, |p| last = p).unwrap();

        assert_eq!(last, 1.0);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_errors_propagate() {
        let image = raw_image(TrackMode::Mode1_2352, 1, 0);
        let track = whole_image(TrackMode::Mode1_2352, image.len());

        let err = strip_sectors(&mut Cursor::new(&image), &mut FailingWriter, &track, |_| {})
            .unwrap_err();

        match err {
            IsoError::IoError(e) => assert_eq!(e.kind(), ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Hands out at most `chunk` bytes per read.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn short_reads_are_accumulated() {
        let image = raw_image(TrackMode::Mode1_2352, 3, 0);
        let track = DataTrack {
            mode: TrackMode::Mode1_2352,
            start: RAW as u64,
            end: image.len() as u64,
        };
        let mut reader = Trickle {
            data: &image,
            chunk: 100,
        };
        let mut out: Vec<u8> = Vec::new();

        let summary = strip_sectors(&mut reader, &mut out, &track, |_| {}).unwrap();

        assert_eq!(summary.completion, Completion::Drained);
        assert!(out[..2048].iter().all(|&b| b == 1));
        assert!(out[2048..].iter().all(|&b| b == 2));
    }
}
