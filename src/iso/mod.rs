use crate::cue::models::CueSheet;
use crate::cue::{CueParser, bin_mismatch_warning};
use crate::iso::converter::strip_sectors;
use crate::iso::error::{IsoError, IsoResult};
use crate::iso::models::{Completion, ConversionSummary};
use crate::iso::resolver::{DataTrackResolver, FallbackResolver, SignatureResolver};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs::{File, Metadata};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tokio::{fs, task};

pub mod boundary;
pub mod converter;
pub mod error;
pub mod models;
pub mod resolver;

const IO_BUFFER_SIZE: usize = 8 * 1024 * 1024; // 8 MB buffer
const PROGRESS_SCALE: u64 = 10_000;

/// Parses the sheet from `cue`, finds the data track inside the `bin_size`
/// bytes of `bin`, and writes its 2048-byte payloads to `iso`.
pub fn convert<B, C, W, F>(
    bin: &mut B,
    cue: C,
    iso: &mut W,
    bin_size: u64,
    on_progress: F,
) -> IsoResult<ConversionSummary>
where
    B: Read + ?Sized,
    C: Read,
    W: Write + ?Sized,
    F: FnMut(f32),
{
    let mut sheet = CueParser::parse_reader(cue)?;
    convert_with(bin, &mut sheet, iso, bin_size, on_progress)
}

/// Same as [`convert`] with the data track located by any resolver.
pub fn convert_with<B, Res, W, F>(
    bin: &mut B,
    resolver: &mut Res,
    iso: &mut W,
    bin_size: u64,
    on_progress: F,
) -> IsoResult<ConversionSummary>
where
    B: Read + ?Sized,
    Res: DataTrackResolver + ?Sized,
    W: Write + ?Sized,
    F: FnMut(f32),
{
    let track = resolver.resolve_data_track(bin_size)?;

    debug!(
        "Stripping {} {} sectors from bytes {}..{}",
        track.sector_count(),
        track.mode,
        track.start,
        track.end
    );

    strip_sectors(bin, iso, &track, on_progress)
}

#[derive(Debug, Clone, Default)]
pub struct ConvertJob {
    /// A `.cue` sheet, or a raw image to convert without one.
    pub input: PathBuf,
    /// Overrides the BIN named by the sheet.
    pub bin: Option<PathBuf>,
    /// Defaults to the input path with an `.iso` extension.
    pub output: Option<PathBuf>,
    pub force: bool,
    /// Fall back to signature detection when the sheet has no usable data track.
    pub detect_fallback: bool,
}

pub async fn convert_to_iso(pb: MultiProgress, job: ConvertJob) -> IsoResult<ConversionSummary> {
    let sheet = if is_cue_path(&job.input) {
        debug!("Parsing CUE file: {:?}", job.input);
        Some(CueParser::new(&job.input).parse().await?)
    } else {
        None
    };

    let bin_path = match &sheet {
        Some(sheet) => locate_bin(&job.input, job.bin.clone(), sheet)?,
        None => {
            if job.bin.is_some() {
                warn!("--bin is only used together with a CUE sheet, ignoring it");
            }
            job.input.clone()
        }
    };

    let output_path = job
        .output
        .clone()
        .unwrap_or_else(|| job.input.with_extension("iso"));

    for input in [&bin_path, &job.input] {
        if is_same_file(&output_path, input).await? {
            return Err(IsoError::OutputIsInput(output_path));
        }
    }

    if fs::try_exists(&output_path).await? && !job.force {
        return Err(IsoError::IsoFileAlreadyExists(output_path));
    }

    let bin_size = fs::metadata(&bin_path).await?.len();

    debug!("Opening BIN file: {bin_path:?} ({bin_size} bytes)");

    let progress = pb.add(ProgressBar::new(PROGRESS_SCALE));
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% ({eta})",
        )?
        .progress_chars("#>-"),
    );

    let bar = progress.clone();
    let detect_fallback = job.detect_fallback;
    let iso_path = output_path.clone();

    let summary = task::spawn_blocking(move || -> IsoResult<ConversionSummary> {
        let mut resolver: Box<dyn DataTrackResolver> = match sheet {
            Some(sheet) if detect_fallback => Box::new(FallbackResolver::new(
                sheet,
                SignatureResolver::new(BufReader::new(File::open(&bin_path)?)),
            )),
            Some(sheet) => Box::new(sheet),
            None => Box::new(SignatureResolver::new(BufReader::new(File::open(
                &bin_path,
            )?))),
        };

        let track = resolver.resolve_data_track(bin_size)?;

        info!(
            "Converting {} track ({} sectors) from {bin_path:?} to {iso_path:?}",
            track.mode,
            track.sector_count()
        );

        let mut reader = BufReader::with_capacity(IO_BUFFER_SIZE, File::open(&bin_path)?);
        let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, File::create(&iso_path)?);

        let result = strip_sectors(&mut reader, &mut writer, &track, |fraction| {
            bar.set_position((fraction as f64 * PROGRESS_SCALE as f64) as u64)
        });

        if result.is_err() {
            drop(writer);
            if let Err(e) = std::fs::remove_file(&iso_path) {
                debug!("Could not remove incomplete ISO {iso_path:?}: {e}");
            }
        }

        result
    })
    .await?;

    progress.finish_and_clear();

    let summary = summary?;
    report_completion(&summary, &output_path);

    Ok(summary)
}

fn report_completion(summary: &ConversionSummary, output_path: &Path) {
    match summary.completion {
        Completion::Drained => {}
        Completion::TrailingPartialSector { discarded } => {
            warn!("Data track ends with a partial sector, {discarded} bytes were skipped")
        }
        Completion::EndOfInput { missing } => {
            warn!("BIN is {missing} bytes shorter than the data track, the ISO may be truncated")
        }
    }

    info!(
        "Wrote {} sectors ({} bytes) to {output_path:?}",
        summary.sectors_written, summary.bytes_written
    );
}

/// Compares resolved paths, so `..` segments, symlinks and hard links to an
/// input are all caught before the output is truncated.
async fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    if a == b {
        return Ok(true);
    }

    if !fs::try_exists(a).await? || !fs::try_exists(b).await? {
        return Ok(false);
    }

    if fs::canonicalize(a).await? == fs::canonicalize(b).await? {
        return Ok(true);
    }

    Ok(same_inode(&fs::metadata(a).await?, &fs::metadata(b).await?))
}

#[cfg(unix)]
fn same_inode(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_inode(_: &Metadata, _: &Metadata) -> bool {
    false
}

fn is_cue_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("cue"))
}

/// The BIN given on the command line wins over the sheet's FILE entry, but
/// a mismatch between the two is reported.
fn locate_bin(cue_path: &Path, selected: Option<PathBuf>, sheet: &CueSheet) -> IsoResult<PathBuf> {
    if sheet.file_count > 1 {
        warn!(
            "CUE sheet references {} files, only the first one is converted",
            sheet.file_count
        );
    }

    if let Some(selected) = selected {
        let selected_name = selected
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(warning) = bin_mismatch_warning(&selected_name, sheet.referenced_bin()) {
            warn!("{warning}");
        }

        return Ok(selected);
    }

    let referenced = sheet
        .referenced_bin()
        .ok_or(IsoError::NoFileReferencedInCueSheet)?;
    let cue_dir = cue_path.parent().unwrap_or(Path::new("."));

    Ok(cue_dir.join(referenced))
}
