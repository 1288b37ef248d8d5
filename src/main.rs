use crate::commands::{Cli, Commands};
use anyhow::Result;
use bincue2iso::detect::inspect_image;
use bincue2iso::iso::convert_to_iso;
use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{debug, info, warn};

mod commands;

pub mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let pb = MultiProgress::new();

    LogWrapper::new(pb.clone(), logger).try_init()?;
    log::set_max_level(level);

    debug!(
        "{} v{} ({})",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::TARGET
    );

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(cmd) => {
            convert_to_iso(pb.clone(), cmd.into()).await?;
        }
        Commands::Detect(cmd) => {
            let report = inspect_image(cmd.image.clone()).await?;

            match report.mode {
                Some(mode) => info!("{:?}: detected track mode {mode}", cmd.image),
                None => warn!("{:?}: no ISO 9660 volume descriptor found", cmd.image),
            }

            if report.playstation {
                info!("{:?}: PlayStation boot marker found", cmd.image);
            }
        }
    }

    Ok(())
}
