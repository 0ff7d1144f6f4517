use crate::commands::device::DeviceCommands;
use crate::commands::toc::TocCommands;
use crate::commands::{Cli, Commands};
use crate::device::BlobKind;
use anyhow::Result;
use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

mod commands;
mod device;
mod toc;

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

    let cli = Cli::parse();

    match cli.command {
        Commands::Toc(inner) => match inner {
            TocCommands::Show(cmd) => {
                toc::show_table(&cmd.snapshot, cmd.table, cmd.slot, cmd.frame).await?
            }
            TocCommands::Chain(cmd) => {
                toc::print_chain(&cmd.snapshot, cmd.table, cmd.index).await?
            }
            TocCommands::SetLink(cmd) => {
                toc::set_link(&cmd.snapshot, cmd.table, cmd.slot, cmd.link).await?
            }
            TocCommands::SetField(cmd) => {
                toc::set_field(&cmd.snapshot, cmd.table, cmd.slot, cmd.field, cmd.value).await?
            }
            TocCommands::SetTitle(cmd) => {
                toc::set_title(&cmd.snapshot, cmd.slot, &cmd.text, cmd.literal).await?
            }
            TocCommands::SetMode(cmd) => {
                toc::set_mode(&cmd.snapshot, cmd.slot, cmd.format, cmd.scms, cmd.raw).await?
            }
        },
        Commands::Device(inner) => match inner {
            DeviceCommands::Capabilities(cmd) => device::print_capabilities(&cmd.image).await?,
            DeviceCommands::ReadToc(cmd) => {
                device::read_toc_to_file(&cmd.image, &cmd.output).await?
            }
            DeviceCommands::WriteToc(cmd) => {
                device::write_toc_from_file(&cmd.image, &cmd.snapshot).await?
            }
            DeviceCommands::ReadRam(cmd) => {
                device::dump_blob(pb.clone(), &cmd.image, BlobKind::Ram, &cmd.output).await?
            }
            DeviceCommands::ReadFirmware(cmd) => {
                device::dump_blob(pb.clone(), &cmd.image, BlobKind::Firmware, &cmd.output).await?
            }
        },
    }

    Ok(())
}
