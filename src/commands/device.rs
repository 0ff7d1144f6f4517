use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Commands talking to a device service
#[derive(Subcommand, Debug)]
pub enum DeviceCommands {
    Capabilities(CapabilitiesCommand),
    ReadToc(ReadTocCommand),
    WriteToc(WriteTocCommand),
    ReadRam(ReadRamCommand),
    ReadFirmware(ReadFirmwareCommand),
}

/// Query what the device service supports
#[derive(Parser, Debug)]
pub struct CapabilitiesCommand {
    /// Path to the device image directory
    #[arg(value_name = "IMAGE_DIR")]
    pub image: PathBuf,
}

/// Read the ToC from the device into a snapshot file
#[derive(Parser, Debug)]
pub struct ReadTocCommand {
    /// Path to the device image directory
    #[arg(value_name = "IMAGE_DIR")]
    pub image: PathBuf,

    /// Output snapshot file path
    #[arg(long, short = 'o', value_name = "OUTPUT", default_value = "toc-snapshot.json")]
    pub output: PathBuf,
}

/// Write a snapshot file back to the device
#[derive(Parser, Debug)]
#[command(
    long_about = "Write a snapshot file back to the device\n\nRefused when the service does not report ToC write capability"
)]
pub struct WriteTocCommand {
    /// Path to the device image directory
    #[arg(value_name = "IMAGE_DIR")]
    pub image: PathBuf,

    /// Snapshot file to write back
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,
}

/// Dump the device RAM to a file
#[derive(Parser, Debug)]
pub struct ReadRamCommand {
    /// Path to the device image directory
    #[arg(value_name = "IMAGE_DIR")]
    pub image: PathBuf,

    /// Output file path
    #[arg(long, short = 'o', value_name = "OUTPUT", default_value = "ram.bin")]
    pub output: PathBuf,
}

/// Dump the device firmware to a file
#[derive(Parser, Debug)]
pub struct ReadFirmwareCommand {
    /// Path to the device image directory
    #[arg(value_name = "IMAGE_DIR")]
    pub image: PathBuf,

    /// Output file path
    #[arg(long, short = 'o', value_name = "OUTPUT", default_value = "firmware.bin")]
    pub output: PathBuf,
}
