use crate::commands::device::DeviceCommands;
use crate::commands::toc::TocCommands;
use clap::{Parser, Subcommand};

pub mod device;
pub mod toc;

/// CLI for inspecting, editing and writing back MiniDisc ToC structures.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and edit ToC snapshots
    #[command(subcommand)]
    Toc(TocCommands),

    /// Talk to a device service (an image directory)
    #[command(subcommand)]
    Device(DeviceCommands),
}
