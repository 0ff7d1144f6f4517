use crate::toc::mode::{RecordingFormat, ScmsStatus};
use crate::toc::models::TocTable;
use crate::toc::mutate::Field;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Commands operating on a ToC snapshot file
#[derive(Subcommand, Debug)]
pub enum TocCommands {
    Show(ShowCommand),
    Chain(ChainCommand),
    SetLink(SetLinkCommand),
    SetField(SetFieldCommand),
    SetTitle(SetTitleCommand),
    SetMode(SetModeCommand),
}

/// Print the classified 16x16 grid of one table, or one slot in detail
#[derive(Parser, Debug)]
pub struct ShowCommand {
    /// Path to the ToC snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Table to show: track, title or timestamp
    #[arg(long, short = 't', default_value = "track", value_parser = TocTable::from_str)]
    pub table: TocTable,

    /// Show this payload-list slot in full instead of the grid
    #[arg(long, short = 's', value_name = "SLOT")]
    pub slot: Option<usize>,

    /// Animation frame: which tag multi-tagged cells display
    #[arg(long, short = 'f', value_name = "FRAME", default_value_t = 0)]
    pub frame: u64,
}

/// Resolve the highlight chain of a selection
#[derive(Parser, Debug)]
#[command(
    long_about = "Resolve the highlight chain of a selection\n\nSelections use combined addressing: 0-255 picks a map slot (the chain starts at its map entry), 256-511 picks a payload-list slot directly"
)]
pub struct ChainCommand {
    /// Path to the ToC snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Table to resolve in: track, title or timestamp
    #[arg(long, short = 't', default_value = "track", value_parser = TocTable::from_str)]
    pub table: TocTable,

    /// Selected cell in combined addressing (0-511)
    #[arg(value_name = "INDEX")]
    pub index: u16,
}

/// Point a map slot at a new chain head
#[derive(Parser, Debug)]
pub struct SetLinkCommand {
    /// Path to the ToC snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Table whose map to edit
    #[arg(long, short = 't', default_value = "track", value_parser = TocTable::from_str)]
    pub table: TocTable,

    /// Map slot to edit (0-255)
    #[arg(value_name = "SLOT")]
    pub slot: usize,

    /// New chain head, 0 unlinks the slot
    #[arg(value_name = "LINK")]
    pub link: u8,
}

/// Set one numeric field of a payload-list record
#[derive(Parser, Debug)]
#[command(
    long_about = "Set one numeric field of a payload-list record\n\nFields: start.cluster, start.sector, start.group, end.cluster, end.sector, end.group, mode, link (track table); link (title table); year, month, day, hour, minute, second, signature, link (timestamp table)"
)]
pub struct SetFieldCommand {
    /// Path to the ToC snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Table whose list to edit
    #[arg(long, short = 't', default_value = "track", value_parser = TocTable::from_str)]
    pub table: TocTable,

    /// Payload-list slot to edit (0-255)
    #[arg(value_name = "SLOT")]
    pub slot: usize,

    /// Field name, e.g. start.cluster
    #[arg(value_name = "FIELD", value_parser = Field::from_str)]
    pub field: Field,

    /// New value; rejected when it exceeds the field's bit width
    #[arg(value_name = "VALUE")]
    pub value: u32,
}

/// Set the text of a title cell
#[derive(Parser, Debug)]
#[command(
    long_about = "Set the text of a title cell\n\nThe text uses the escape scheme: printable ASCII literally, backslash doubled, any other byte as \\xx with two hex digits. It must decode to exactly 7 bytes. With --literal the text is taken as-is and escaped for you"
)]
pub struct SetTitleCommand {
    /// Path to the ToC snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Title cell slot to edit (0-255)
    #[arg(value_name = "SLOT")]
    pub slot: usize,

    /// Escaped title text, 7 bytes once decoded
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Treat TEXT as literal characters and escape it automatically
    #[arg(long, short = 'l', default_value_t = false)]
    pub literal: bool,
}

/// Edit the mode byte of a fragment through its semantic views
#[derive(Parser, Debug)]
pub struct SetModeCommand {
    /// Path to the ToC snapshot file
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Fragment slot to edit (0-255)
    #[arg(value_name = "SLOT")]
    pub slot: usize,

    /// Recording format: sp-stereo, sp-mono, lp2 or lp4
    #[arg(long, value_parser = RecordingFormat::from_str)]
    pub format: Option<RecordingFormat>,

    /// SCMS copy status: unlimited, one-copy or no-copies
    #[arg(long, value_parser = ScmsStatus::from_str)]
    pub scms: Option<ScmsStatus>,

    /// Start from this raw mode byte instead of the current one
    #[arg(long, value_name = "BYTE")]
    pub raw: Option<u8>,
}
