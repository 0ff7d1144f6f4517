use crate::toc::error::{TocError, TocResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Number of slots in every map table and payload list.
pub const SLOT_COUNT: usize = 256;

/// Width of a title cell payload in bytes.
pub const TITLE_CELL_SIZE: usize = 7;

/// Which of the three (map table, payload list) pairs an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TocTable {
    Track,
    Title,
    Timestamp,
}

impl FromStr for TocTable {
    type Err = TocError;

    fn from_str(s: &str) -> TocResult<Self> {
        match s {
            "track" | "fragment" => Ok(TocTable::Track),
            "title" => Ok(TocTable::Title),
            "timestamp" => Ok(TocTable::Timestamp),
            _ => Err(TocError::UnknownTable(s.to_string())),
        }
    }
}

impl fmt::Display for TocTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TocTable::Track => write!(f, "track"),
            TocTable::Title => write!(f, "title"),
            TocTable::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Converts a raw link byte to an optional list index. `0` is the in-band
/// "no link" sentinel on the wire; everything past this function works with
/// `Option` instead.
pub fn link_target(raw: u8) -> Option<usize> {
    (raw != 0).then_some(raw as usize)
}

/// Position of a fragment boundary on disc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscAddress {
    /// Cluster number, 14 bits.
    pub cluster: u16,

    /// Sector within the cluster, 6 bits.
    pub sector: u8,

    /// Sound group within the sector, 4 bits.
    pub group: u8,
}

/// One contiguous run of recorded audio, linked into a per-track chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub start: DiscAddress,

    pub end: DiscAddress,

    /// Audio mode bits (recording format + SCMS), see [`crate::toc::mode`].
    pub mode: u8,

    /// Next fragment in the chain, 0 terminates.
    pub link: u8,
}

/// One cell of track title text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleCell {
    /// Exactly seven raw title bytes, displayed through the escape scheme
    /// in [`crate::toc::text`].
    pub title: [u8; TITLE_CELL_SIZE],

    /// Next title cell in the chain, 0 terminates.
    pub link: u8,
}

/// Recording timestamp of a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,

    /// Signature of the recorder that wrote this timestamp.
    pub signature: u16,

    /// Next timestamp in the chain, 0 terminates.
    pub link: u8,
}

impl Timestamp {
    /// Readable form of the recorded date, if the fields form a valid one.
    /// Two-digit years below 78 are taken as 20xx, the rest as 19xx.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let year = if self.year < 78 {
            2000 + i32::from(self.year)
        } else {
            1900 + i32::from(self.year)
        };
        NaiveDate::from_ymd_opt(year, u32::from(self.month), u32::from(self.day))?.and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }
}

/// The MiniDisc table of contents as decoded by the external codec: three
/// parallel (map table, payload list) pairs plus disc-level header fields.
///
/// Maps and lists hold up to [`SLOT_COUNT`] entries; shorter vectors are
/// padded at the display layer. This struct is the snapshot unit: edits
/// clone it wholesale and replace it, they never mutate in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toc {
    /// Number of tracks on the disc.
    pub n_tracks: u8,

    /// Signature of the device that last wrote the disc.
    pub device_signature: u16,

    /// Whether the disc holds any recorded content at all.
    pub disc_nonempty: bool,

    /// Head of the free-slot chain in the fragment list.
    pub free_fragment: u8,

    /// Head of the free-slot chain in the title cell list.
    pub free_title_cell: u8,

    /// Head of the free-slot chain in the timestamp list.
    pub free_timestamp: u8,

    /// Track slot to fragment chain head, 0 means unlinked.
    pub track_map: Vec<u8>,
    pub track_fragment_list: Vec<Fragment>,

    /// Track slot to title cell chain head, 0 means untitled.
    pub title_map: Vec<u8>,
    pub title_cell_list: Vec<TitleCell>,

    /// Track slot to timestamp chain head, 0 means unstamped.
    pub timestamp_map: Vec<u8>,
    pub timestamp_list: Vec<Timestamp>,
}

impl Toc {
    pub fn map(&self, table: TocTable) -> &[u8] {
        match table {
            TocTable::Track => &self.track_map,
            TocTable::Title => &self.title_map,
            TocTable::Timestamp => &self.timestamp_map,
        }
    }

    pub fn map_mut(&mut self, table: TocTable) -> &mut Vec<u8> {
        match table {
            TocTable::Track => &mut self.track_map,
            TocTable::Title => &mut self.title_map,
            TocTable::Timestamp => &mut self.timestamp_map,
        }
    }

    pub fn list_len(&self, table: TocTable) -> usize {
        match table {
            TocTable::Track => self.track_fragment_list.len(),
            TocTable::Title => self.title_cell_list.len(),
            TocTable::Timestamp => self.timestamp_list.len(),
        }
    }

    /// Raw link byte of the record at `index`, `None` past the list end.
    pub fn record_link(&self, table: TocTable, index: usize) -> Option<u8> {
        match table {
            TocTable::Track => self.track_fragment_list.get(index).map(|r| r.link),
            TocTable::Title => self.title_cell_list.get(index).map(|r| r.link),
            TocTable::Timestamp => self.timestamp_list.get(index).map(|r| r.link),
        }
    }

    /// Map entry of `slot`, treating entries past the map end as unlinked.
    pub fn map_entry(&self, table: TocTable, slot: usize) -> u8 {
        self.map(table).get(slot).copied().unwrap_or(0)
    }

    pub async fn load(path: impl AsRef<Path>) -> TocResult<Self> {
        let data = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> TocResult<()> {
        let data = serde_json::to_vec_pretty(self)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}

/// A user selection in the combined 512-cell addressing: map slots occupy
/// `0..=255` and payload-list slots `256..=511`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Map(u8),
    List(u8),
}

impl Selection {
    pub fn from_combined(index: u16) -> TocResult<Self> {
        match index {
            0..=255 => Ok(Selection::Map(index as u8)),
            256..=511 => Ok(Selection::List((index - 256) as u8)),
            _ => Err(TocError::SelectionOutOfRange(index)),
        }
    }

    /// The payload-list index this selection starts a chain from. Map slots
    /// follow their map entry; a resolved index of 0 means "no link" and
    /// yields `None`.
    pub fn resolve(&self, toc: &Toc, table: TocTable) -> Option<usize> {
        match self {
            Selection::Map(slot) => link_target(toc.map_entry(table, *slot as usize)),
            Selection::List(index) => link_target(*index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_target_treats_zero_as_sentinel() {
        assert_eq!(link_target(0), None);
        assert_eq!(link_target(1), Some(1));
        assert_eq!(link_target(255), Some(255));
    }

    #[test]
    fn combined_addressing_splits_at_256() {
        assert_eq!(Selection::from_combined(0).unwrap(), Selection::Map(0));
        assert_eq!(Selection::from_combined(255).unwrap(), Selection::Map(255));
        assert_eq!(Selection::from_combined(256).unwrap(), Selection::List(0));
        assert_eq!(Selection::from_combined(511).unwrap(), Selection::List(255));
        assert!(matches!(
            Selection::from_combined(512),
            Err(TocError::SelectionOutOfRange(512))
        ));
    }

    #[test]
    fn map_selection_follows_the_map_entry() {
        let mut toc = Toc::default();
        toc.track_map = vec![0, 5, 0];
        assert_eq!(
            Selection::Map(1).resolve(&toc, TocTable::Track),
            Some(5)
        );
        assert_eq!(Selection::Map(0).resolve(&toc, TocTable::Track), None);
        // Entries past the stored map length read as unlinked.
        assert_eq!(Selection::Map(200).resolve(&toc, TocTable::Track), None);
    }

    #[test]
    fn list_selection_of_slot_zero_is_no_link() {
        let toc = Toc::default();
        assert_eq!(Selection::List(0).resolve(&toc, TocTable::Track), None);
        assert_eq!(Selection::List(9).resolve(&toc, TocTable::Track), Some(9));
    }

    #[test]
    fn timestamp_date_conversion() {
        let ts = Timestamp {
            year: 3,
            month: 11,
            day: 24,
            hour: 13,
            minute: 5,
            second: 59,
            signature: 0x1234,
            link: 0,
        };
        let when = ts.to_naive().unwrap();
        assert_eq!(when.to_string(), "2003-11-24 13:05:59");

        let bad = Timestamp {
            month: 13,
            ..Timestamp::default()
        };
        assert!(bad.to_naive().is_none());
    }
}
