//! Copy-on-write edits of a ToC snapshot.
//!
//! Every mutation clones the whole aggregate, patches one field and returns
//! the new snapshot; the input is never touched. [`TocEditor`] wraps the
//! current snapshot together with the unsaved-changes flag.

use crate::toc::error::{TocError, TocResult};
use crate::toc::models::{SLOT_COUNT, TITLE_CELL_SIZE, Toc, TocTable};
use crate::toc::text;
use std::str::FromStr;

/// Editable numeric fields of payload-list records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    StartCluster,
    StartSector,
    StartGroup,
    EndCluster,
    EndSector,
    EndGroup,
    Mode,
    Link,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Signature,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::StartCluster => "start.cluster",
            Field::StartSector => "start.sector",
            Field::StartGroup => "start.group",
            Field::EndCluster => "end.cluster",
            Field::EndSector => "end.sector",
            Field::EndGroup => "end.group",
            Field::Mode => "mode",
            Field::Link => "link",
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Signature => "signature",
        }
    }

    /// Inclusive upper bound matching the bit width of the field.
    pub fn max(&self) -> u32 {
        match self {
            Field::StartCluster | Field::EndCluster => 0x3fff,
            Field::StartSector | Field::EndSector => 0x3f,
            Field::StartGroup | Field::EndGroup => 0xf,
            Field::Signature => 0xffff,
            _ => 0xff,
        }
    }
}

impl FromStr for Field {
    type Err = TocError;

    fn from_str(s: &str) -> TocResult<Self> {
        match s {
            "start.cluster" => Ok(Field::StartCluster),
            "start.sector" => Ok(Field::StartSector),
            "start.group" => Ok(Field::StartGroup),
            "end.cluster" => Ok(Field::EndCluster),
            "end.sector" => Ok(Field::EndSector),
            "end.group" => Ok(Field::EndGroup),
            "mode" => Ok(Field::Mode),
            "link" => Ok(Field::Link),
            "year" => Ok(Field::Year),
            "month" => Ok(Field::Month),
            "day" => Ok(Field::Day),
            "hour" => Ok(Field::Hour),
            "minute" => Ok(Field::Minute),
            "second" => Ok(Field::Second),
            "signature" => Ok(Field::Signature),
            _ => Err(TocError::UnknownField(s.to_string())),
        }
    }
}

/// New snapshot with `map[slot]` replaced. The link value itself is not
/// validated here; the write-back codec owns deep chain validation.
pub fn with_link(toc: &Toc, table: TocTable, slot: usize, new_link: u8) -> TocResult<Toc> {
    if slot >= SLOT_COUNT {
        return Err(TocError::SlotOutOfRange(slot));
    }

    let mut next = toc.clone();
    let map = next.map_mut(table);
    if map.len() <= slot {
        map.resize(slot + 1, 0);
    }
    map[slot] = new_link;
    Ok(next)
}

/// New snapshot with one named field of `list[slot]` replaced. Values are
/// bound-checked against the field's bit width and rejected with
/// [`TocError::ValueOutOfRange`].
pub fn with_field(
    toc: &Toc,
    table: TocTable,
    slot: usize,
    field: Field,
    value: u32,
) -> TocResult<Toc> {
    if slot >= SLOT_COUNT {
        return Err(TocError::SlotOutOfRange(slot));
    }
    if value > field.max() {
        return Err(TocError::ValueOutOfRange {
            field: field.name(),
            value,
            max: field.max(),
        });
    }

    let mut next = toc.clone();
    match table {
        TocTable::Track => {
            let list = &mut next.track_fragment_list;
            if list.len() <= slot {
                list.resize(slot + 1, Default::default());
            }
            let record = &mut list[slot];
            match field {
                Field::StartCluster => record.start.cluster = value as u16,
                Field::StartSector => record.start.sector = value as u8,
                Field::StartGroup => record.start.group = value as u8,
                Field::EndCluster => record.end.cluster = value as u16,
                Field::EndSector => record.end.sector = value as u8,
                Field::EndGroup => record.end.group = value as u8,
                Field::Mode => record.mode = value as u8,
                Field::Link => record.link = value as u8,
                _ => {
                    return Err(TocError::FieldNotInTable {
                        field: field.name(),
                        table: table.to_string(),
                    });
                }
            }
        }
        TocTable::Title => {
            let list = &mut next.title_cell_list;
            if list.len() <= slot {
                list.resize(slot + 1, Default::default());
            }
            match field {
                Field::Link => list[slot].link = value as u8,
                _ => {
                    return Err(TocError::FieldNotInTable {
                        field: field.name(),
                        table: table.to_string(),
                    });
                }
            }
        }
        TocTable::Timestamp => {
            let list = &mut next.timestamp_list;
            if list.len() <= slot {
                list.resize(slot + 1, Default::default());
            }
            let record = &mut list[slot];
            match field {
                Field::Year => record.year = value as u8,
                Field::Month => record.month = value as u8,
                Field::Day => record.day = value as u8,
                Field::Hour => record.hour = value as u8,
                Field::Minute => record.minute = value as u8,
                Field::Second => record.second = value as u8,
                Field::Signature => record.signature = value as u16,
                Field::Link => record.link = value as u8,
                _ => {
                    return Err(TocError::FieldNotInTable {
                        field: field.name(),
                        table: table.to_string(),
                    });
                }
            }
        }
    }
    Ok(next)
}

/// New snapshot with the title cell at `slot` replaced by the decoded
/// escape text. The decoded value must be exactly 7 bytes: fewer asks the
/// user to pad, more is rejected.
pub fn with_title(toc: &Toc, slot: usize, escaped: &str) -> TocResult<Toc> {
    if slot >= SLOT_COUNT {
        return Err(TocError::SlotOutOfRange(slot));
    }

    let bytes = text::unescape(escaped)?;
    if bytes.len() < TITLE_CELL_SIZE {
        return Err(TocError::TitleTooShort(bytes.len()));
    }
    if bytes.len() > TITLE_CELL_SIZE {
        return Err(TocError::TitleTooLong(bytes.len()));
    }

    let mut next = toc.clone();
    let list = &mut next.title_cell_list;
    if list.len() <= slot {
        list.resize(slot + 1, Default::default());
    }
    list[slot].title.copy_from_slice(&bytes);
    Ok(next)
}

/// Owns the current snapshot and tracks unsaved edits. Each successful
/// edit replaces the snapshot wholesale.
#[derive(Debug, Clone)]
pub struct TocEditor {
    toc: Toc,
    modified: bool,
}

impl TocEditor {
    pub fn new(toc: Toc) -> Self {
        Self {
            toc,
            modified: false,
        }
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_link(&mut self, table: TocTable, slot: usize, new_link: u8) -> TocResult<()> {
        self.toc = with_link(&self.toc, table, slot, new_link)?;
        self.modified = true;
        Ok(())
    }

    pub fn set_field(
        &mut self,
        table: TocTable,
        slot: usize,
        field: Field,
        value: u32,
    ) -> TocResult<()> {
        self.toc = with_field(&self.toc, table, slot, field, value)?;
        self.modified = true;
        Ok(())
    }

    pub fn set_title(&mut self, slot: usize, escaped: &str) -> TocResult<()> {
        self.toc = with_title(&self.toc, slot, escaped)?;
        self.modified = true;
        Ok(())
    }

    /// Snapshot handed to the device writer; clears the unsaved-changes
    /// flag.
    pub fn take_for_write(&mut self) -> Toc {
        self.modified = false;
        self.toc.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::models::Fragment;

    fn sample_toc() -> Toc {
        Toc {
            n_tracks: 1,
            track_map: vec![0, 2, 0],
            track_fragment_list: vec![
                Fragment::default(),
                Fragment::default(),
                Fragment {
                    mode: 0x03,
                    link: 0,
                    ..Fragment::default()
                },
            ],
            ..Toc::default()
        }
    }

    #[test]
    fn with_link_replaces_one_map_entry() {
        let toc = sample_toc();
        let next = with_link(&toc, TocTable::Track, 1, 7).unwrap();
        assert_eq!(next.track_map, vec![0, 7, 0]);
        // Copy-on-write: the input snapshot is untouched.
        assert_eq!(toc.track_map, vec![0, 2, 0]);
    }

    #[test]
    fn with_link_extends_a_short_map() {
        let toc = sample_toc();
        let next = with_link(&toc, TocTable::Title, 4, 9).unwrap();
        assert_eq!(next.title_map, vec![0, 0, 0, 0, 9]);
        assert!(matches!(
            with_link(&toc, TocTable::Track, 256, 1),
            Err(TocError::SlotOutOfRange(256))
        ));
    }

    #[test]
    fn with_field_updates_in_bounds_values() {
        let toc = sample_toc();
        let next = with_field(&toc, TocTable::Track, 2, Field::StartCluster, 0x3fff).unwrap();
        assert_eq!(next.track_fragment_list[2].start.cluster, 0x3fff);
        assert_eq!(toc.track_fragment_list[2].start.cluster, 0);
    }

    #[test]
    fn with_field_rejects_out_of_range_values() {
        let toc = sample_toc();
        let err = with_field(&toc, TocTable::Track, 2, Field::StartSector, 0x40).unwrap_err();
        assert!(matches!(
            err,
            TocError::ValueOutOfRange {
                field: "start.sector",
                value: 0x40,
                max: 0x3f,
            }
        ));
    }

    #[test]
    fn with_field_rejects_fields_foreign_to_the_table() {
        let toc = sample_toc();
        assert!(matches!(
            with_field(&toc, TocTable::Timestamp, 1, Field::Mode, 1),
            Err(TocError::FieldNotInTable { .. })
        ));
        assert!(matches!(
            with_field(&toc, TocTable::Title, 1, Field::Year, 1),
            Err(TocError::FieldNotInTable { .. })
        ));
        // Link is editable everywhere.
        assert!(with_field(&toc, TocTable::Title, 1, Field::Link, 3).is_ok());
    }

    #[test]
    fn with_title_requires_exactly_seven_bytes() {
        let toc = sample_toc();

        let err = with_title(&toc, 1, "AB").unwrap_err();
        assert!(matches!(err, TocError::TitleTooShort(2)));

        let err = with_title(&toc, 1, "ABCDEFGH").unwrap_err();
        assert!(matches!(err, TocError::TitleTooLong(8)));

        let next = with_title(&toc, 1, "AB\\00CD\\ffE").unwrap();
        assert_eq!(
            next.title_cell_list[1].title,
            [b'A', b'B', 0, b'C', b'D', 0xff, b'E']
        );
    }

    #[test]
    fn with_title_rejects_malformed_escapes_without_committing() {
        let toc = sample_toc();
        assert!(with_title(&toc, 1, "ABCDEF\\").is_err());
        assert_eq!(toc, sample_toc());
    }

    #[test]
    fn editor_tracks_the_modified_flag() {
        let mut editor = TocEditor::new(sample_toc());
        assert!(!editor.is_modified());

        editor.set_link(TocTable::Track, 1, 9).unwrap();
        assert!(editor.is_modified());
        assert_eq!(editor.toc().track_map[1], 9);

        let written = editor.take_for_write();
        assert_eq!(written.track_map[1], 9);
        assert!(!editor.is_modified());

        // A failed edit leaves both the snapshot and the flag alone.
        assert!(editor.set_title(0, "X").is_err());
        assert!(!editor.is_modified());
    }
}
