//! Slot classification for the table grid view.
//!
//! Each of the 256 payload-list slots collects zero or more display tags
//! from a sequence of per-table passes; a slot that ends up with no tag is
//! shown as unused, and slots past the snapshot's actual list length are
//! shown as pad cells. The grid cycles through a slot's tags on a timer,
//! see [`rotation_period`].

use crate::toc::mode::RecordingFormat;
use crate::toc::models::{SLOT_COUNT, Toc, TocTable, link_target};
use std::collections::BTreeSet;

/// Display colors used by the grid renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    Blue,
    Red,
    Green,
    Gray,
}

impl CellColor {
    pub fn name(&self) -> &'static str {
        match self {
            CellColor::Blue => "blue",
            CellColor::Red => "red",
            CellColor::Green => "green",
            CellColor::Gray => "gray",
        }
    }
}

/// One classification tag attached to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellTag {
    pub label: char,
    pub color: CellColor,
    pub name: &'static str,
}

pub const TAG_ROOT: CellTag = CellTag {
    label: 'R',
    color: CellColor::Blue,
    name: "chain root",
};

pub const TAG_ORPHAN: CellTag = CellTag {
    label: 'U',
    color: CellColor::Red,
    name: "used but unreachable",
};

pub const TAG_LINKED: CellTag = CellTag {
    label: 'L',
    color: CellColor::Green,
    name: "link target",
};

pub const TAG_SP_STEREO: CellTag = CellTag {
    label: 'S',
    color: CellColor::Blue,
    name: "SP stereo",
};

pub const TAG_SP_MONO: CellTag = CellTag {
    label: 'M',
    color: CellColor::Blue,
    name: "SP mono",
};

pub const TAG_LP2: CellTag = CellTag {
    label: '2',
    color: CellColor::Blue,
    name: "LP2",
};

pub const TAG_LP4: CellTag = CellTag {
    label: '4',
    color: CellColor::Blue,
    name: "LP4",
};

pub const TAG_TITLE: CellTag = CellTag {
    label: 'T',
    color: CellColor::Blue,
    name: "has title text",
};

pub const TAG_TIMESTAMP: CellTag = CellTag {
    label: 'T',
    color: CellColor::Blue,
    name: "has timestamp",
};

pub const TAG_UNUSED: CellTag = CellTag {
    label: 'U',
    color: CellColor::Gray,
    name: "unused",
};

pub const TAG_PAD: CellTag = CellTag {
    label: '?',
    color: CellColor::Red,
    name: "beyond stored list",
};

/// Classified view of one (map table, payload list) pair, always
/// [`SLOT_COUNT`] cells wide on both sides.
#[derive(Debug, Clone)]
pub struct TableView {
    pub table: TocTable,

    /// Map entries; `None` marks cells past the snapshot's stored map.
    pub map_cells: Vec<Option<u8>>,

    /// Tag lists per payload-list slot, each guaranteed nonempty.
    pub slots: Vec<Vec<CellTag>>,
}

/// Per-slot facts the passes classify on.
struct SlotInfo {
    mode: u8,
    nonempty: bool,
    in_map: bool,
    is_link_target: bool,
}

pub fn classify(toc: &Toc, table: TocTable) -> TableView {
    let mapped: BTreeSet<usize> = toc
        .map(table)
        .iter()
        .filter_map(|&raw| link_target(raw))
        .collect();

    let link_targets: BTreeSet<usize> = (0..toc.list_len(table))
        .filter_map(|i| toc.record_link(table, i).and_then(link_target))
        .collect();

    let list_len = toc.list_len(table).min(SLOT_COUNT);
    let mut slots = Vec::with_capacity(SLOT_COUNT);

    for index in 0..SLOT_COUNT {
        if index >= list_len {
            slots.push(vec![TAG_PAD]);
            continue;
        }

        let info = SlotInfo {
            mode: match table {
                TocTable::Track => toc.track_fragment_list[index].mode,
                _ => 0,
            },
            nonempty: slot_nonempty(toc, table, index),
            in_map: mapped.contains(&index),
            is_link_target: link_targets.contains(&index),
        };

        let mut tags = match table {
            TocTable::Track => classify_track_slot(&info),
            TocTable::Title => classify_title_slot(&info),
            TocTable::Timestamp => classify_timestamp_slot(&info),
        };
        if tags.is_empty() {
            tags.push(TAG_UNUSED);
        }
        slots.push(tags);
    }

    let map_cells = (0..SLOT_COUNT)
        .map(|slot| toc.map(table).get(slot).copied())
        .collect();

    TableView {
        table,
        map_cells,
        slots,
    }
}

fn slot_nonempty(toc: &Toc, table: TocTable, index: usize) -> bool {
    match table {
        TocTable::Track => toc.track_fragment_list[index].mode != 0,
        TocTable::Title => toc.title_cell_list[index].title.iter().any(|&b| b != 0),
        TocTable::Timestamp => {
            let ts = &toc.timestamp_list[index];
            ts.year != 0
                || ts.month != 0
                || ts.day != 0
                || ts.hour != 0
                || ts.minute != 0
                || ts.second != 0
                || ts.signature != 0
                || ts.link != 0
        }
    }
}

/// Track passes: the link-target pass is independent, the remaining ones
/// cascade so a slot gets exactly one of R / U / format tag.
fn classify_track_slot(info: &SlotInfo) -> Vec<CellTag> {
    let mut tags = Vec::new();

    if info.is_link_target {
        tags.push(TAG_LINKED);
    }

    if info.mode != 0 {
        if !info.is_link_target && info.in_map {
            tags.push(TAG_ROOT);
        } else if !info.is_link_target && !info.in_map {
            tags.push(TAG_ORPHAN);
        } else {
            tags.push(match RecordingFormat::from_mode(info.mode) {
                RecordingFormat::SpStereo => TAG_SP_STEREO,
                RecordingFormat::SpMono => TAG_SP_MONO,
                RecordingFormat::Lp2 => TAG_LP2,
                RecordingFormat::Lp4 => TAG_LP4,
            });
        }
    }

    tags
}

fn classify_title_slot(info: &SlotInfo) -> Vec<CellTag> {
    let mut tags = Vec::new();

    if info.nonempty {
        tags.push(TAG_TITLE);
        if !info.in_map && !info.is_link_target {
            tags.push(TAG_ORPHAN);
        }
    }

    tags
}

fn classify_timestamp_slot(info: &SlotInfo) -> Vec<CellTag> {
    if info.nonempty {
        vec![TAG_TIMESTAMP]
    } else {
        vec![TAG_UNUSED]
    }
}

/// Length of the display cycle that shows every tag of every slot for an
/// equal duration: the least common multiple of all per-slot tag counts.
pub fn rotation_period(view: &TableView) -> u64 {
    view.slots
        .iter()
        .map(|tags| tags.len() as u64)
        .fold(1, lcm)
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn lcm(a: u64, b: u64) -> u64 {
    a / gcd(a, b) * b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::mode::{F_SP_MODE, F_STEREO};
    use crate::toc::models::Fragment;

    fn toc_with_fragments(map: Vec<u8>, fragments: Vec<Fragment>) -> Toc {
        Toc {
            track_map: map,
            track_fragment_list: fragments,
            ..Toc::default()
        }
    }

    fn fragment(mode: u8, link: u8) -> Fragment {
        Fragment {
            mode,
            link,
            ..Fragment::default()
        }
    }

    #[test]
    fn every_slot_gets_at_least_one_tag() {
        let toc = toc_with_fragments(
            vec![0, 2, 0],
            vec![
                fragment(0, 0),
                fragment(F_SP_MODE | F_STEREO, 0),
                fragment(F_SP_MODE, 3),
                fragment(F_STEREO, 0),
            ],
        );
        for table in [TocTable::Track, TocTable::Title, TocTable::Timestamp] {
            let view = classify(&toc, table);
            assert_eq!(view.slots.len(), SLOT_COUNT);
            assert!(view.slots.iter().all(|tags| !tags.is_empty()));
        }
    }

    #[test]
    fn short_lists_pad_with_sentinel_cells() {
        let toc = toc_with_fragments(vec![0, 1], vec![fragment(0, 0), fragment(1, 0)]);
        let view = classify(&toc, TocTable::Track);
        assert_eq!(view.slots[200], vec![TAG_PAD]);
        assert_eq!(view.map_cells[0], Some(0));
        assert_eq!(view.map_cells[200], None);
    }

    #[test]
    fn root_orphan_and_format_tags_are_exclusive() {
        // Slot 1: mapped root. Slot 2: orphan. Slot 3: linked from slot 2.
        let toc = toc_with_fragments(
            vec![0, 1, 0],
            vec![
                fragment(0, 0),
                fragment(F_SP_MODE | F_STEREO, 0),
                fragment(F_SP_MODE, 3),
                fragment(F_STEREO, 0),
            ],
        );
        let view = classify(&toc, TocTable::Track);

        let exclusive = ['R', 'S', 'M', '2', '4'];
        for tags in &view.slots {
            let hits = tags
                .iter()
                .filter(|t| exclusive.contains(&t.label))
                .count();
            assert!(hits <= 1, "conflicting tags: {tags:?}");
        }

        assert_eq!(view.slots[1], vec![TAG_ROOT]);
        assert_eq!(view.slots[2], vec![TAG_ORPHAN]);
        // Slot 3 is both a link target and classified by its mode bits.
        assert_eq!(view.slots[3], vec![TAG_LINKED, TAG_LP2]);
    }

    #[test]
    fn title_slots_classify_on_content_and_reachability() {
        let mut toc = Toc::default();
        toc.title_map = vec![0, 1];
        toc.title_cell_list = vec![
            crate::toc::models::TitleCell::default(),
            crate::toc::models::TitleCell {
                title: *b"HELLO\0\0",
                link: 0,
            },
            crate::toc::models::TitleCell {
                title: *b"LOST\0\0\0",
                link: 0,
            },
        ];
        let view = classify(&toc, TocTable::Title);
        assert_eq!(view.slots[0], vec![TAG_UNUSED]);
        assert_eq!(view.slots[1], vec![TAG_TITLE]);
        assert_eq!(view.slots[2], vec![TAG_TITLE, TAG_ORPHAN]);
    }

    #[test]
    fn rotation_period_is_the_lcm_of_tag_counts() {
        let toc = toc_with_fragments(
            vec![0, 1, 0],
            vec![
                fragment(0, 0),
                fragment(F_SP_MODE | F_STEREO, 0),
                fragment(F_SP_MODE, 3),
                fragment(F_STEREO, 0),
            ],
        );
        let view = classify(&toc, TocTable::Track);
        // Slot 3 carries two tags, everything else one.
        assert_eq!(rotation_period(&view), 2);

        let empty = classify(&Toc::default(), TocTable::Track);
        assert_eq!(rotation_period(&empty), 1);
    }
}
