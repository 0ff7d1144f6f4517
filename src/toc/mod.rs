use crate::toc::classify::{TableView, classify, rotation_period};
use crate::toc::error::{TocError, TocResult};
use crate::toc::links::resolve_chain;
use crate::toc::mode::{RecordingFormat, ScmsStatus};
use crate::toc::models::{SLOT_COUNT, Selection, Toc, TocTable};
use crate::toc::mutate::{Field, TocEditor};
use log::{debug, info};
use std::path::Path;

pub mod classify;
pub mod error;
pub mod links;
pub mod mode;
pub mod models;
pub mod mutate;
pub mod text;

const GRID_WIDTH: usize = 16;

/// Prints the classified 16x16 grid of one table, or the full detail of a
/// single slot. `frame` selects which tag multi-tagged cells show, the way
/// the grid animation cycles through them.
pub async fn show_table(
    snapshot: &Path,
    table: TocTable,
    slot: Option<usize>,
    frame: u64,
) -> TocResult<()> {
    let toc = Toc::load(snapshot).await?;

    if let Some(slot) = slot {
        return show_slot(&toc, table, slot);
    }

    let view = classify(&toc, table);

    println!(
        "disc: {} tracks, signature {:#06x}, {}",
        toc.n_tracks,
        toc.device_signature,
        if toc.disc_nonempty { "non-empty" } else { "empty" }
    );
    println!(
        "free chain heads: fragment {} / title cell {} / timestamp {}",
        toc.free_fragment, toc.free_title_cell, toc.free_timestamp
    );

    println!("\n{table} map:");
    print!("{}", render_map_grid(&view));

    println!("\n{table} list:");
    print!("{}", render_slot_grid(&view, frame));

    println!("\nlegend:");
    for tag in legend(&view) {
        println!("  {} ({}) - {}", tag.label, tag.color.name(), tag.name);
    }
    println!("display cycle: {} frames", rotation_period(&view));

    Ok(())
}

fn show_slot(toc: &Toc, table: TocTable, slot: usize) -> TocResult<()> {
    if slot >= SLOT_COUNT {
        return Err(TocError::SlotOutOfRange(slot));
    }

    let view = classify(toc, table);
    let tags: Vec<String> = view.slots[slot]
        .iter()
        .map(|t| format!("{} ({})", t.name, t.color.name()))
        .collect();

    println!("{table} slot {slot}: {}", tags.join(", "));
    println!("map entry: {}", toc.map_entry(table, slot));

    match table {
        TocTable::Track => {
            if let Some(f) = toc.track_fragment_list.get(slot) {
                println!(
                    "start: cluster {:#06x} sector {:#04x} group {:#x}",
                    f.start.cluster, f.start.sector, f.start.group
                );
                println!(
                    "end:   cluster {:#06x} sector {:#04x} group {:#x}",
                    f.end.cluster, f.end.sector, f.end.group
                );
                println!(
                    "mode: {:#04x} ({}, SCMS {})",
                    f.mode,
                    RecordingFormat::from_mode(f.mode),
                    ScmsStatus::from_mode(f.mode)
                );
                println!("link: {}", f.link);
            }
        }
        TocTable::Title => {
            if let Some(cell) = toc.title_cell_list.get(slot) {
                println!("title: \"{}\"", text::escape(&cell.title));
                println!("link: {}", cell.link);
            }
        }
        TocTable::Timestamp => {
            if let Some(ts) = toc.timestamp_list.get(slot) {
                match ts.to_naive() {
                    Some(when) => println!("recorded: {when}"),
                    None => println!(
                        "recorded: invalid ({:02}-{:02}-{:02} {:02}:{:02}:{:02})",
                        ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second
                    ),
                }
                println!("signature: {:#06x}", ts.signature);
                println!("link: {}", ts.link);
            }
        }
    }

    Ok(())
}

/// Resolves the highlight chain of a combined-addressing selection and
/// prints the participating list slots.
pub async fn print_chain(snapshot: &Path, table: TocTable, index: u16) -> TocResult<()> {
    let toc = Toc::load(snapshot).await?;
    let selection = Selection::from_combined(index)?;
    let chain = resolve_chain(&toc, table, selection);

    if chain.is_empty() {
        println!("no chain from selection {index}");
    } else {
        let slots: Vec<String> = chain.iter().map(|i| i.to_string()).collect();
        println!("chain slots: {}", slots.join(" "));
    }

    Ok(())
}

pub async fn set_link(snapshot: &Path, table: TocTable, slot: usize, link: u8) -> TocResult<()> {
    let mut editor = TocEditor::new(Toc::load(snapshot).await?);
    editor.set_link(table, slot, link)?;
    editor.take_for_write().save(snapshot).await?;
    info!("{table} map slot {slot} now links to {link}");
    Ok(())
}

pub async fn set_field(
    snapshot: &Path,
    table: TocTable,
    slot: usize,
    field: Field,
    value: u32,
) -> TocResult<()> {
    let mut editor = TocEditor::new(Toc::load(snapshot).await?);
    editor.set_field(table, slot, field, value)?;
    editor.take_for_write().save(snapshot).await?;
    info!("{table} list slot {slot}: {} = {value:#x}", field.name());
    Ok(())
}

/// Commits a title to a title cell. `literal` input is run through the
/// escape scheme first; otherwise the text is taken as already escaped.
/// Over-long input is dropped without an error, matching the editor's
/// input policy; everything else surfaces.
pub async fn set_title(snapshot: &Path, slot: usize, text: &str, literal: bool) -> TocResult<()> {
    let escaped = if literal {
        text::escape_text(text)
    } else {
        text.to_string()
    };

    let mut editor = TocEditor::new(Toc::load(snapshot).await?);
    match editor.set_title(slot, &escaped) {
        Err(TocError::TitleTooLong(len)) => {
            debug!("ignoring {len}-byte title for slot {slot}");
            return Ok(());
        }
        other => other?,
    }
    editor.take_for_write().save(snapshot).await?;
    info!("title cell {slot} set to \"{escaped}\"");
    Ok(())
}

/// Rewrites the mode byte of a fragment, starting from `raw` when given and
/// layering the semantic views on top.
pub async fn set_mode(
    snapshot: &Path,
    slot: usize,
    format: Option<RecordingFormat>,
    scms: Option<ScmsStatus>,
    raw: Option<u8>,
) -> TocResult<()> {
    let mut editor = TocEditor::new(Toc::load(snapshot).await?);

    let mut mode = raw.unwrap_or_else(|| {
        editor
            .toc()
            .track_fragment_list
            .get(slot)
            .map(|f| f.mode)
            .unwrap_or(0)
    });
    if let Some(format) = format {
        mode = format.apply(mode);
    }
    if let Some(scms) = scms {
        mode = scms.apply(mode);
    }

    editor.set_field(TocTable::Track, slot, Field::Mode, u32::from(mode))?;
    editor.take_for_write().save(snapshot).await?;
    info!(
        "fragment {slot} mode = {mode:#04x} ({}, SCMS {})",
        RecordingFormat::from_mode(mode),
        ScmsStatus::from_mode(mode)
    );
    Ok(())
}

fn render_map_grid(view: &TableView) -> String {
    let mut out = String::new();
    for row in view.map_cells.chunks(GRID_WIDTH) {
        for cell in row {
            match cell {
                Some(value) => out.push_str(&format!("{value:02x} ")),
                None => out.push_str(" ? "),
            }
        }
        out.push('\n');
    }
    out
}

fn render_slot_grid(view: &TableView, frame: u64) -> String {
    let mut out = String::new();
    for row in view.slots.chunks(GRID_WIDTH) {
        for tags in row {
            let tag = tags[frame as usize % tags.len()];
            out.push(tag.label);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Distinct tags present in the view, in first-appearance order.
fn legend(view: &TableView) -> Vec<classify::CellTag> {
    let mut seen = Vec::new();
    for tags in &view.slots {
        for tag in tags {
            if !seen.contains(tag) {
                seen.push(*tag);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::models::TitleCell;
    use tempfile::tempdir;

    fn snapshot_with_titles() -> Toc {
        Toc {
            title_map: vec![0, 1],
            title_cell_list: vec![TitleCell::default(), TitleCell::default()],
            ..Toc::default()
        }
    }

    #[tokio::test]
    async fn literal_titles_are_escaped_before_committing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toc.json");
        snapshot_with_titles().save(&path).await.unwrap();

        set_title(&path, 1, "A\\B CDE", true).await.unwrap();
        let toc = Toc::load(&path).await.unwrap();
        assert_eq!(toc.title_cell_list[1].title, *b"A\\B CDE");
    }

    #[tokio::test]
    async fn wide_characters_in_literal_titles_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toc.json");
        snapshot_with_titles().save(&path).await.unwrap();

        set_title(&path, 1, "AB\u{266b}CDEF", true).await.unwrap();
        let toc = Toc::load(&path).await.unwrap();
        assert_eq!(toc.title_cell_list[1].title, *b"AB?CDEF");
    }

    #[tokio::test]
    async fn overlong_titles_are_dropped_without_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toc.json");
        snapshot_with_titles().save(&path).await.unwrap();

        set_title(&path, 1, "ABCDEFGH", false).await.unwrap();
        let toc = Toc::load(&path).await.unwrap();
        assert_eq!(toc, snapshot_with_titles());
    }

    #[tokio::test]
    async fn short_titles_surface_the_padding_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("toc.json");
        snapshot_with_titles().save(&path).await.unwrap();

        let err = set_title(&path, 1, "AB", false).await.unwrap_err();
        assert!(matches!(err, TocError::TitleTooShort(2)));
        assert_eq!(Toc::load(&path).await.unwrap(), snapshot_with_titles());
    }
}
