use crate::toc::text::TextError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TocError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SnapshotError(#[from] serde_json::Error),

    #[error(transparent)]
    TextError(#[from] TextError),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} does not exist in the {table} table")]
    FieldNotInTable { field: &'static str, table: String },

    #[error("Slot index {0} is out of range (0-255)")]
    SlotOutOfRange(usize),

    #[error("Selection index {0} is out of range (0-511)")]
    SelectionOutOfRange(u16),

    #[error("Value {value:#x} is out of range for {field} (max {max:#x})")]
    ValueOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Title is {0} bytes long, please pad it to exactly 7 bytes")]
    TitleTooShort(usize),

    #[error("Title is {0} bytes long, it must not exceed 7 bytes")]
    TitleTooLong(usize),
}

pub type TocResult<T> = Result<T, TocError>;
