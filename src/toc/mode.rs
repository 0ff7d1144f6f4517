//! The fragment mode byte: two bits select the recording format, two more
//! carry the SCMS copy status. Both semantic views recompose the raw byte
//! canonically so they can never drift apart.

use crate::toc::error::TocError;
use std::fmt;
use std::str::FromStr;

/// Fragment is recorded in SP rather than LP.
pub const F_SP_MODE: u8 = 0x01;

/// Fragment is stereo; combined with [`F_SP_MODE`] this selects the format.
pub const F_STEREO: u8 = 0x02;

/// SCMS: copying is unrestricted.
pub const F_SCMS_UNRESTRICTED: u8 = 0x04;

/// SCMS: one digital copy generation is permitted.
pub const F_SCMS_DIG_COPY: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFormat {
    SpStereo,
    SpMono,
    Lp2,
    Lp4,
}

impl RecordingFormat {
    pub fn from_mode(mode: u8) -> Self {
        match (mode & F_SP_MODE != 0, mode & F_STEREO != 0) {
            (true, true) => RecordingFormat::SpStereo,
            (true, false) => RecordingFormat::SpMono,
            (false, true) => RecordingFormat::Lp2,
            (false, false) => RecordingFormat::Lp4,
        }
    }

    /// Rewrites the two format bits of `mode`, leaving the rest untouched.
    pub fn apply(&self, mode: u8) -> u8 {
        let cleared = mode & !(F_SP_MODE | F_STEREO);
        match self {
            RecordingFormat::SpStereo => cleared | F_SP_MODE | F_STEREO,
            RecordingFormat::SpMono => cleared | F_SP_MODE,
            RecordingFormat::Lp2 => cleared | F_STEREO,
            RecordingFormat::Lp4 => cleared,
        }
    }
}

impl FromStr for RecordingFormat {
    type Err = TocError;

    fn from_str(s: &str) -> Result<Self, TocError> {
        match s {
            "sp-stereo" => Ok(RecordingFormat::SpStereo),
            "sp-mono" => Ok(RecordingFormat::SpMono),
            "lp2" => Ok(RecordingFormat::Lp2),
            "lp4" => Ok(RecordingFormat::Lp4),
            _ => Err(TocError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for RecordingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingFormat::SpStereo => write!(f, "sp-stereo"),
            RecordingFormat::SpMono => write!(f, "sp-mono"),
            RecordingFormat::Lp2 => write!(f, "lp2"),
            RecordingFormat::Lp4 => write!(f, "lp4"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScmsStatus {
    Unlimited,
    OneCopy,
    NoCopies,
}

impl ScmsStatus {
    pub fn from_mode(mode: u8) -> Self {
        if mode & F_SCMS_UNRESTRICTED != 0 {
            ScmsStatus::Unlimited
        } else if mode & F_SCMS_DIG_COPY != 0 {
            ScmsStatus::OneCopy
        } else {
            ScmsStatus::NoCopies
        }
    }

    /// Rewrites the two SCMS bits of `mode` to the canonical pattern for
    /// this status.
    pub fn apply(&self, mode: u8) -> u8 {
        let cleared = mode & !(F_SCMS_UNRESTRICTED | F_SCMS_DIG_COPY);
        match self {
            ScmsStatus::Unlimited => cleared | F_SCMS_UNRESTRICTED,
            ScmsStatus::OneCopy => cleared | F_SCMS_DIG_COPY,
            ScmsStatus::NoCopies => cleared,
        }
    }
}

impl FromStr for ScmsStatus {
    type Err = TocError;

    fn from_str(s: &str) -> Result<Self, TocError> {
        match s {
            "unlimited" => Ok(ScmsStatus::Unlimited),
            "one-copy" => Ok(ScmsStatus::OneCopy),
            "no-copies" => Ok(ScmsStatus::NoCopies),
            _ => Err(TocError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for ScmsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmsStatus::Unlimited => write!(f, "unlimited"),
            ScmsStatus::OneCopy => write!(f, "one-copy"),
            ScmsStatus::NoCopies => write!(f, "no-copies"),
        }
    }
}
