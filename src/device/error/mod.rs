use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SnapshotError(#[from] serde_json::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Device does not support {0}")]
    NotSupported(&'static str),

    #[error("Device image is missing {0}")]
    MissingImageFile(String),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
