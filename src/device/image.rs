//! Directory-backed device service: a NetMD device dump on disk with the
//! structured ToC in `toc.json` and optional raw `ram.bin` / `firmware.bin`
//! blobs. Capabilities derive from which files are present.

use crate::device::error::{DeviceError, DeviceResult};
use crate::device::progress::{CancelToken, ProgressCallback, ProgressReport};
use crate::device::{Capabilities, DeviceService};
use crate::toc::models::Toc;
use futures::future::BoxFuture;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

pub const TOC_FILE: &str = "toc.json";
pub const RAM_FILE: &str = "ram.bin";
pub const FIRMWARE_FILE: &str = "firmware.bin";

/// Chunk granularity for streamed reads; progress and cancellation are
/// checked once per chunk.
const READ_CHUNK: usize = 0x800;

pub struct ImageService {
    root: PathBuf,
}

impl ImageService {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    async fn read_blob(
        &self,
        name: &'static str,
        progress: ProgressCallback,
        cancel: CancelToken,
    ) -> DeviceResult<Vec<u8>> {
        let path = self.file(name);
        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(DeviceError::MissingImageFile(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let total = file.metadata().await?.len();
        let mut out = Vec::with_capacity(total as usize);
        let mut chunk = vec![0u8; READ_CHUNK];

        debug!("reading {name}: {total} bytes");
        loop {
            if cancel.is_cancelled() {
                return Err(DeviceError::Cancelled);
            }
            let n = file.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
            progress(ProgressReport {
                current: out.len() as u64,
                total,
                unit: "bytes",
                message: Some(format!("reading {name}")),
            });
        }

        Ok(out)
    }
}

impl DeviceService for ImageService {
    fn capabilities(&self) -> BoxFuture<'_, DeviceResult<Capabilities>> {
        Box::pin(async move {
            Ok(Capabilities {
                can_write_toc: tokio::fs::metadata(self.file(TOC_FILE)).await.is_ok(),
                can_read_ram: tokio::fs::metadata(self.file(RAM_FILE)).await.is_ok(),
                can_read_firmware: tokio::fs::metadata(self.file(FIRMWARE_FILE)).await.is_ok(),
            })
        })
    }

    fn read_toc(&self) -> BoxFuture<'_, DeviceResult<Toc>> {
        Box::pin(async move {
            let path = self.file(TOC_FILE);
            let data = match tokio::fs::read(&path).await {
                Ok(data) => data,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(DeviceError::MissingImageFile(TOC_FILE.to_string()));
                }
                Err(e) => return Err(e.into()),
            };
            Ok(serde_json::from_slice(&data)?)
        })
    }

    fn write_toc(&self, toc: Toc) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(async move {
            let data = serde_json::to_vec_pretty(&toc)?;
            tokio::fs::write(self.file(TOC_FILE), data).await?;
            Ok(())
        })
    }

    fn read_ram(
        &self,
        progress: ProgressCallback,
        cancel: CancelToken,
    ) -> BoxFuture<'_, DeviceResult<Vec<u8>>> {
        Box::pin(self.read_blob(RAM_FILE, progress, cancel))
    }

    fn read_firmware(
        &self,
        progress: ProgressCallback,
        cancel: CancelToken,
    ) -> BoxFuture<'_, DeviceResult<Vec<u8>>> {
        Box::pin(self.read_blob(FIRMWARE_FILE, progress, cancel))
    }
}
