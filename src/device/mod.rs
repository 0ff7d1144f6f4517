use crate::device::error::{DeviceError, DeviceResult};
use crate::device::image::ImageService;
use crate::device::progress::{CancelToken, ProgressCallback};
use crate::toc::models::Toc;
use futures::future::BoxFuture;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

pub mod error;
pub mod image;
pub mod progress;

/// What a connected device service is able to do. The CLI gates write-back
/// and dump commands on this.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub can_write_toc: bool,
    pub can_read_ram: bool,
    pub can_read_firmware: bool,
}

/// Pluggable NetMD device seam. Local image dumps, USB bridges and remote
/// services all expose the same fallible async surface; the wire protocol
/// behind it is not this crate's concern.
pub trait DeviceService: Send + Sync {
    fn capabilities(&self) -> BoxFuture<'_, DeviceResult<Capabilities>>;

    fn read_toc(&self) -> BoxFuture<'_, DeviceResult<Toc>>;

    fn write_toc(&self, toc: Toc) -> BoxFuture<'_, DeviceResult<()>>;

    fn read_ram(
        &self,
        progress: ProgressCallback,
        cancel: CancelToken,
    ) -> BoxFuture<'_, DeviceResult<Vec<u8>>>;

    fn read_firmware(
        &self,
        progress: ProgressCallback,
        cancel: CancelToken,
    ) -> BoxFuture<'_, DeviceResult<Vec<u8>>>;
}

/// Which raw blob a dump command pulls off the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Ram,
    Firmware,
}

pub async fn print_capabilities(image: &Path) -> DeviceResult<()> {
    let service = ImageService::new(image);
    let caps = service.capabilities().await?;
    println!("write ToC:     {}", if caps.can_write_toc { "yes" } else { "no" });
    println!("read RAM:      {}", if caps.can_read_ram { "yes" } else { "no" });
    println!("read firmware: {}", if caps.can_read_firmware { "yes" } else { "no" });
    Ok(())
}

pub async fn read_toc_to_file(image: &Path, output: &Path) -> anyhow::Result<()> {
    let service = ImageService::new(image);
    let toc = service.read_toc().await?;
    toc.save(output).await?;
    info!("ToC snapshot written to {output:?}");
    Ok(())
}

pub async fn write_toc_from_file(image: &Path, snapshot: &Path) -> anyhow::Result<()> {
    let service = ImageService::new(image);

    let caps = service.capabilities().await?;
    if !caps.can_write_toc {
        return Err(DeviceError::NotSupported("ToC write-back").into());
    }

    let toc = Toc::load(snapshot).await?;
    service.write_toc(toc).await?;
    info!("ToC snapshot {snapshot:?} written back to {image:?}");
    Ok(())
}

/// Dumps device RAM or firmware to a file with a progress bar. Ctrl-C
/// flips the cancel token; the read stops at the next chunk boundary.
pub async fn dump_blob(
    pb: MultiProgress,
    image: &Path,
    kind: BlobKind,
    output: &Path,
) -> anyhow::Result<()> {
    let service = ImageService::new(image);

    let caps = service.capabilities().await?;
    match kind {
        BlobKind::Ram if !caps.can_read_ram => {
            return Err(DeviceError::NotSupported("RAM dumps").into());
        }
        BlobKind::Firmware if !caps.can_read_firmware => {
            return Err(DeviceError::NotSupported("firmware dumps").into());
        }
        _ => {}
    }

    let bar = pb.add(ProgressBar::no_length());
    bar.set_style(ProgressStyle::with_template(
        "{msg} [{bar:40}] {bytes}/{total_bytes}",
    )?);

    let progress = bar_progress(&bar);
    let cancel = CancelToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancelling at the next chunk boundary");
            ctrl_c_cancel.cancel();
        }
    });

    let result = match kind {
        BlobKind::Ram => service.read_ram(progress, cancel).await,
        BlobKind::Firmware => service.read_firmware(progress, cancel).await,
    };
    bar.finish_and_clear();

    let data = result?;
    tokio::fs::write(output, &data).await?;
    info!("{} bytes dumped to {output:?}", data.len());
    Ok(())
}

fn bar_progress(bar: &ProgressBar) -> ProgressCallback {
    let bar = bar.clone();
    Arc::new(move |report| {
        bar.set_length(report.total);
        bar.set_position(report.current);
        if let Some(message) = report.message {
            bar.set_message(message);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn write_back_without_capability_is_refused() {
        let dir = tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        Toc::default().save(&snapshot).await.unwrap();

        // An empty image directory reports no write capability.
        let image = tempdir().unwrap();
        let err = write_toc_from_file(image.path(), &snapshot)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeviceError>(),
            Some(DeviceError::NotSupported("ToC write-back"))
        ));
    }

    #[tokio::test]
    async fn write_back_with_capability_replaces_the_image_toc() {
        let dir = tempdir().unwrap();
        let snapshot = dir.path().join("snapshot.json");
        let edited = Toc {
            n_tracks: 3,
            ..Toc::default()
        };
        edited.save(&snapshot).await.unwrap();

        let image = tempdir().unwrap();
        let service = ImageService::new(image.path());
        service.write_toc(Toc::default()).await.unwrap();

        write_toc_from_file(image.path(), &snapshot).await.unwrap();
        assert_eq!(service.read_toc().await.unwrap(), edited);
    }

    #[tokio::test]
    async fn dumps_without_capability_are_refused() {
        let image = tempdir().unwrap();
        let output = image.path().join("out.bin");

        for kind in [BlobKind::Ram, BlobKind::Firmware] {
            let err = dump_blob(MultiProgress::new(), image.path(), kind, &output)
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<DeviceError>(),
                Some(DeviceError::NotSupported(_))
            ));
        }
        assert!(!output.exists());
    }
}
