// rasterform-core/src/external/mocks.rs

// --- Recording backend ---
//
// Stands in for GDAL: every call is recorded, mosaics and outputs are written
// as small text files describing their sources so tests can check band order
// without any raster library installed.

// Only compiled for this crate's unit tests or with the "test-mocks" feature.
#![cfg(any(test, feature = "test-mocks"))]

use super::{DatasetInfo, RasterBackend, VirtualMosaic, WarpOptions};
use crate::error::{CoreError, CoreResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A recorded `build_virtual_mosaic` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicCall {
    pub sources: Vec<PathBuf>,
    pub separate: bool,
    pub destination: PathBuf,
}

/// A recorded `warp` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpCall {
    pub destination: PathBuf,
    pub mosaics: Vec<VirtualMosaic>,
    pub options: WarpOptions,
}

/// In-memory [`RasterBackend`].
#[derive(Debug, Default)]
pub struct RecordingBackend {
    datasets: RefCell<HashMap<PathBuf, DatasetInfo>>,
    open_calls: RefCell<Vec<PathBuf>>,
    mosaic_calls: RefCell<Vec<MosaicCall>>,
    warp_calls: RefCell<Vec<WarpCall>>,
    warp_failure: RefCell<Option<String>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `open(path)` return `info`. Unknown paths cannot be opened.
    pub fn with_dataset(self, path: impl Into<PathBuf>, info: DatasetInfo) -> Self {
        self.datasets.borrow_mut().insert(path.into(), info);
        self
    }

    /// Makes every following warp write a partial file and then fail.
    pub fn fail_warp(&self, message: &str) {
        *self.warp_failure.borrow_mut() = Some(message.to_string());
    }

    pub fn open_calls(&self) -> Vec<PathBuf> {
        self.open_calls.borrow().clone()
    }

    pub fn mosaic_calls(&self) -> Vec<MosaicCall> {
        self.mosaic_calls.borrow().clone()
    }

    pub fn warp_calls(&self) -> Vec<WarpCall> {
        self.warp_calls.borrow().clone()
    }
}

fn write_with_parent(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Text written in place of a real raster: the warp options, then one line
/// per mosaic listing its source file names in band order.
pub fn describe_output(mosaics: &[VirtualMosaic], options: &WarpOptions) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "driver={}", options.format.driver());
    let _ = writeln!(text, "creation_options={}", options.creation_options.join(","));
    let _ = writeln!(text, "projection={}", options.dst_projection.as_deref().unwrap_or(""));
    for mosaic in mosaics {
        let names: Vec<String> = mosaic
            .sources
            .iter()
            .map(|s| s.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default())
            .collect();
        let _ = writeln!(text, "mosaic={}", names.join(","));
    }
    text
}

impl RasterBackend for RecordingBackend {
    fn open(&self, source: &Path) -> CoreResult<Option<DatasetInfo>> {
        log::info!("RecordingBackend::open called for: {}", source.display());
        self.open_calls.borrow_mut().push(source.to_path_buf());
        Ok(self.datasets.borrow().get(source).cloned())
    }

    fn build_virtual_mosaic(
        &self,
        sources: &[PathBuf],
        separate: bool,
        destination: &Path,
    ) -> CoreResult<VirtualMosaic> {
        self.mosaic_calls.borrow_mut().push(MosaicCall {
            sources: sources.to_vec(),
            separate,
            destination: destination.to_path_buf(),
        });

        let listing: Vec<String> = sources.iter().map(|s| s.display().to_string()).collect();
        write_with_parent(destination, &listing.join("\n"))?;

        Ok(VirtualMosaic {
            path: destination.to_path_buf(),
            sources: sources.to_vec(),
            separate,
        })
    }

    fn warp(&self, destination: &Path, sources: &[VirtualMosaic], options: &WarpOptions) -> CoreResult<()> {
        self.warp_calls.borrow_mut().push(WarpCall {
            destination: destination.to_path_buf(),
            mosaics: sources.to_vec(),
            options: options.clone(),
        });

        if let Some(message) = self.warp_failure.borrow().as_ref() {
            log::warn!("RecordingBackend simulating warp failure: {}", message);
            write_with_parent(destination, "partial")?;
            return Err(CoreError::Io(io::Error::other(message.clone())));
        }

        write_with_parent(destination, &describe_output(sources, options))?;
        Ok(())
    }
}
