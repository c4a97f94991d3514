//! [`RasterBackend`] implementation driving GDAL's command-line programs.

use super::command::{capture, run_command};
use super::gdalinfo::parse_dataset_info;
use super::{DatasetInfo, RasterBackend, VirtualMosaic, WarpOptions, check_dependency};
use crate::error::CoreResult;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable overriding the `gdalinfo` program.
pub const GDALINFO_ENV: &str = "RASTERFORM_GDALINFO";
/// Environment variable overriding the `gdalbuildvrt` program.
pub const GDALBUILDVRT_ENV: &str = "RASTERFORM_GDALBUILDVRT";
/// Environment variable overriding the `gdalwarp` program.
pub const GDALWARP_ENV: &str = "RASTERFORM_GDALWARP";

/// Names or paths of the GDAL programs used by [`GdalCliBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdalToolPaths {
    pub gdalinfo: String,
    pub gdalbuildvrt: String,
    pub gdalwarp: String,
}

impl Default for GdalToolPaths {
    fn default() -> Self {
        Self {
            gdalinfo: "gdalinfo".to_string(),
            gdalbuildvrt: "gdalbuildvrt".to_string(),
            gdalwarp: "gdalwarp".to_string(),
        }
    }
}

impl GdalToolPaths {
    /// Default program names, overridden by the `RASTERFORM_*` variables when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let pick = |var: &str, default: String| {
            env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(default)
        };
        Self {
            gdalinfo: pick(GDALINFO_ENV, defaults.gdalinfo),
            gdalbuildvrt: pick(GDALBUILDVRT_ENV, defaults.gdalbuildvrt),
            gdalwarp: pick(GDALWARP_ENV, defaults.gdalwarp),
        }
    }
}

/// Arguments of `gdalbuildvrt`.
pub fn build_vrt_args(sources: &[PathBuf], separate: bool, destination: &Path) -> Vec<OsString> {
    let mut args = Vec::with_capacity(sources.len() + 3);
    args.push(OsString::from("-overwrite"));
    if separate {
        args.push(OsString::from("-separate"));
    }
    args.push(destination.as_os_str().to_os_string());
    args.extend(sources.iter().map(|s| s.as_os_str().to_os_string()));
    args
}

/// Arguments of `gdalwarp`.
pub fn warp_args(destination: &Path, sources: &[VirtualMosaic], options: &WarpOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-overwrite".into(), "-of".into(), options.format.driver().into()];
    for option in &options.creation_options {
        args.push("-co".into());
        args.push(option.into());
    }
    if let Some(projection) = &options.dst_projection {
        args.push("-t_srs".into());
        args.push(projection.into());
    }
    args.extend(sources.iter().map(|m| m.path.as_os_str().to_os_string()));
    args.push(destination.as_os_str().to_os_string());
    args
}

/// Backend running `gdalinfo`, `gdalbuildvrt` and `gdalwarp` as subprocesses.
#[derive(Debug, Clone, Default)]
pub struct GdalCliBackend {
    tools: GdalToolPaths,
}

impl GdalCliBackend {
    pub fn new(tools: GdalToolPaths) -> Self {
        Self { tools }
    }

    pub fn from_env() -> Self {
        Self::new(GdalToolPaths::from_env())
    }

    /// Verifies that all three programs can be started.
    pub fn check_dependencies(&self) -> CoreResult<()> {
        check_dependency(&self.tools.gdalinfo)?;
        check_dependency(&self.tools.gdalbuildvrt)?;
        check_dependency(&self.tools.gdalwarp)
    }
}

impl RasterBackend for GdalCliBackend {
    fn open(&self, source: &Path) -> CoreResult<Option<DatasetInfo>> {
        let mut cmd = Command::new(&self.tools.gdalinfo);
        cmd.arg("-json").arg(source);
        let output = capture(&mut cmd)?;

        if !output.status.success() {
            log::debug!(
                "gdalinfo cannot open {}: {}",
                source.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        parse_dataset_info(&String::from_utf8_lossy(&output.stdout)).map(Some)
    }

    fn build_virtual_mosaic(
        &self,
        sources: &[PathBuf],
        separate: bool,
        destination: &Path,
    ) -> CoreResult<VirtualMosaic> {
        let mut cmd = Command::new(&self.tools.gdalbuildvrt);
        cmd.args(build_vrt_args(sources, separate, destination));
        run_command(&mut cmd)?;

        Ok(VirtualMosaic {
            path: destination.to_path_buf(),
            sources: sources.to_vec(),
            separate,
        })
    }

    fn warp(&self, destination: &Path, sources: &[VirtualMosaic], options: &WarpOptions) -> CoreResult<()> {
        let mut cmd = Command::new(&self.tools.gdalwarp);
        cmd.args(warp_args(destination, sources, options));
        run_command(&mut cmd).map(|_| ())
    }
}
