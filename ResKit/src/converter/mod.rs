//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! File-level conversion between LSB, LSF and LSX
//!
//! The format of a file is taken from its extension. Conversions go through
//! the in-memory [`Resource`] tree, so any source format can be written as
//! any target format.

use crate::config::ConversionOptions;
use crate::error::{Error, Result};
use crate::formats::{lsb, lsf, lsx};
use crate::resource::Resource;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Resource encodings recognized by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceFormat {
    Lsb,
    Lsf,
    Lsx,
}

impl ResourceFormat {
    /// Detect the format from a path's extension (case-insensitive).
    ///
    /// # Errors
    /// Returns [`Error::UnknownFormat`] for any other extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("lsb") => Ok(ResourceFormat::Lsb),
            Some("lsf") => Ok(ResourceFormat::Lsf),
            Some("lsx") => Ok(ResourceFormat::Lsx),
            _ => Err(Error::UnknownFormat(path.to_path_buf())),
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ResourceFormat::Lsb => "lsb",
            ResourceFormat::Lsf => "lsf",
            ResourceFormat::Lsx => "lsx",
        }
    }
}

/// Read a resource file in whichever format its extension names.
///
/// # Errors
/// Returns an error if the extension is unknown, the file cannot be read or
/// its contents are invalid.
pub fn read_resource<P: AsRef<Path>>(path: P) -> Result<Resource> {
    let path = path.as_ref();
    let format = ResourceFormat::from_path(path)?;
    let mut reader = BufReader::new(File::open(path)?);
    let resource = match format {
        ResourceFormat::Lsb => lsb::read_lsb(&mut reader)?,
        ResourceFormat::Lsf => lsf::read_lsf(&mut reader)?,
        ResourceFormat::Lsx => lsx::read_lsx(&mut reader)?,
    };
    tracing::debug!(
        "Read {} ({} regions, {} nodes)",
        path.display(),
        resource.regions.len(),
        resource.node_count()
    );
    Ok(resource)
}

/// Write a resource in whichever format the path's extension names.
///
/// The file is only created after the resource has been fully serialized.
///
/// # Errors
/// Returns an error if the extension is unknown, serialization fails or the
/// file cannot be written.
pub fn write_resource<P: AsRef<Path>>(resource: &Resource, path: P, options: &ConversionOptions) -> Result<()> {
    let path = path.as_ref();
    let bytes = match ResourceFormat::from_path(path)? {
        ResourceFormat::Lsb => lsb::serialize_lsb(resource, &options.lsb)?,
        ResourceFormat::Lsf => lsf::serialize_lsf(resource, &options.lsf)?,
        ResourceFormat::Lsx => lsx::serialize_lsx(resource, &options.lsx)?.into_bytes(),
    };
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Convert `source` to `dest`, each format chosen by extension.
///
/// # Errors
/// Returns an error if either extension is unknown or reading, converting
/// or writing fails.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q, options: &ConversionOptions) -> Result<()> {
    let source = source.as_ref();
    let dest = dest.as_ref();
    // Fail on a bad target extension before doing any work
    let target = ResourceFormat::from_path(dest)?;

    tracing::info!("Converting {} -> {} ({target:?})", source.display(), dest.display());
    let resource = read_resource(source)?;
    write_resource(&resource, dest, options)?;
    tracing::info!("Converted {} nodes", resource.node_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ResourceFormat::from_path("a/b/meta.lsx").unwrap(), ResourceFormat::Lsx);
        assert_eq!(ResourceFormat::from_path("Globals.LSF").unwrap(), ResourceFormat::Lsf);
        assert_eq!(ResourceFormat::from_path("save.Lsb").unwrap(), ResourceFormat::Lsb);
        assert!(matches!(ResourceFormat::from_path("x.lsj"), Err(Error::UnknownFormat(_))));
        assert!(matches!(ResourceFormat::from_path("noext"), Err(Error::UnknownFormat(_))));
    }
}
