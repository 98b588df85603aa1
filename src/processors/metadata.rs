// imgpress/src/processors/metadata.rs
use crate::core::{Result, ServiceError};
use exif::{Exif, Reader};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct MetadataReader;

impl MetadataReader {
    pub fn new() -> Self {
        Self
    }

    /// Read the EXIF block from a file's container, if any.
    ///
    /// `Ok(None)` means the file simply carries no EXIF; a malformed block
    /// is an `Err` and it is the caller's choice whether that is fatal.
    pub fn read(&self, path: &Path) -> Result<Option<Exif>> {
        let file = File::open(path)?;
        let mut bufreader = BufReader::new(&file);

        match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => {
                log::debug!("found EXIF data in {}", path.display());
                Ok(Some(exif))
            }
            Err(exif::Error::NotFound(_)) => {
                log::debug!("no EXIF data found in {}", path.display());
                Ok(None)
            }
            Err(e) => Err(ServiceError::ProcessingError(format!("EXIF read error: {e}"))),
        }
    }

    pub fn has_metadata(&self, path: &Path) -> Result<bool> {
        Ok(self.read(path)?.is_some())
    }
}

impl Default for MetadataReader {
    fn default() -> Self {
        Self::new()
    }
}
