use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

/// Read-only view of the whole input file.
///
/// The file handle is kept next to the map so both are dropped together.
#[derive(Debug)]
pub struct Mmap {
    map: Option<memmap2::Mmap>,
    _file: File,
}

impl Mmap {
    pub fn open(path: &Path) -> Result<Mmap> {
        let file = File::open(path)
            .with_context(|| format!("couldn't open input file {}", path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("couldn't stat input file {}", path.display()))?
            .len();

        // Zero-length mappings are rejected by some platforms.
        let map = if len == 0 {
            None
        } else {
            let map = unsafe {
                // Safety: this is a read only map, and the input is not modified while we run
                memmap2::Mmap::map(&file)
            }
            .with_context(|| format!("couldn't mmap input file {}", path.display()))?;
            Some(map)
        };

        Ok(Mmap { map, _file: file })
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.map {
            Some(map) => map,
            None => &[],
        }
    }
}
