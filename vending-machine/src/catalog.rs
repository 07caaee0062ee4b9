//! Asset catalog (spec §4.B): a directory of not-yet-minted descriptors,
//! with an atomic claim → lock transition implemented as a file rename.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use vending_primitives::asset_name_hex;

use crate::errors::CatalogCorruption;

/// A catalog item (§3): the display name, its on-chain hex name, and the
/// NFT metadata blob to embed under label 721.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDescriptor {
    pub asset_name: String,
    pub asset_name_hex: String,
    pub file_name: String,
    pub metadata: serde_json::Value,
}

impl AssetDescriptor {
    fn name_len_bytes(&self) -> u64 {
        self.asset_name.len() as u64
    }
}

pub struct AssetCatalog {
    metadata_dir: PathBuf,
    locked_dir: PathBuf,
}

impl AssetCatalog {
    pub fn new(metadata_dir: impl Into<PathBuf>, locked_dir: impl Into<PathBuf>) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
            locked_dir: locked_dir.into(),
        }
    }

    fn list_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut entries: Vec<PathBuf> = fs::read_dir(&self.metadata_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        entries.sort();
        Ok(entries)
    }

    pub fn available(&self) -> io::Result<usize> {
        Ok(self.list_files()?.len())
    }

    /// Selects up to `k` descriptors: lexicographic-by-filename when
    /// `random` is false, a uniform sample without replacement otherwise.
    /// Reservation is logical only — no files move (§4.B).
    pub fn reserve(&self, k: usize, random: bool) -> io::Result<Vec<AssetDescriptor>> {
        let mut files = self.list_files()?;
        if random {
            files.shuffle(&mut rand::thread_rng());
        }
        files
            .into_iter()
            .take(k)
            .map(|path| Self::load_descriptor(&path))
            .collect()
    }

    fn load_descriptor(path: &Path) -> io::Result<AssetDescriptor> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let raw = fs::read_to_string(path)?;
        let parsed: serde_json::Value = serde_json::from_str(&raw)?;
        let object = parsed.as_object().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, format!("{file_name}: not a JSON object"))
        })?;
        let (asset_name, metadata) = object.iter().next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, format!("{file_name}: empty metadata object"))
        })?;
        Ok(AssetDescriptor {
            asset_name: asset_name.clone(),
            asset_name_hex: asset_name_hex(asset_name),
            file_name,
            metadata: metadata.clone(),
        })
    }

    /// Moves each reserved file from metadata to locked, same name (§4.B).
    /// The last step of a successful vend attempt.
    pub fn commit(&self, reserved: &[AssetDescriptor]) -> Result<(), CatalogCorruption> {
        fs::create_dir_all(&self.locked_dir).map_err(|e| CatalogCorruption(e.to_string()))?;
        for descriptor in reserved {
            let from = self.metadata_dir.join(&descriptor.file_name);
            let to = self.locked_dir.join(&descriptor.file_name);
            if !from.exists() {
                return Err(CatalogCorruption(descriptor.file_name.clone()));
            }
            fs::rename(&from, &to).map_err(|e| CatalogCorruption(e.to_string()))?;
        }
        Ok(())
    }

    /// Reservation is logical only; releasing one is a no-op (§4.B).
    pub fn release(&self, _reserved: &[AssetDescriptor]) {}
}

/// Total byte length of a set of descriptors' asset names, the `n` argument
/// to the rebate calculator.
pub fn total_name_bytes(descriptors: &[AssetDescriptor]) -> u64 {
    descriptors.iter().map(AssetDescriptor::name_len_bytes).sum()
}
