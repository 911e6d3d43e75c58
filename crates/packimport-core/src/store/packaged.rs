//! Resource packages appended to a binary.
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! repeated per entry:
//!   name_len: u32
//!   name:     [u8; name_len]   (UTF-8)
//!   data_len: u64
//!   data:     [u8; data_len]
//! trailer:
//!   count:       u32
//!   package_len: u64           (entry section length + 12)
//! ```
//!
//! The trailer is the last 12 bytes of the file, so a package can be read
//! back from the end of a player executable it was appended to.

use indexmap::IndexMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info};

use super::ResourceStore;
use crate::errors::{PackageError, StoreError};

/// Size of the `count` + `package_len` trailer.
pub const TRAILER_LEN: u64 = 12;

/// Listing entry for a packaged resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: String,
    pub len: u64,
    /// BLAKE3 digest of the content, hex encoded.
    pub digest: String,
}

/// Read-only store over a parsed resource package.
#[derive(Debug, Default, Clone)]
pub struct PackagedStore {
    resources: IndexMap<String, Vec<u8>>,
}

impl PackagedStore {
    /// Parse a package from the tail of `bytes`.
    ///
    /// Anything before the package section (a player binary) is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PackageError> {
        let len = bytes.len() as u64;
        let (count, package_len) = read_trailer(&bytes[bytes.len().saturating_sub(12)..], len)?;

        let start = (len - package_len) as usize;
        let end = bytes.len() - TRAILER_LEN as usize;
        let resources = parse_entries(&bytes[start..end], count)?;

        Ok(Self { resources })
    }

    /// Parse the package at the end of a file without reading what precedes
    /// it.
    pub fn from_file(path: &Path) -> Result<Self, PackageError> {
        let mut file = File::open(path)?;
        let len = file.seek(SeekFrom::End(0))?;
        if len < TRAILER_LEN {
            return Err(PackageError::MissingTrailer { len });
        }

        let mut trailer = [0u8; TRAILER_LEN as usize];
        file.seek(SeekFrom::End(-(TRAILER_LEN as i64)))?;
        file.read_exact(&mut trailer)?;
        let (count, package_len) = read_trailer(&trailer, len)?;

        let mut section = vec![0u8; (package_len - TRAILER_LEN) as usize];
        file.seek(SeekFrom::Start(len - package_len))?;
        file.read_exact(&mut section)?;

        let resources = parse_entries(&section, count)?;
        info!(
            "Loaded resource package {} with {} resources",
            path.display(),
            resources.len()
        );

        Ok(Self { resources })
    }

    /// Parse the package appended to the running executable.
    pub fn from_current_exe() -> Result<Self, PackageError> {
        let exe = std::env::current_exe()?;
        Self::from_file(&exe)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Entries in package order, with their sizes and digests.
    pub fn entries(&self) -> Vec<PackageEntry> {
        self.resources
            .iter()
            .map(|(name, data)| PackageEntry {
                name: name.clone(),
                len: data.len() as u64,
                digest: blake3::hash(data).to_hex().to_string(),
            })
            .collect()
    }
}

impl ResourceStore for PackagedStore {
    fn exists(&self, key: &str) -> bool {
        self.resources.contains_key(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.resources
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_string(),
            })
    }
}

fn read_trailer(trailer: &[u8], file_len: u64) -> Result<(u32, u64), PackageError> {
    if file_len < TRAILER_LEN || trailer.len() < TRAILER_LEN as usize {
        return Err(PackageError::MissingTrailer { len: file_len });
    }

    let count = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&trailer[4..12]);
    let package_len = u64::from_be_bytes(len_bytes);

    if package_len < TRAILER_LEN || package_len > file_len {
        return Err(PackageError::LengthOutOfBounds {
            declared: package_len,
            available: file_len,
        });
    }

    Ok((count, package_len))
}

fn parse_entries(section: &[u8], count: u32) -> Result<IndexMap<String, Vec<u8>>, PackageError> {
    let mut cursor = section;
    // Every entry carries at least 12 header bytes, so the section bounds
    // how many a corrupt `count` can ask room for.
    let capacity = (count as usize).min(section.len() / 12);
    let mut resources = IndexMap::with_capacity(capacity);

    for index in 0..count {
        let name_len = take_u32(&mut cursor).ok_or(PackageError::Truncated {
            index,
            field: "name length",
        })?;
        let name_bytes = take(&mut cursor, name_len as u64).ok_or(PackageError::Truncated {
            index,
            field: "name",
        })?;
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| PackageError::InvalidEntryName { index })?
            .to_string();

        let data_len = take_u64(&mut cursor).ok_or(PackageError::Truncated {
            index,
            field: "data length",
        })?;
        let data = take(&mut cursor, data_len).ok_or(PackageError::Truncated {
            index,
            field: "data",
        })?;

        debug!("Indexed resource {} ({} bytes)", name, data.len());
        if resources.insert(name.clone(), data.to_vec()).is_some() {
            return Err(PackageError::DuplicateEntry { name });
        }
    }

    if !cursor.is_empty() {
        return Err(PackageError::TrailingBytes {
            count,
            remaining: cursor.len() as u64,
        });
    }

    Ok(resources)
}

fn take<'a>(cursor: &mut &'a [u8], len: u64) -> Option<&'a [u8]> {
    let len = usize::try_from(len).ok()?;
    if cursor.len() < len {
        return None;
    }
    let (head, rest) = cursor.split_at(len);
    *cursor = rest;
    Some(head)
}

fn take_u32(cursor: &mut &[u8]) -> Option<u32> {
    let bytes = take(cursor, 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn take_u64(cursor: &mut &[u8]) -> Option<u64> {
    let bytes = take(cursor, 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    Some(u64::from_be_bytes(buf))
}

/// Collects resources and serializes them into the package layout.
#[derive(Debug, Default)]
pub struct PackageBuilder {
    resources: IndexMap<String, Vec<u8>>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Result<&mut Self, PackageError> {
        let name = name.into();
        if self.resources.contains_key(&name) {
            return Err(PackageError::DuplicateEntry { name });
        }
        let data = data.into();
        info!("Packaging {} {}b", name, data.len());
        self.resources.insert(name, data);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Serialize into a standalone package.
    pub fn build(&self) -> Vec<u8> {
        let mut package = Vec::new();
        for (name, data) in &self.resources {
            package.extend_from_slice(&(name.len() as u32).to_be_bytes());
            package.extend_from_slice(name.as_bytes());
            package.extend_from_slice(&(data.len() as u64).to_be_bytes());
            package.extend_from_slice(data);
        }

        let package_len = package.len() as u64 + TRAILER_LEN;
        package.extend_from_slice(&(self.resources.len() as u32).to_be_bytes());
        package.extend_from_slice(&package_len.to_be_bytes());

        info!("Total: {}", package_len);
        package
    }

    /// Write the package to `out`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<u64> {
        let package = self.build();
        out.write_all(&package)?;
        Ok(package.len() as u64)
    }
}
