//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! Hash-bucketed name table of the LSF strings segment

#![allow(clippy::cast_possible_truncation)]

use crate::error::{Error, Result};
use crate::formats::common::value::{ensure_remaining, read_bytes};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::collections::HashMap;
use std::io::Cursor;

/// Bucket count written by every known encoder.
pub const STRING_HASH_BUCKETS: usize = 512;

/// C# `String.GetHashCode()` equivalent for `LSLib` compatibility
#[must_use]
pub(crate) fn hash_string_lslib(s: &str) -> u32 {
    let mut hash1 = 5381u32;
    let mut hash2 = hash1;

    for pair in s.as_bytes().chunks(2) {
        hash1 = ((hash1 << 5).wrapping_add(hash1)) ^ u32::from(pair[0]);
        if let Some(&second) = pair.get(1) {
            hash2 = ((hash2 << 5).wrapping_add(hash2)) ^ u32::from(second);
        }
    }

    hash1.wrapping_add(hash2.wrapping_mul(1_566_083_941))
}

/// Bucket of a name: the hash folded into 9-bit windows.
#[must_use]
pub fn bucket_of(s: &str) -> usize {
    let hash = hash_string_lslib(s);
    ((hash & 0x1ff) ^ ((hash >> 9) & 0x1ff) ^ ((hash >> 18) & 0x1ff) ^ ((hash >> 27) & 0x1ff))
        as usize
}

/// Split a name id into `(bucket, index)`.
#[must_use]
pub fn split_id(id: u32) -> (usize, usize) {
    ((id >> 16) as usize, (id & 0xFFFF) as usize)
}

/// Names of one LSF document, grouped by hash bucket.
///
/// A name's id is `bucket << 16 | position_in_bucket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringTable {
    buckets: Vec<Vec<String>>,
    ids: HashMap<String, u32>,
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

fn entry_count(len: usize) -> Result<u16> {
    u16::try_from(len).map_err(|_| Error::ValueTooLarge { length: len })
}

impl StringTable {
    #[must_use]
    pub fn new() -> Self {
        StringTable {
            buckets: vec![Vec::new(); STRING_HASH_BUCKETS],
            ids: HashMap::new(),
        }
    }

    /// Id of `s`, adding it on first use.
    ///
    /// # Errors
    /// Returns [`Error::StringTooLong`] if `s` does not fit a u16 length.
    pub fn intern(&mut self, s: &str) -> Result<u32> {
        if let Some(&id) = self.ids.get(s) {
            return Ok(id);
        }
        if s.len() > usize::from(u16::MAX) {
            return Err(Error::StringTooLong { length: s.len() });
        }

        let bucket = bucket_of(s);
        let entries = &mut self.buckets[bucket];
        // The bucket's entry count is stored as a u16
        entry_count(entries.len() + 1)?;
        let id = ((bucket as u32) << 16) | entries.len() as u32;
        entries.push(s.to_string());
        self.ids.insert(s.to_string(), id);
        Ok(id)
    }

    /// Id of an already interned name.
    #[must_use]
    pub fn id_of(&self, s: &str) -> Option<u32> {
        self.ids.get(s).copied()
    }

    #[must_use]
    pub fn get(&self, id: u32) -> Option<&str> {
        let (bucket, index) = split_id(id);
        self.buckets
            .get(bucket)
            .and_then(|entries| entries.get(index))
            .map(String::as_str)
    }

    /// Resolve an id read from a record.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvedStringId`] if the id is not in the table.
    pub fn resolve(&self, id: u32) -> Result<&str> {
        self.get(id).ok_or(Error::UnresolvedStringId(id))
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Names grouped by bucket, in id order.
    #[must_use]
    pub fn buckets(&self) -> &[Vec<String>] {
        &self.buckets
    }

    /// Encode as the strings segment.
    ///
    /// # Errors
    /// Returns [`Error::ValueTooLarge`] if a bucket holds more names than its
    /// u16 count can express.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        output.write_u32::<LittleEndian>(self.buckets.len() as u32)?;
        for entries in &self.buckets {
            output.write_u16::<LittleEndian>(entry_count(entries.len())?)?;
            for s in entries {
                output.write_u16::<LittleEndian>(s.len() as u16)?;
                output.extend_from_slice(s.as_bytes());
            }
        }
        Ok(output)
    }

    /// Decode a strings segment. The bucket count is taken from the data.
    ///
    /// # Errors
    /// Returns [`Error::TruncatedData`] if a count or length overruns the
    /// segment, or a UTF-8 error for a malformed name.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        ensure_remaining(&cursor, 4)?;
        let bucket_count = cursor.read_u32::<LittleEndian>()? as usize;
        ensure_remaining(&cursor, bucket_count.saturating_mul(2))?;

        let mut buckets = Vec::with_capacity(bucket_count);
        let mut ids = HashMap::new();
        for bucket in 0..bucket_count {
            ensure_remaining(&cursor, 2)?;
            let count = usize::from(cursor.read_u16::<LittleEndian>()?);
            let mut entries = Vec::with_capacity(count);
            for index in 0..count {
                ensure_remaining(&cursor, 2)?;
                let len = usize::from(cursor.read_u16::<LittleEndian>()?);
                let name = String::from_utf8(read_bytes(&mut cursor, len)?)?;
                ids.entry(name.clone())
                    .or_insert(((bucket as u32) << 16) | index as u32);
                entries.push(name);
            }
            buckets.push(entries);
        }

        Ok(StringTable { buckets, ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut table = StringTable::new();
        let a = table.intern("Name").unwrap();
        let b = table.intern("MapKey").unwrap();
        assert_eq!(table.intern("Name").unwrap(), a);
        assert_ne!(a, b);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(a).unwrap(), "Name");
        assert_eq!(split_id(a).0, bucket_of("Name"));
    }

    #[test]
    fn test_segment_round_trip() {
        let mut table = StringTable::new();
        for name in ["root", "Name", "children", "UUID", "Translated"] {
            table.intern(name).unwrap();
        }
        let bytes = table.to_bytes().unwrap();
        assert_eq!(u32::from_le_bytes(bytes[..4].try_into().unwrap()), 512);

        let decoded = StringTable::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(decoded.id_of("UUID"), table.id_of("UUID"));
    }

    #[test]
    fn test_string_too_long() {
        let long = "x".repeat(70_000);
        assert!(matches!(
            StringTable::new().intern(&long),
            Err(Error::StringTooLong { length: 70_000 })
        ));
    }

    #[test]
    fn test_unresolved_and_truncated() {
        let table = StringTable::new();
        assert!(matches!(table.resolve(0x0001_0002), Err(Error::UnresolvedStringId(0x0001_0002))));
        // 512 buckets declared, no counts follow
        assert!(matches!(
            StringTable::from_bytes(&[0, 2, 0, 0]),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(hash_string_lslib(""), 5381u32.wrapping_add(5381u32.wrapping_mul(1_566_083_941)));
        assert!(bucket_of("anything") < STRING_HASH_BUCKETS);
    }

    #[test]
    fn test_bucket_count_must_fit_u16() {
        assert_eq!(entry_count(usize::from(u16::MAX)).unwrap(), u16::MAX);
        assert!(matches!(entry_count(65_536), Err(Error::ValueTooLarge { length: 65_536 })));

        let mut table = StringTable::new();
        table.buckets[3] = vec![String::new(); 65_536];
        assert!(matches!(table.to_bytes(), Err(Error::ValueTooLarge { length: 65_536 })));
    }

    #[test]
    fn test_full_bucket_rejects_new_names() {
        let mut table = StringTable::new();
        let bucket = bucket_of("Overflow");
        table.buckets[bucket] = vec![String::new(); usize::from(u16::MAX)];
        assert!(matches!(table.intern("Overflow"), Err(Error::ValueTooLarge { .. })));
        assert_eq!(table.buckets[bucket].len(), usize::from(u16::MAX));
    }
}
