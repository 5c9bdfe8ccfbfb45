// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Physical font resources.

use alloc::sync::Arc;
use core::fmt;
use linebender_resource_handle::Blob;
use read_fonts::{types::Tag, FontRef};
use smallvec::SmallVec;

use crate::variation::FontVariation;

/// Source of font table data.
///
/// Implementations are only asked for tables while the caller holds
/// [`TableAccess`](crate::TableAccess).
pub trait FontResource: Send + Sync + fmt::Debug {
    /// Returns the raw bytes of the table with the given tag, if present.
    fn table(&self, tag: Tag) -> Option<&[u8]>;

    /// Creates an instance of this font with the given axis values applied.
    ///
    /// Returns `None` if the resource cannot be instanced.
    fn create_with_variation(
        &self,
        variations: &[FontVariation],
    ) -> Option<Arc<dyn FontResource>> {
        let _ = variations;
        None
    }
}

/// A font in a shared blob of memory, with optional axis settings.
#[derive(Clone)]
pub struct FontBlob {
    data: Blob<u8>,
    index: u32,
    variations: SmallVec<[FontVariation; 2]>,
}

impl FontBlob {
    /// Creates a resource for the font at `index` in the given data.
    ///
    /// Returns `None` if the data does not contain a font at that index.
    pub fn new(data: Blob<u8>, index: u32) -> Option<Self> {
        FontRef::from_index(data.as_ref(), index).ok()?;
        Some(Self {
            data,
            index,
            variations: SmallVec::new(),
        })
    }

    /// Returns the underlying font data.
    pub fn data(&self) -> &Blob<u8> {
        &self.data
    }

    /// Returns the index of the font in a collection.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the axis values applied to this instance.
    pub fn variations(&self) -> &[FontVariation] {
        &self.variations
    }
}

impl FontResource for FontBlob {
    fn table(&self, tag: Tag) -> Option<&[u8]> {
        let data: &[u8] = self.data.as_ref();
        let font = FontRef::from_index(data, self.index).ok()?;
        let record = font
            .table_directory()
            .table_records()
            .iter()
            .find(|rec| rec.tag() == tag)?;
        let start = record.offset() as usize;
        let end = start.checked_add(record.length() as usize)?;
        data.get(start..end)
    }

    fn create_with_variation(
        &self,
        variations: &[FontVariation],
    ) -> Option<Arc<dyn FontResource>> {
        let mut instance = self.clone();
        for variation in variations {
            // Later settings for the same axis replace earlier ones.
            match instance
                .variations
                .iter_mut()
                .find(|existing| existing.axis_tag == variation.axis_tag)
            {
                Some(existing) => existing.value = variation.value,
                None => instance.variations.push(*variation),
            }
        }
        Some(Arc::new(instance))
    }
}

impl fmt::Debug for FontBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBlob")
            .field("data_id", &self.data.id())
            .field("index", &self.index)
            .field("variations", &self.variations)
            .finish_non_exhaustive()
    }
}
