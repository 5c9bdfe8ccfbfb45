// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extraction of style, axis and coverage data from font tables.

use alloc::vec::Vec;
use core::ops::Range;
use hashbrown::HashSet;
use read_fonts::{
    tables::{
        cmap::{Cmap, Cmap12, Cmap4, CmapSubtable, MapVariant, PlatformId},
        fvar::Fvar,
        os2::{Os2, SelectionFlags},
    },
    types::GlyphId,
    FontData, FontRead, ReadError, TopLevelTable,
};

use crate::access::TableAccess;
use crate::bitset::{SparseBitSet, MAX_VALUE};
use crate::resource::FontResource;
use crate::style::{FontSlant, FontStyle, FontWeight};
use crate::variation::{vs_index, AxisTag, INVALID_VS_INDEX};

/// Reads the weight and slant of a font from its `OS/2` table.
///
/// Returns `None` if the table is absent or malformed.
pub fn analyze_style(_access: &TableAccess<'_>, resource: &dyn FontResource) -> Option<FontStyle> {
    let data = resource.table(Os2::TAG)?;
    let os2 = Os2::read(FontData::new(data)).ok()?;
    let slant = if os2.fs_selection().contains(SelectionFlags::ITALIC) {
        FontSlant::Italic
    } else {
        FontSlant::Upright
    };
    Some(FontStyle::new(FontWeight::new(os2.us_weight_class()), slant))
}

/// Reads the set of variation axes declared in the `fvar` table.
///
/// Returns an empty set if the table is absent or malformed.
pub fn analyze_axes(_access: &TableAccess<'_>, resource: &dyn FontResource) -> HashSet<AxisTag> {
    let Some(data) = resource.table(Fvar::TAG) else {
        return HashSet::new();
    };
    match Fvar::read(FontData::new(data)).and_then(|fvar| fvar.axes()) {
        Ok(axes) => axes.iter().map(|axis| axis.axis_tag()).collect(),
        Err(_) => HashSet::new(),
    }
}

const ENCODING_APPLE_ID_UNICODE_32: u16 = 4;
const ENCODING_APPLE_ID_VARIANT_SELECTOR: u16 = 5;
const ENCODING_MS_SYMBOL: u16 = 0;
const ENCODING_MS_UNICODE_CS: u16 = 1;
const ENCODING_MS_ID_UCS_4: u16 = 10;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum MappingKind {
    None,
    Symbol,
    UnicodeBmp,
    UnicodeFull,
}

/// Code point coverage extracted from a `cmap` table.
#[derive(Clone, Debug, Default)]
pub struct CmapCoverage {
    /// Code points mapped to a glyph other than `.notdef`.
    pub coverage: SparseBitSet<'static>,
    /// Code points with a variation sequence, indexed by
    /// [`vs_index`](crate::variation::vs_index).
    ///
    /// Empty if the table has no format 14 subtable. Otherwise the length is
    /// one past the highest index in use and unused slots are `None`.
    pub vs_coverage: Vec<Option<SparseBitSet<'static>>>,
}

impl CmapCoverage {
    /// Builds coverage from the raw bytes of a `cmap` table.
    ///
    /// A table without any supported subtable produces empty coverage.
    pub fn from_table(data: &[u8]) -> Result<Self, ReadError> {
        let cmap = Cmap::read(FontData::new(data))?;
        let mut best_kind = MappingKind::None;
        let mut best = None;
        let mut variants = None;
        // Walk in reverse so that, for equal kinds, the earliest record wins.
        for record in cmap.encoding_records().iter().rev() {
            let kind = match (record.platform_id(), record.encoding_id()) {
                (PlatformId::Unicode, ENCODING_APPLE_ID_VARIANT_SELECTOR) => {
                    if let Ok(CmapSubtable::Format14(subtable)) =
                        record.subtable(cmap.offset_data())
                    {
                        variants = Some(subtable);
                    }
                    continue;
                }
                (PlatformId::Windows, ENCODING_MS_SYMBOL) => MappingKind::Symbol,
                (PlatformId::Windows, ENCODING_MS_ID_UCS_4)
                | (PlatformId::Unicode, ENCODING_APPLE_ID_UNICODE_32) => MappingKind::UnicodeFull,
                (PlatformId::ISO, _)
                | (PlatformId::Unicode, _)
                | (PlatformId::Windows, ENCODING_MS_UNICODE_CS) => MappingKind::UnicodeBmp,
                _ => continue,
            };
            if kind < best_kind {
                continue;
            }
            match record.subtable(cmap.offset_data()) {
                Ok(subtable @ (CmapSubtable::Format4(_) | CmapSubtable::Format12(_))) => {
                    best_kind = kind;
                    best = Some(subtable);
                }
                Ok(_) => {}
                Err(e) => log::debug!("skipping unreadable cmap subtable: {e}"),
            }
        }

        let ranges = match &best {
            Some(CmapSubtable::Format4(subtable)) => format4_ranges(subtable),
            Some(CmapSubtable::Format12(subtable)) => format12_ranges(subtable),
            _ => Vec::new(),
        };
        let coverage = SparseBitSet::from_ranges(&ranges);

        let mut vs_coverage = Vec::new();
        if let Some(variants) = variants {
            let mut per_selector: Vec<Vec<u32>> = Vec::new();
            for (cp, selector, variant) in variants.iter() {
                let index = vs_index(selector);
                if index == INVALID_VS_INDEX {
                    continue;
                }
                let present = match variant {
                    MapVariant::UseDefault => coverage.get(cp),
                    MapVariant::Variant(gid) => gid != GlyphId::NOTDEF,
                };
                if !present {
                    continue;
                }
                let index = usize::from(index);
                if per_selector.len() <= index {
                    per_selector.resize_with(index + 1, Vec::new);
                }
                per_selector[index].push(cp);
            }
            vs_coverage = per_selector
                .into_iter()
                .map(|codepoints| {
                    (!codepoints.is_empty())
                        .then(|| SparseBitSet::from_ranges(&coalesce(codepoints)))
                })
                .collect();
        }

        Ok(Self {
            coverage,
            vs_coverage,
        })
    }
}

/// Covered ranges of a format 4 subtable.
///
/// Segments are merged before lookup, so each BMP code point is mapped at
/// most once regardless of how many segments claim it.
fn format4_ranges(subtable: &Cmap4<'_>) -> Vec<Range<u32>> {
    let segments = subtable
        .start_code()
        .iter()
        .zip(subtable.end_code())
        .map(|(start, end)| u32::from(start.get())..u32::from(end.get()) + 1)
        .collect();
    let codepoints = merge(segments)
        .into_iter()
        .flatten()
        .filter(|&cp| {
            subtable
                .map_codepoint(cp)
                .is_some_and(|gid| gid != GlyphId::NOTDEF)
        })
        .collect();
    coalesce(codepoints)
}

/// Covered ranges of a format 12 subtable, clamped to [`MAX_VALUE`].
fn format12_ranges(subtable: &Cmap12<'_>) -> Vec<Range<u32>> {
    let mut ranges = Vec::new();
    for group in subtable.groups() {
        push_group(
            &mut ranges,
            group.start_char_code(),
            group.end_char_code(),
            group.start_glyph_id(),
        );
    }
    merge(ranges)
}

/// Pushes the code points of one sequential map group that do not map to
/// `.notdef`.
fn push_group(ranges: &mut Vec<Range<u32>>, start: u32, end: u32, start_glyph: u32) {
    if start > end || start >= MAX_VALUE {
        return;
    }
    let end = end.min(MAX_VALUE - 1) + 1;
    // Glyph ids are truncated to 16 bits, so every 65536th code point of a
    // group can land on glyph 0.
    let mut notdef = start + (0x1_0000 - (start_glyph & 0xFFFF)) % 0x1_0000;
    let mut next = start;
    while notdef < end {
        if next < notdef {
            ranges.push(next..notdef);
        }
        next = notdef + 1;
        notdef += 0x1_0000;
    }
    if next < end {
        ranges.push(next..end);
    }
}

/// Sorts ranges and joins the ones that overlap or touch.
fn merge(mut ranges: Vec<Range<u32>>) -> Vec<Range<u32>> {
    ranges.sort_unstable_by_key(|r| r.start);
    let mut merged: Vec<Range<u32>> = Vec::with_capacity(ranges.len());
    for range in ranges.into_iter().filter(|r| !r.is_empty()) {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Collapses unordered code points into sorted, disjoint ranges.
fn coalesce(mut codepoints: Vec<u32>) -> Vec<Range<u32>> {
    codepoints.sort_unstable();
    codepoints.dedup();
    let mut ranges: Vec<Range<u32>> = Vec::new();
    for cp in codepoints {
        match ranges.last_mut() {
            Some(last) if last.end == cp => last.end = cp.saturating_add(1),
            _ => ranges.push(cp..cp.saturating_add(1)),
        }
    }
    ranges
}
