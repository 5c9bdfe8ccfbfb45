// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builders for small in-memory fonts used by unit tests.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::Range;
use linebender_resource_handle::Blob;

use crate::font::Font;
use crate::resource::FontBlob;

/// Appends big-endian values to a byte vector.
trait BeWrite {
    fn u8(&mut self, v: u8) -> &mut Self;
    fn u16(&mut self, v: u16) -> &mut Self;
    fn u24(&mut self, v: u32) -> &mut Self;
    fn u32(&mut self, v: u32) -> &mut Self;
}

impl BeWrite for Vec<u8> {
    fn u8(&mut self, v: u8) -> &mut Self {
        self.push(v);
        self
    }

    fn u16(&mut self, v: u16) -> &mut Self {
        self.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn u24(&mut self, v: u32) -> &mut Self {
        self.extend_from_slice(&v.to_be_bytes()[1..]);
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.extend_from_slice(&v.to_be_bytes());
        self
    }
}

fn to_u16(v: impl TryInto<u16>) -> u16 {
    v.try_into().ok().unwrap()
}

fn to_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap()
}

/// One variation selector record of a format 14 subtable.
#[derive(Clone, Debug, Default)]
pub(crate) struct UvsRecord {
    pub(crate) selector: u32,
    /// `(start, additional_count)` default UVS ranges.
    pub(crate) default: Vec<(u32, u8)>,
    /// `(code point, glyph id)` non-default mappings.
    pub(crate) non_default: Vec<(u32, u16)>,
}

/// Contents of a synthesized `cmap` table.
///
/// Every code point in `ranges` is mapped to a distinct non-zero glyph.
/// `segments` and `groups` are written verbatim after the generated ones,
/// which allows building malformed subtables.
#[derive(Clone, Debug)]
pub(crate) struct TestCmap {
    pub(crate) ranges: Vec<Range<u32>>,
    pub(crate) format4: bool,
    pub(crate) format12: bool,
    pub(crate) uvs: Vec<UvsRecord>,
    /// Extra format 4 `(start, end, delta)` segments.
    pub(crate) segments: Vec<(u16, u16, u16)>,
    /// Extra format 12 `(start, end, first glyph)` groups, in the given order.
    pub(crate) groups: Vec<(u32, u32, u32)>,
}

impl Default for TestCmap {
    fn default() -> Self {
        Self {
            ranges: vec![],
            format4: true,
            format12: true,
            uvs: vec![],
            segments: vec![],
            groups: vec![],
        }
    }
}

/// `(start, end inclusive, first glyph)` for each range.
fn glyph_groups(ranges: &[Range<u32>]) -> Vec<(u32, u32, u32)> {
    let mut next_gid = 1;
    ranges
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| {
            let group = (r.start, r.end - 1, next_gid);
            next_gid += r.end - r.start;
            group
        })
        .collect()
}

fn format4(ranges: &[Range<u32>], extra: &[(u16, u16, u16)]) -> Vec<u8> {
    let mut segments: Vec<(u16, u16, u16)> = glyph_groups(ranges)
        .into_iter()
        .filter(|(start, _, _)| *start < 0xFFFF)
        .map(|(start, end, gid)| {
            let end = end.min(0xFFFE);
            let delta = gid.wrapping_sub(start) & 0xFFFF;
            (to_u16(start), to_u16(end), to_u16(delta))
        })
        .collect();
    segments.extend_from_slice(extra);
    segments.sort_by_key(|(_, end, _)| *end);
    segments.push((0xFFFF, 0xFFFF, 1));
    let seg_count = to_u16(segments.len());
    let entry_selector = to_u16(seg_count.ilog2());
    let search_range = 2 << entry_selector;
    let mut out = Vec::new();
    out.u16(4)
        .u16(to_u16(16 + 8 * segments.len()))
        .u16(0)
        .u16(seg_count * 2)
        .u16(search_range)
        .u16(entry_selector)
        .u16(seg_count * 2 - search_range);
    for (_, end, _) in &segments {
        out.u16(*end);
    }
    out.u16(0);
    for (start, _, _) in &segments {
        out.u16(*start);
    }
    for (_, _, delta) in &segments {
        out.u16(*delta);
    }
    for _ in &segments {
        out.u16(0);
    }
    out
}

fn format12(ranges: &[Range<u32>], extra: &[(u32, u32, u32)]) -> Vec<u8> {
    let mut groups = glyph_groups(ranges);
    groups.extend_from_slice(extra);
    let mut out = Vec::new();
    out.u16(12)
        .u16(0)
        .u32(to_u32(16 + 12 * groups.len()))
        .u32(0)
        .u32(to_u32(groups.len()));
    for (start, end, gid) in groups {
        out.u32(start).u32(end).u32(gid);
    }
    out
}

fn format14(records: &[UvsRecord]) -> Vec<u8> {
    let mut records = records.to_vec();
    records.sort_by_key(|r| r.selector);
    let mut header = Vec::new();
    let mut body = Vec::new();
    let body_start = 10 + 11 * records.len();
    for record in &mut records {
        record.default.sort_unstable();
        record.non_default.sort_unstable();
        let default_offset = if record.default.is_empty() {
            0
        } else {
            let offset = body_start + body.len();
            body.u32(to_u32(record.default.len()));
            for (start, count) in &record.default {
                body.u24(*start).u8(*count);
            }
            offset
        };
        let non_default_offset = if record.non_default.is_empty() {
            0
        } else {
            let offset = body_start + body.len();
            body.u32(to_u32(record.non_default.len()));
            for (cp, gid) in &record.non_default {
                body.u24(*cp).u16(*gid);
            }
            offset
        };
        header
            .u24(record.selector)
            .u32(to_u32(default_offset))
            .u32(to_u32(non_default_offset));
    }
    let mut out = Vec::new();
    out.u16(14)
        .u32(to_u32(body_start + body.len()))
        .u32(to_u32(records.len()));
    out.extend_from_slice(&header);
    out.extend_from_slice(&body);
    out
}

/// Builds a `cmap` table with encoding records for each requested format.
pub(crate) fn cmap_table(contents: &TestCmap) -> Vec<u8> {
    // Encoding records must be sorted by platform and encoding.
    let mut subtables: Vec<(u16, u16, Vec<u8>)> = Vec::new();
    if !contents.uvs.is_empty() {
        subtables.push((0, 5, format14(&contents.uvs)));
    }
    if contents.format4 {
        subtables.push((3, 1, format4(&contents.ranges, &contents.segments)));
    }
    if contents.format12 {
        subtables.push((3, 10, format12(&contents.ranges, &contents.groups)));
    }
    let mut out = Vec::new();
    out.u16(0).u16(to_u16(subtables.len()));
    let mut offset = 4 + 8 * subtables.len();
    for (platform, encoding, data) in &subtables {
        out.u16(*platform).u16(*encoding).u32(to_u32(offset));
        offset += data.len();
    }
    for (_, _, data) in &subtables {
        out.extend_from_slice(data);
    }
    out
}

fn os2_table(weight: u16, italic: bool) -> Vec<u8> {
    let mut out = vec![0_u8; 96];
    out[0..2].copy_from_slice(&4_u16.to_be_bytes());
    out[4..6].copy_from_slice(&weight.to_be_bytes());
    out[6..8].copy_from_slice(&5_u16.to_be_bytes());
    let selection: u16 = if italic { 0x0001 } else { 0x0040 };
    out[62..64].copy_from_slice(&selection.to_be_bytes());
    out
}

fn fvar_table(axes: &[[u8; 4]]) -> Vec<u8> {
    let mut out = Vec::new();
    out.u16(1)
        .u16(0)
        .u16(16)
        .u16(2)
        .u16(to_u16(axes.len()))
        .u16(20)
        .u16(0)
        .u16(to_u16(4 + 4 * axes.len()));
    for tag in axes {
        out.extend_from_slice(tag);
        // Fixed 16.16 min, default, max.
        out.u32(100 << 16).u32(400 << 16).u32(900 << 16).u16(0).u16(256);
    }
    out
}

/// Wraps tables in an sfnt table directory.
fn sfnt(mut tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    tables.sort_by(|a, b| a.0.cmp(&b.0));
    let num_tables = to_u16(tables.len());
    let entry_selector = if num_tables == 0 {
        0
    } else {
        to_u16(num_tables.ilog2())
    };
    let search_range = 16 << entry_selector;
    let mut out = Vec::new();
    out.u32(0x0001_0000)
        .u16(num_tables)
        .u16(search_range)
        .u16(entry_selector)
        .u16((num_tables * 16).saturating_sub(search_range));
    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in &tables {
        out.extend_from_slice(tag);
        out.u32(0).u32(to_u32(offset)).u32(to_u32(data.len()));
        offset += data.len().next_multiple_of(4);
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        out.resize(out.len().next_multiple_of(4), 0);
    }
    out
}

/// Builder for a synthesized font file.
#[derive(Clone, Debug)]
pub(crate) struct TestFont {
    weight: u16,
    italic: bool,
    os2: bool,
    cmap: Option<TestCmap>,
    axes: Vec<[u8; 4]>,
}

impl TestFont {
    /// A regular upright font covering printable ASCII.
    pub(crate) fn new() -> Self {
        Self {
            weight: 400,
            italic: false,
            os2: true,
            cmap: Some(TestCmap {
                ranges: vec![0x20..0x7F],
                ..TestCmap::default()
            }),
            axes: vec![],
        }
    }

    pub(crate) fn weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub(crate) fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub(crate) fn without_os2(mut self) -> Self {
        self.os2 = false;
        self
    }

    pub(crate) fn cmap(mut self, cmap: TestCmap) -> Self {
        self.cmap = Some(cmap);
        self
    }

    pub(crate) fn ranges(self, ranges: Vec<Range<u32>>) -> Self {
        self.cmap(TestCmap {
            ranges,
            ..TestCmap::default()
        })
    }

    pub(crate) fn without_cmap(mut self) -> Self {
        self.cmap = None;
        self
    }

    pub(crate) fn axes(mut self, axes: &[[u8; 4]]) -> Self {
        self.axes = axes.to_vec();
        self
    }

    pub(crate) fn build_bytes(&self) -> Vec<u8> {
        let mut tables = Vec::new();
        if let Some(cmap) = &self.cmap {
            tables.push((*b"cmap", cmap_table(cmap)));
        }
        if self.os2 {
            tables.push((*b"OS/2", os2_table(self.weight, self.italic)));
        }
        if !self.axes.is_empty() {
            tables.push((*b"fvar", fvar_table(&self.axes)));
        }
        sfnt(tables)
    }

    pub(crate) fn build_blob(&self) -> Blob<u8> {
        Blob::new(Arc::new(self.build_bytes()))
    }

    pub(crate) fn build_resource(&self) -> FontBlob {
        FontBlob::new(self.build_blob(), 0).unwrap()
    }

    /// Builds a [`Font`] whose style is read from the synthesized `OS/2`.
    pub(crate) fn build_font(&self) -> Font {
        Font::new(Arc::new(self.build_resource()))
    }
}
