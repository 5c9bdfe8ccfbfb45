// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Variable font axis settings and variation selectors.

use read_fonts::types::Tag;

/// Four byte identifier of a variable font design axis, such as `wght`.
pub type AxisTag = Tag;

/// A value for a single variation axis.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontVariation {
    /// Axis the value applies to.
    pub axis_tag: AxisTag,
    /// Axis value in design units.
    pub value: f32,
}

impl FontVariation {
    /// Creates a new axis setting.
    pub const fn new(axis_tag: AxisTag, value: f32) -> Self {
        Self { axis_tag, value }
    }
}

/// Index returned by [`vs_index`] for code points that are not variation
/// selectors.
pub const INVALID_VS_INDEX: u16 = u16::MAX;

const VS1: u32 = 0xFE00;
const VS16: u32 = 0xFE0F;
const VS17: u32 = 0xE0100;
const VS256: u32 = 0xE01EF;

/// Maps a variation selector to a dense index.
///
/// VS1–VS16 (U+FE00–U+FE0F) map to 0–15 and VS17–VS256 (U+E0100–U+E01EF)
/// map to 16–255. Anything else maps to [`INVALID_VS_INDEX`].
pub fn vs_index(selector: u32) -> u16 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Both selector blocks are narrower than u16."
    )]
    match selector {
        VS1..=VS16 => (selector - VS1) as u16,
        VS17..=VS256 => (selector - VS17) as u16 + 16,
        _ => INVALID_VS_INDEX,
    }
}

/// Returns `true` if `cp` is a variation selector.
pub fn is_variation_selector(cp: u32) -> bool {
    vs_index(cp) != INVALID_VS_INDEX
}
