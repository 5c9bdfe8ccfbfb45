// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model for font families.

use alloc::sync::Arc;
use alloc::vec::Vec;
use hashbrown::HashSet;
use read_fonts::{tables::cmap::Cmap, TopLevelTable};
use smallvec::SmallVec;

use crate::access::TableAccess;
use crate::bitset::SparseBitSet;
use crate::font::Font;
use crate::locale::{EmojiStyle, LocaleListCache, LocaleListId};
use crate::style::{FontFakery, FontStyle};
use crate::tables::CmapCoverage;
use crate::variation::{vs_index, AxisTag, FontVariation};

/// Design variant a family is intended for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum FamilyVariant {
    /// Suitable for any context.
    #[default]
    Default,
    /// Reduced vertical metrics, for UI text.
    Compact,
    /// Full vertical metrics, for scripts with tall glyphs.
    Elegant,
}

/// A font selected from a family along with the synthesis needed to render
/// it in the requested style.
#[derive(Copy, Clone, Debug, Default)]
pub struct FakedFont<'a> {
    /// The selected font, or `None` for an empty family.
    pub font: Option<&'a Font>,
    /// Transforms the renderer should apply.
    pub fakery: FontFakery,
}

/// Ordered set of fonts sharing a locale list and variant.
///
/// Code point coverage and supported axes are computed once, during
/// construction, from the member closest to [`FontStyle::default`].
/// Cloning is cheap and the family is immutable afterwards.
#[derive(Clone, Debug)]
pub struct FontFamily(Arc<FamilyInner>);

#[derive(Debug)]
struct FamilyInner {
    locale_list_id: LocaleListId,
    variant: FamilyVariant,
    fonts: SmallVec<[Font; 4]>,
    coverage: SparseBitSet<'static>,
    vs_coverage: Vec<Option<SparseBitSet<'static>>>,
    supported_axes: HashSet<AxisTag>,
}

impl FontFamily {
    /// Creates a family with the empty locale list and default variant.
    pub fn new(fonts: impl IntoIterator<Item = Font>) -> Self {
        Self::with_variant(FamilyVariant::Default, fonts)
    }

    /// Creates a family with the empty locale list.
    pub fn with_variant(variant: FamilyVariant, fonts: impl IntoIterator<Item = Font>) -> Self {
        Self::with_locale_list(LocaleListId::EMPTY, variant, fonts)
    }

    /// Creates a family and computes its coverage.
    ///
    /// Acquires [`TableAccess`], so it must not be called while holding it.
    pub fn with_locale_list(
        locale_list_id: LocaleListId,
        variant: FamilyVariant,
        fonts: impl IntoIterator<Item = Font>,
    ) -> Self {
        let fonts: SmallVec<[Font; 4]> = fonts.into_iter().collect();
        let (cmap, supported_axes) = {
            let access = TableAccess::lock();
            let cmap = compute_coverage(&access, &fonts);
            let mut supported_axes = HashSet::new();
            for font in &fonts {
                supported_axes.extend(font.supported_axes_locked(&access).iter().copied());
            }
            (cmap, supported_axes)
        };
        log::debug!(
            "created family with {} fonts, {} axes, {} variation selector slots",
            fonts.len(),
            supported_axes.len(),
            cmap.vs_coverage.len()
        );
        Self(Arc::new(FamilyInner {
            locale_list_id,
            variant,
            fonts,
            coverage: cmap.coverage,
            vs_coverage: cmap.vs_coverage,
            supported_axes,
        }))
    }

    /// Returns the id of the family's locale list.
    pub fn locale_list_id(&self) -> LocaleListId {
        self.0.locale_list_id
    }

    /// Returns the design variant.
    pub fn variant(&self) -> FamilyVariant {
        self.0.variant
    }

    /// Returns the member fonts in order.
    pub fn fonts(&self) -> &[Font] {
        &self.0.fonts
    }

    /// Returns the base code point coverage.
    pub fn coverage(&self) -> &SparseBitSet<'static> {
        &self.0.coverage
    }

    /// Returns the union of all members' variation axes.
    pub fn supported_axes(&self) -> &HashSet<AxisTag> {
        &self.0.supported_axes
    }

    /// Returns `true` if the representative font has any variation sequence
    /// coverage.
    ///
    /// A format 14 subtable whose sequences all map to `.notdef`, or only
    /// use defaults the base coverage lacks, does not count.
    pub fn has_vs_table(&self) -> bool {
        !self.0.vs_coverage.is_empty()
    }

    /// Returns the index of the member that best matches `style`.
    pub fn closest_match_index(&self, style: FontStyle) -> Option<usize> {
        closest_match_index(&self.0.fonts, style)
    }

    /// Returns the member that best matches `style` and the synthesis needed
    /// to render it in that style.
    pub fn closest_match(&self, style: FontStyle) -> FakedFont<'_> {
        match self.closest_match_index(style) {
            Some(index) => {
                let font = &self.0.fonts[index];
                FakedFont {
                    font: Some(font),
                    fakery: FontFakery::compute(style, font.style()),
                }
            }
            None => FakedFont::default(),
        }
    }

    /// Returns `true` if the family can render `codepoint`.
    ///
    /// A `variation_selector` of `0` queries the base coverage; any other
    /// value queries the variation sequence `codepoint` + `variation_selector`.
    pub fn has_glyph(&self, codepoint: u32, variation_selector: u32) -> bool {
        if variation_selector == 0 {
            return self.0.coverage.get(codepoint);
        }
        // Unmapped selectors yield an index past any real slot.
        let index = usize::from(vs_index(variation_selector));
        match self.0.vs_coverage.get(index) {
            Some(Some(coverage)) => coverage.get(codepoint),
            _ => false,
        }
    }

    /// Returns a new family with the given axis values applied to every
    /// member that supports at least one of them.
    ///
    /// Returns `None` if no requested axis is supported by the family. The
    /// receiver is never modified.
    pub fn create_with_variation(&self, variations: &[FontVariation]) -> Option<Self> {
        if variations.is_empty() || self.0.supported_axes.is_empty() {
            return None;
        }
        if !variations
            .iter()
            .any(|v| self.0.supported_axes.contains(&v.axis_tag))
        {
            return None;
        }
        let mut fonts = SmallVec::<[Font; 4]>::new();
        for font in &self.0.fonts {
            let resource = {
                let access = TableAccess::lock();
                let axes = font.supported_axes_locked(&access);
                if variations.iter().any(|v| axes.contains(&v.axis_tag)) {
                    font.resource().create_with_variation(variations)
                } else {
                    None
                }
            };
            match resource {
                Some(resource) => fonts.push(Font::builder(resource).style(font.style()).build()),
                None => {
                    log::trace!("reusing original resource for font with style {}", font.style());
                    fonts.push(font.clone());
                }
            }
        }
        log::debug!("derived family for {} axis values", variations.len());
        Some(Self::with_locale_list(
            self.0.locale_list_id,
            self.0.variant,
            fonts,
        ))
    }

    /// Returns `true` if the family's locale list prefers color emoji.
    pub fn is_color_emoji_family(&self) -> bool {
        LocaleListCache::get_by_id(self.0.locale_list_id).has_emoji_style(EmojiStyle::Emoji)
    }
}

/// First member wins ties.
fn closest_match_index(fonts: &[Font], style: FontStyle) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, font) in fonts.iter().enumerate() {
        let score = font.style().match_score(style);
        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((index, score));
        }
    }
    best.map(|(index, _)| index)
}

fn compute_coverage(_access: &TableAccess<'_>, fonts: &[Font]) -> CmapCoverage {
    let Some(index) = closest_match_index(fonts, FontStyle::default()) else {
        return CmapCoverage::default();
    };
    let font = &fonts[index];
    let Some(data) = font.resource().table(Cmap::TAG) else {
        log::error!("could not get cmap table for {:?}", font.resource());
        return CmapCoverage::default();
    };
    match CmapCoverage::from_table(data) {
        Ok(coverage) => coverage,
        Err(e) => {
            log::error!("could not read cmap table for {:?}: {e}", font.resource());
            CmapCoverage::default()
        }
    }
}
