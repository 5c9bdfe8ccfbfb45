// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Properties for specifying font weight and slant.

use core::fmt;

/// Visual weight class of a font, typically on a scale from 1 to 1000.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FontWeight(u16);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100);

    /// Weight value of 200.
    pub const EXTRA_LIGHT: Self = Self(200);

    /// Weight value of 300.
    pub const LIGHT: Self = Self(300);

    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400);

    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500);

    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600);

    /// Weight value of 700.
    pub const BOLD: Self = Self(700);

    /// Weight value of 800.
    pub const EXTRA_BOLD: Self = Self(800);

    /// Weight value of 900.
    pub const BLACK: Self = Self(900);

    /// Creates a new weight value.
    pub const fn new(weight: u16) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Weight in whole hundreds, truncated.
    fn grade(self) -> u32 {
        u32::from(self.0) / 100
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.0 {
            100 => "thin",
            200 => "extra-light",
            300 => "light",
            400 => "normal",
            500 => "medium",
            600 => "semi-bold",
            700 => "bold",
            800 => "extra-bold",
            900 => "black",
            _ => return write!(f, "{}", self.0),
        };
        f.write_str(keyword)
    }
}

/// Visual slant of a font.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum FontSlant {
    /// Upright glyphs.
    #[default]
    Upright,
    /// Italic glyphs.
    Italic,
}

impl fmt::Display for FontSlant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upright => "upright",
            Self::Italic => "italic",
        })
    }
}

/// Weight and slant of a font, or of a request for one.
///
/// The default style is a normal weight upright font.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct FontStyle {
    weight: FontWeight,
    slant: FontSlant,
}

impl FontStyle {
    /// Creates a new style from the given weight and slant.
    pub const fn new(weight: FontWeight, slant: FontSlant) -> Self {
        Self { weight, slant }
    }

    /// Returns the weight.
    pub const fn weight(self) -> FontWeight {
        self.weight
    }

    /// Returns the slant.
    pub const fn slant(self) -> FontSlant {
        self.slant
    }

    /// Returns the distance between two styles, where `0` is an exact match.
    ///
    /// Each step of 100 in weight costs 1 and a slant mismatch costs 2.
    pub fn match_score(self, other: Self) -> u32 {
        if self == other {
            return 0;
        }
        let mut score = self.weight.grade().abs_diff(other.weight.grade());
        if self.slant != other.slant {
            score += 2;
        }
        score
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weight: {}, slant: {}", self.weight, self.slant)
    }
}

/// Synthetic transforms needed to render a font in a requested style.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct FontFakery {
    fake_bold: bool,
    fake_italic: bool,
}

impl FontFakery {
    /// Creates a new set of transforms.
    pub const fn new(fake_bold: bool, fake_italic: bool) -> Self {
        Self {
            fake_bold,
            fake_italic,
        }
    }

    /// Computes the transforms for rendering `actual` when `wanted` was
    /// requested.
    ///
    /// Bold is synthesized when the request is semi-bold or heavier and at
    /// least two grades heavier than the font (for example medium 500 to
    /// bold 700). Italic is synthesized for an upright font when italic is
    /// requested.
    pub fn compute(wanted: FontStyle, actual: FontStyle) -> Self {
        let wanted_weight = i32::from(wanted.weight.value());
        let actual_weight = i32::from(actual.weight.value());
        let fake_bold = wanted_weight >= 600 && wanted_weight - actual_weight >= 200;
        let fake_italic =
            wanted.slant == FontSlant::Italic && actual.slant == FontSlant::Upright;
        Self::new(fake_bold, fake_italic)
    }

    /// Returns `true` if the renderer should embolden glyphs.
    pub const fn is_fake_bold(self) -> bool {
        self.fake_bold
    }

    /// Returns `true` if the renderer should skew glyphs.
    pub const fn is_fake_italic(self) -> bool {
        self.fake_italic
    }
}
