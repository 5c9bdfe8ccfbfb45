// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact, immutable bitmap of code point coverage.
//!
//! The domain is split into pages of 256 values. A page index maps each page
//! to one of three states: no coverage, fully covered, or a block of eight
//! 32-bit words holding one bit per value. Coverage of Unicode is bursty, so
//! most pages end up in one of the first two states and cost nothing beyond
//! their index entry.
//!
//! # Persisted layout
//!
//! All values are big-endian.
//!
//! | field        | type          | notes                                   |
//! |--------------|---------------|-----------------------------------------|
//! | version      | `u16`         | currently `1`                           |
//! | reserved     | `u16`         | always zero                             |
//! | max value    | `u32`         | exclusive upper bound of set values     |
//! | page count   | `u32`         | `ceil(max value / 256)`                 |
//! | pages        | `u32[]`       | block id or one of the page sentinels   |
//! | word count   | `u32`         | multiple of 8                           |
//! | words        | `u32[]`       | bit blocks, least significant bit first |

use alloc::{boxed::Box, vec, vec::Vec};
use core::{fmt, ops::Range};
use read_fonts::{types::BigEndian, ReadError};
use thiserror::Error;

use crate::buffer::{BufferReader, BufferWriter};

/// Exclusive upper bound of the values a [`SparseBitSet`] can hold.
pub const MAX_VALUE: u32 = 1 << 25;

const FORMAT_VERSION: u16 = 1;

const LOG_VALUES_PER_PAGE: u32 = 8;
const VALUES_PER_PAGE: u32 = 1 << LOG_VALUES_PER_PAGE;
const PAGE_MASK: u32 = VALUES_PER_PAGE - 1;
const LOG_BITS_PER_WORD: u32 = 5;
const WORD_MASK: u32 = (1 << LOG_BITS_PER_WORD) - 1;
const WORDS_PER_PAGE: usize = (VALUES_PER_PAGE >> LOG_BITS_PER_WORD) as usize;

const EMPTY_PAGE: u32 = u32::MAX;
const FULL_PAGE: u32 = u32::MAX - 1;

/// Error produced when decoding a persisted [`SparseBitSet`].
///
/// The layout is only ever produced by [`SparseBitSet::write_to`], so any of
/// these indicates corrupted or incompatible data.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The buffer ended early or an array overran it.
    #[error("coverage data is truncated: {0}")]
    Read(#[from] ReadError),
    /// The layout version is not one this crate writes.
    #[error("unsupported coverage format version {0}")]
    UnsupportedVersion(u16),
    /// The reserved header field was not zero.
    #[error("reserved header field is not zero")]
    NonZeroPadding,
    /// The maximum value lies outside of the coverage domain.
    #[error("maximum value {0:#x} exceeds the coverage domain")]
    ValueOutOfDomain(u32),
    /// The number of pages does not match the maximum value.
    #[error("expected {expected} pages, found {found}")]
    IndexLength {
        /// Page count implied by the maximum value.
        expected: usize,
        /// Page count stored in the buffer.
        found: usize,
    },
    /// The word array cannot be split into whole blocks for the pages.
    #[error("invalid word count {0}")]
    WordCount(usize),
    /// A page refers to a block that does not exist.
    #[error("page refers to block {page} but only {blocks} blocks exist")]
    PageOutOfBounds {
        /// Block id stored for the page.
        page: u32,
        /// Number of blocks in the word array.
        blocks: usize,
    },
}

/// Set of code points stored as a two-level bitmap.
///
/// A set is either built from sorted ranges, in which case it owns its
/// storage, or decoded with [`read_from`](Self::read_from), in which case it
/// borrows the decoded buffer for `'a`.
///
/// The empty set holds no allocation and is the size of a single pointer.
#[derive(Clone, Default)]
pub struct SparseBitSet<'a> {
    tables: Option<Box<Tables<'a>>>,
}

#[derive(Clone)]
struct Tables<'a> {
    max_value: u32,
    pages: Packed<'a>,
    words: Packed<'a>,
}

/// `u32` array that is either owned or a view into a persisted buffer.
#[derive(Clone)]
enum Packed<'a> {
    Owned(Vec<u32>),
    Borrowed(&'a [BigEndian<u32>]),
}

impl Packed<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Owned(values) => values.len(),
            Self::Borrowed(values) => values.len(),
        }
    }

    fn get(&self, index: usize) -> Option<u32> {
        match self {
            Self::Owned(values) => values.get(index).copied(),
            Self::Borrowed(values) => values.get(index).map(|value| value.get()),
        }
    }

    fn write_to(&self, writer: &mut BufferWriter) {
        match self {
            Self::Owned(values) => writer.write_u32_array(values.iter().copied()),
            Self::Borrowed(values) => writer.write_u32_array(values.iter().map(|v| v.get())),
        }
    }
}

impl SparseBitSet<'static> {
    /// Creates a set covering the given half-open ranges.
    ///
    /// Ranges must be sorted and must not overlap; adjacent ranges are
    /// allowed and empty ranges are ignored. Values at or above
    /// [`MAX_VALUE`] are dropped.
    ///
    /// # Panics
    ///
    /// Panics if a range is reversed or if the ranges are unsorted or
    /// overlapping.
    pub fn from_ranges(ranges: &[Range<u32>]) -> Self {
        let mut prev_end = 0;
        for range in ranges {
            assert!(
                range.start <= range.end,
                "reversed coverage range {range:?}"
            );
            assert!(
                range.start >= prev_end,
                "coverage ranges must be sorted and disjoint, found {range:?} after end {prev_end}"
            );
            prev_end = range.end;
        }
        if prev_end > MAX_VALUE {
            log::warn!(
                "coverage ranges end at {prev_end:#x}, truncating to the domain limit {MAX_VALUE:#x}"
            );
        }
        let clamped = ranges
            .iter()
            .map(|range| range.start.min(MAX_VALUE)..range.end.min(MAX_VALUE))
            .filter(|range| !range.is_empty());
        let Some(max_value) = clamped.clone().last().map(|range| range.end) else {
            return Self::empty();
        };
        let page_count = max_value.div_ceil(VALUES_PER_PAGE) as usize;
        let mut pages = vec![EMPTY_PAGE; page_count];
        let mut words: Vec<u32> = Vec::new();
        for range in clamped {
            let mut start = range.start;
            while start < range.end {
                let page = start >> LOG_VALUES_PER_PAGE;
                let page_start = page << LOG_VALUES_PER_PAGE;
                let end = (page_start + VALUES_PER_PAGE).min(range.end);
                let slot = &mut pages[page as usize];
                if start == page_start && end - start == VALUES_PER_PAGE {
                    // Disjoint input means nothing else touches this page.
                    *slot = FULL_PAGE;
                } else {
                    if *slot == EMPTY_PAGE {
                        #[allow(
                            clippy::cast_possible_truncation,
                            reason = "Block ids are bounded by the page count, which fits in u32."
                        )]
                        let block = (words.len() / WORDS_PER_PAGE) as u32;
                        *slot = block;
                        words.resize(words.len() + WORDS_PER_PAGE, 0);
                    }
                    let offset = *slot as usize * WORDS_PER_PAGE;
                    set_bits(
                        &mut words[offset..offset + WORDS_PER_PAGE],
                        start - page_start,
                        end - page_start,
                    );
                }
                start = end;
            }
        }
        Self {
            tables: Some(Box::new(Tables {
                max_value,
                pages: Packed::Owned(pages),
                words: Packed::Owned(words),
            })),
        }
    }

    /// Creates a set from a flattened list of range boundaries.
    ///
    /// Each consecutive pair `[start, end]` describes the half-open range
    /// `start..end`. A trailing unpaired value is ignored.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`from_ranges`](Self::from_ranges).
    pub fn from_flat(boundaries: &[u32]) -> Self {
        let ranges: Vec<Range<u32>> = boundaries
            .chunks_exact(2)
            .map(|pair| pair[0]..pair[1])
            .collect();
        Self::from_ranges(&ranges)
    }
}

impl<'a> SparseBitSet<'a> {
    /// Creates a set that contains nothing.
    pub const fn empty() -> Self {
        Self { tables: None }
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.tables.is_none()
    }

    /// Returns `true` if the set contains `value`.
    pub fn get(&self, value: u32) -> bool {
        let Some(tables) = &self.tables else {
            return false;
        };
        if value >= tables.max_value {
            return false;
        }
        match tables.pages.get((value >> LOG_VALUES_PER_PAGE) as usize) {
            None | Some(EMPTY_PAGE) => false,
            Some(FULL_PAGE) => true,
            Some(block) => {
                let index =
                    block as usize * WORDS_PER_PAGE + ((value & PAGE_MASK) >> LOG_BITS_PER_WORD) as usize;
                tables
                    .words
                    .get(index)
                    .is_some_and(|word| word & (1 << (value & WORD_MASK)) != 0)
            }
        }
    }

    /// Writes the persisted form of the set.
    pub fn write_to(&self, writer: &mut BufferWriter) {
        writer.write_u16(FORMAT_VERSION);
        writer.write_u16(0);
        match &self.tables {
            Some(tables) => {
                writer.write_u32(tables.max_value);
                tables.pages.write_to(writer);
                tables.words.write_to(writer);
            }
            None => {
                writer.write_u32(0);
                writer.write_u32_array(core::iter::empty());
                writer.write_u32_array(core::iter::empty());
            }
        }
    }

    /// Decodes a set written by [`write_to`](Self::write_to).
    ///
    /// The returned set is a view into the reader's buffer; no page or word
    /// data is copied.
    pub fn read_from(reader: &mut BufferReader<'a>) -> Result<Self, DecodeError> {
        let version = reader.read_u16()?;
        if version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }
        if reader.read_u16()? != 0 {
            return Err(DecodeError::NonZeroPadding);
        }
        let max_value = reader.read_u32()?;
        if max_value > MAX_VALUE {
            return Err(DecodeError::ValueOutOfDomain(max_value));
        }
        let pages = reader.read_u32_array()?;
        let expected = max_value.div_ceil(VALUES_PER_PAGE) as usize;
        if pages.len() != expected {
            return Err(DecodeError::IndexLength {
                expected,
                found: pages.len(),
            });
        }
        let words = reader.read_u32_array()?;
        let blocks = words.len() / WORDS_PER_PAGE;
        if words.len() % WORDS_PER_PAGE != 0 || blocks > pages.len() {
            return Err(DecodeError::WordCount(words.len()));
        }
        for page in pages.iter().map(|page| page.get()) {
            if page != EMPTY_PAGE && page != FULL_PAGE && page as usize >= blocks {
                return Err(DecodeError::PageOutOfBounds { page, blocks });
            }
        }
        if max_value == 0 {
            return Ok(Self::empty());
        }
        Ok(Self {
            tables: Some(Box::new(Tables {
                max_value,
                pages: Packed::Borrowed(pages),
                words: Packed::Borrowed(words),
            })),
        })
    }
}

impl fmt::Debug for SparseBitSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tables {
            Some(tables) => f
                .debug_struct("SparseBitSet")
                .field("max_value", &tables.max_value)
                .field("pages", &tables.pages.len())
                .field("words", &tables.words.len())
                .finish(),
            None => f.write_str("SparseBitSet(empty)"),
        }
    }
}

/// Sets bits `lo..hi` of a page, where `hi <= 256`.
fn set_bits(page: &mut [u32], lo: u32, hi: u32) {
    let mut bit = lo;
    while bit < hi {
        let word = bit >> LOG_BITS_PER_WORD;
        let end = ((word + 1) << LOG_BITS_PER_WORD).min(hi);
        let count = end - bit;
        let mask = if count == 32 {
            u32::MAX
        } else {
            ((1 << count) - 1) << (bit & WORD_MASK)
        };
        page[word as usize] |= mask;
        bit = end;
    }
}
