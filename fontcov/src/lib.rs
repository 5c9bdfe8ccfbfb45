// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Code point coverage and style matching for font families.
//!
//! A [`FontFamily`] is an ordered set of [`Font`]s that share a locale list
//! and a [`FamilyVariant`]. When a family is built, the `cmap` table of the
//! member closest to the default style is reduced to a [`SparseBitSet`],
//! along with one set per variation selector found in a format 14 subtable.
//! After that, coverage queries and style matching never touch font data.
//!
//! All reads of font tables are serialized through a single process-wide
//! lock, represented by [`TableAccess`].
//!
//! ## Features
//!
//! - `std` (enabled by default): Required.
//!
//! ## Example
//!
//! ```
//! use fontcov::{BufferReader, BufferWriter, SparseBitSet};
//!
//! let set = SparseBitSet::from_ranges(&[0x20..0x7F, 0x1F600..0x1F650]);
//! assert!(set.get(0x41));
//! assert!(!set.get(0x7F));
//!
//! let mut writer = BufferWriter::new();
//! set.write_to(&mut writer);
//! let bytes = writer.into_bytes();
//!
//! let mut reader = BufferReader::new(&bytes);
//! let view = SparseBitSet::read_from(&mut reader).unwrap();
//! assert!(view.get(0x1F600));
//! ```
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
compile_error!("fontcov requires the `std` feature to be enabled");

extern crate alloc;

mod access;
mod bitset;
mod buffer;
mod family;
mod font;
mod locale;
mod resource;
mod style;
mod tables;
mod variation;

#[cfg(test)]
mod test_util;

pub use linebender_resource_handle::Blob;
pub use read_fonts::types::Tag;

pub use access::TableAccess;
pub use bitset::{DecodeError, SparseBitSet, MAX_VALUE};
pub use buffer::{BufferReader, BufferWriter};
pub use family::{FakedFont, FamilyVariant, FontFamily};
pub use font::{Font, FontBuilder};
pub use locale::{EmojiStyle, Locale, LocaleList, LocaleListCache, LocaleListId};
pub use resource::{FontBlob, FontResource};
pub use style::{FontFakery, FontSlant, FontStyle, FontWeight};
pub use tables::{analyze_axes, analyze_style, CmapCoverage};
pub use variation::{is_variation_selector, vs_index, AxisTag, FontVariation, INVALID_VS_INDEX};
