// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Print which characters of a string a font file can render.
//!
//! Usage: `cargo run --example coverage -- <font file> [text]`

use fontcov::{is_variation_selector, Blob, Font, FontBlob, FontFamily, FontStyle};
use std::sync::Arc;

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: coverage <font file> [text]");
        std::process::exit(2);
    };
    let text = args.next().unwrap_or_else(|| "Hello, world! \u{2764}\u{FE0F}".into());

    let data = match std::fs::read(&path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("could not read {path}: {e}");
            std::process::exit(1);
        }
    };
    let Some(resource) = FontBlob::new(Blob::new(Arc::new(data)), 0) else {
        eprintln!("{path} is not a font");
        std::process::exit(1);
    };
    let font = Font::new(Arc::new(resource));
    println!("style: {}", font.style());
    let family = FontFamily::new([font]);
    println!("axes: {:?}", family.supported_axes());
    println!("variation sequences: {}", family.has_vs_table());

    let matched = family.closest_match(FontStyle::default());
    println!("default style fakery: {:?}", matched.fakery);

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let selector = chars
            .peek()
            .map(|&next| u32::from(next))
            .filter(|&next| is_variation_selector(next));
        match selector {
            Some(selector) => {
                chars.next();
                let covered = family.has_glyph(u32::from(c), selector);
                println!("U+{:04X} U+{selector:04X} {covered}", u32::from(c));
            }
            None => {
                println!("U+{:04X} {c:?} {}", u32::from(c), family.has_glyph(u32::from(c), 0));
            }
        }
    }
}
