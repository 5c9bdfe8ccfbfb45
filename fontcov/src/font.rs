// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model for a font.

use alloc::sync::Arc;
use hashbrown::HashSet;
use std::sync::OnceLock;

use crate::access::TableAccess;
use crate::resource::FontResource;
use crate::style::{FontSlant, FontStyle, FontWeight};
use crate::tables;
use crate::variation::AxisTag;

/// A physical font resource paired with its style.
///
/// The set of variation axes is read from the font on first use and cached.
#[derive(Clone, Debug)]
pub struct Font {
    resource: Arc<dyn FontResource>,
    style: FontStyle,
    axes: Arc<OnceLock<HashSet<AxisTag>>>,
}

impl Font {
    /// Creates a font with the style described by its `OS/2` table.
    ///
    /// Acquires [`TableAccess`].
    pub fn new(resource: Arc<dyn FontResource>) -> Self {
        Self::builder(resource).build()
    }

    /// Returns a builder for overriding parts of the style.
    pub fn builder(resource: Arc<dyn FontResource>) -> FontBuilder {
        FontBuilder {
            resource,
            weight: None,
            slant: None,
        }
    }

    /// Returns the underlying resource.
    pub fn resource(&self) -> &Arc<dyn FontResource> {
        &self.resource
    }

    /// Returns the style of the font.
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Returns the variation axes declared by the font.
    ///
    /// Acquires [`TableAccess`] the first time it is called.
    pub fn supported_axes(&self) -> &HashSet<AxisTag> {
        if let Some(axes) = self.axes.get() {
            return axes;
        }
        let access = TableAccess::lock();
        self.supported_axes_locked(&access)
    }

    pub(crate) fn supported_axes_locked(&self, access: &TableAccess<'_>) -> &HashSet<AxisTag> {
        self.axes
            .get_or_init(|| tables::analyze_axes(access, &*self.resource))
    }
}

/// Builder for a [`Font`].
#[derive(Debug)]
#[must_use]
pub struct FontBuilder {
    resource: Arc<dyn FontResource>,
    weight: Option<FontWeight>,
    slant: Option<FontSlant>,
}

impl FontBuilder {
    /// Sets both weight and slant.
    pub fn style(self, style: FontStyle) -> Self {
        self.weight(style.weight()).slant(style.slant())
    }

    /// Sets the weight.
    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Sets the slant.
    pub fn slant(mut self, slant: FontSlant) -> Self {
        self.slant = Some(slant);
        self
    }

    /// Builds the font, reading any unset style fields from `OS/2`.
    ///
    /// Fields that are neither set nor present in the font fall back to
    /// [`FontStyle::default`].
    pub fn build(self) -> Font {
        let style = match (self.weight, self.slant) {
            (Some(weight), Some(slant)) => FontStyle::new(weight, slant),
            (weight, slant) => {
                let analyzed = {
                    let access = TableAccess::lock();
                    tables::analyze_style(&access, &*self.resource)
                }
                .unwrap_or_default();
                FontStyle::new(
                    weight.unwrap_or(analyzed.weight()),
                    slant.unwrap_or(analyzed.slant()),
                )
            }
        };
        Font {
            resource: self.resource,
            style,
            axes: Arc::new(OnceLock::new()),
        }
    }
}
