// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interned locale lists.

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use icu_locale_core::extensions::unicode::{key, value};
use icu_locale_core::subtags::script;
use smallvec::SmallVec;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Preferred presentation of emoji for a locale.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum EmojiStyle {
    /// No preference was expressed.
    #[default]
    Empty,
    /// Explicit request for the default presentation.
    Default,
    /// Color emoji presentation.
    Emoji,
    /// Monochrome text presentation.
    Text,
}

impl EmojiStyle {
    fn resolve(locale: &icu_locale_core::Locale) -> Self {
        if let Some(em) = locale.extensions.unicode.keywords.get(&key!("em")) {
            if *em == value!("emoji") {
                return Self::Emoji;
            }
            if *em == value!("text") {
                return Self::Text;
            }
            if *em == value!("default") {
                return Self::Default;
            }
        }
        match locale.id.script {
            Some(s) if s == script!("Zsye") => Self::Emoji,
            Some(s) if s == script!("Zsym") => Self::Text,
            _ => Self::Empty,
        }
    }
}

/// A parsed BCP-47 locale with its emoji preference.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Locale {
    id: icu_locale_core::Locale,
    emoji_style: EmojiStyle,
}

impl Locale {
    /// Parses a BCP-47 tag, returning `None` if it is malformed.
    pub fn parse(tag: &str) -> Option<Self> {
        let id = icu_locale_core::Locale::try_from_str(tag.trim()).ok()?;
        let emoji_style = EmojiStyle::resolve(&id);
        Some(Self { id, emoji_style })
    }

    /// Returns the underlying locale.
    pub fn id(&self) -> &icu_locale_core::Locale {
        &self.id
    }

    /// Returns the emoji presentation preference.
    pub fn emoji_style(&self) -> EmojiStyle {
        self.emoji_style
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

/// Ordered list of locales, most preferred first.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LocaleList {
    locales: SmallVec<[Locale; 2]>,
}

impl LocaleList {
    /// Parses a comma separated list of tags. Malformed entries are skipped.
    pub fn parse(tags: &str) -> Self {
        let locales = tags
            .split(',')
            .filter(|tag| !tag.trim().is_empty())
            .filter_map(|tag| {
                let locale = Locale::parse(tag);
                if locale.is_none() {
                    log::debug!("ignoring malformed locale {tag:?}");
                }
                locale
            })
            .collect();
        Self { locales }
    }

    /// Returns the locales in preference order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// Returns the number of locales.
    pub fn len(&self) -> usize {
        self.locales.len()
    }

    /// Returns `true` if the list has no locales.
    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    /// Returns `true` if any locale prefers the given emoji style.
    pub fn has_emoji_style(&self, style: EmojiStyle) -> bool {
        self.locales.iter().any(|l| l.emoji_style == style)
    }
}

/// Identifier of an interned [`LocaleList`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct LocaleListId(u32);

impl LocaleListId {
    /// The empty locale list.
    pub const EMPTY: Self = Self(0);

    /// Returns the raw identifier.
    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct Registry {
    ids: HashMap<String, LocaleListId>,
    lists: Vec<Arc<LocaleList>>,
}

impl Registry {
    fn new() -> Self {
        let mut ids = HashMap::new();
        ids.insert(String::new(), LocaleListId::EMPTY);
        Self {
            ids,
            lists: vec![Arc::new(LocaleList::default())],
        }
    }
}

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::new()))
}

/// Process-wide interner mapping locale list strings to stable ids.
#[derive(Copy, Clone, Debug)]
pub struct LocaleListCache;

impl LocaleListCache {
    /// Returns the id for a comma separated list of BCP-47 tags, interning
    /// it on first use.
    pub fn get_id(tags: &str) -> LocaleListId {
        if let Some(id) = registry()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ids
            .get(tags)
        {
            return *id;
        }
        let list = LocaleList::parse(tags);
        let mut registry = registry().write().unwrap_or_else(PoisonError::into_inner);
        if let Some(id) = registry.ids.get(tags) {
            return *id;
        }
        let Ok(raw) = u32::try_from(registry.lists.len()) else {
            log::warn!("locale list registry is full, using the empty list for {tags:?}");
            return LocaleListId::EMPTY;
        };
        let id = LocaleListId(raw);
        registry.lists.push(Arc::new(list));
        registry.ids.insert(tags.to_string(), id);
        id
    }

    /// Returns the list for an id. Unknown ids resolve to the empty list.
    pub fn get_by_id(id: LocaleListId) -> Arc<LocaleList> {
        let registry = registry().read().unwrap_or_else(PoisonError::into_inner);
        registry
            .lists
            .get(id.0 as usize)
            .or_else(|| registry.lists.first())
            .cloned()
            .unwrap_or_default()
    }
}
