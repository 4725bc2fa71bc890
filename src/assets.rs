//! Externally loaded game data: the decor catalog (`decor.json`) and the
//! creature roster (`protagonist.json`).
//!
//! The page fetches both documents and hands their text to the crate. Either may
//! still be in flight when the game starts, so [`Assets`] holds each as an
//! `Option` and callers ask for it explicitly instead of assuming it is there.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::decor::{DecorCatalog, HabitatCategory};

/// Languages shown in the header, in display order.
pub const HEADER_LANGUAGES: [&str; 4] = ["mg", "zh", "ru", "ja"];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid decor catalog: {0}")]
    DecorCatalog(#[source] serde_json::Error),
    #[error("invalid creature roster: {0}")]
    CreatureRoster(#[source] serde_json::Error),
    #[error("invalid game config: {0}")]
    Config(#[source] serde_json::Error),
}

impl From<AssetError> for JsValue {
    fn from(err: AssetError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// A playable creature: its emoji plus display names keyed by language code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Creature {
    pub emoji: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl Creature {
    /// The T-Rex everybody starts as.
    pub fn starter() -> Self {
        let names = [
            ("en", "T-Rex"),
            ("fr", "T-Rex"),
            ("zh", "霸王龙"),
            ("ja", "ティラノサウルス"),
            ("ru", "Тираннозавр"),
            ("es", "Tiranosaurio"),
            ("mg", "T-Rex"),
        ];
        Self {
            emoji: "🦖".to_string(),
            translations: names.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    /// Header label: names for [`HEADER_LANGUAGES`] that exist, joined by `" | "`.
    pub fn header_label(&self) -> String {
        HEADER_LANGUAGES
            .iter()
            .filter_map(|lang| self.translations.get(*lang))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CreatureRoster {
    #[serde(default)]
    pub land_animals: Vec<Creature>,
    #[serde(default)]
    pub sea_animals: Vec<Creature>,
}

impl CreatureRoster {
    pub fn creatures(&self, category: HabitatCategory) -> &[Creature] {
        match category {
            HabitatCategory::Land => &self.land_animals,
            HabitatCategory::Sea => &self.sea_animals,
        }
    }

    /// Habitat of an emoji. Anything not listed as a sea creature (including
    /// the starter) counts as land.
    pub fn category_of(&self, emoji: &str) -> HabitatCategory {
        if self.land_animals.iter().any(|c| c.emoji == emoji) {
            HabitatCategory::Land
        } else if self.sea_animals.iter().any(|c| c.emoji == emoji) {
            HabitatCategory::Sea
        } else {
            HabitatCategory::Land
        }
    }
}

pub fn parse_decor_catalog(json: &str) -> Result<DecorCatalog, AssetError> {
    serde_json::from_str(json).map_err(AssetError::DecorCatalog)
}

pub fn parse_creature_roster(json: &str) -> Result<CreatureRoster, AssetError> {
    serde_json::from_str(json).map_err(AssetError::CreatureRoster)
}

/// Whatever has been loaded so far.
#[derive(Clone, Debug, Default)]
pub struct Assets {
    decor: Option<DecorCatalog>,
    roster: Option<CreatureRoster>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decor(&self) -> Option<&DecorCatalog> {
        self.decor.as_ref()
    }

    pub fn roster(&self) -> Option<&CreatureRoster> {
        self.roster.as_ref()
    }

    pub fn set_decor(&mut self, catalog: DecorCatalog) {
        self.decor = Some(catalog);
    }

    pub fn set_roster(&mut self, roster: CreatureRoster) {
        self.roster = Some(roster);
    }

    /// Habitat of `creature`; land until the roster has arrived.
    pub fn category_of(&self, creature: &Creature) -> HabitatCategory {
        self.roster
            .as_ref()
            .map_or(HabitatCategory::Land, |r| r.category_of(&creature.emoji))
    }
}
