use std::collections::BTreeMap;

use crate::foundation::error::{InkError, InkResult};
use crate::stroke::model::{Variant, VariantId};

/// Current persisted schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Font metrics of a character in design units; persisted alongside its variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlyphMetrics {
    /// Horizontal advance.
    pub advance: f64,
    /// `[min_x, min_y, max_x, max_y]`.
    pub bounds: [f64; 4],
    /// Baseline offset.
    pub baseline: f64,
}

/// Everything recorded for one character.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CharacterEntry {
    /// Font metrics of the character.
    #[serde(default)]
    pub metrics: GlyphMetrics,
    /// Accepted variants in capture order.
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl CharacterEntry {
    /// Find a variant by id.
    pub fn variant(&self, id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Preferred variant for playback: the first starred one, else the first.
    pub fn preferred(&self) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.starred)
            .or_else(|| self.variants.first())
    }
}

/// A set of captured characters, keyed by the character itself.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dataset {
    /// Schema version; always [`SCHEMA_VERSION`] for data this crate writes.
    pub version: u32,
    /// Entries keyed by character (stable, sorted order).
    #[serde(default)]
    pub characters: BTreeMap<String, CharacterEntry>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

impl Dataset {
    /// Empty dataset at the current schema version.
    pub fn new() -> Self {
        Self {
            version: SCHEMA_VERSION,
            characters: BTreeMap::new(),
        }
    }

    /// Entry for `ch`, if any.
    pub fn entry(&self, ch: char) -> Option<&CharacterEntry> {
        self.characters.get(&key(ch))
    }

    /// Entry for `ch`, created empty on first use.
    pub fn entry_mut(&mut self, ch: char) -> &mut CharacterEntry {
        self.characters.entry(key(ch)).or_default()
    }

    /// Append an accepted variant to the entry for `ch`.
    pub fn insert_variant(&mut self, ch: char, variant: Variant) -> InkResult<()> {
        let entry = self.entry_mut(ch);
        if entry.variant(&variant.id).is_some() {
            return Err(InkError::validation(format!(
                "variant '{}' already recorded for '{ch}'",
                variant.id
            )));
        }
        entry.variants.push(variant);
        Ok(())
    }

    /// Remove a variant; returns it when found.
    pub fn remove_variant(&mut self, ch: char, id: &VariantId) -> Option<Variant> {
        let entry = self.characters.get_mut(&key(ch))?;
        let idx = entry.variants.iter().position(|v| &v.id == id)?;
        Some(entry.variants.remove(idx))
    }

    /// Replace a variant by a copy with a new `starred` flag.
    pub fn set_starred(&mut self, ch: char, id: &VariantId, starred: bool) -> InkResult<()> {
        let slot = self
            .characters
            .get_mut(&key(ch))
            .and_then(|e| e.variants.iter_mut().find(|v| &v.id == id))
            .ok_or_else(|| InkError::validation(format!("no variant '{id}' for '{ch}'")))?;
        *slot = slot.with_starred(starred);
        Ok(())
    }

    /// Total number of variants across characters.
    pub fn variant_count(&self) -> usize {
        self.characters.values().map(|e| e.variants.len()).sum()
    }

    /// Check the invariants playback relies on.
    pub fn validate(&self) -> InkResult<()> {
        if self.version != SCHEMA_VERSION {
            return Err(InkError::validation(format!(
                "unsupported dataset version {} (expected {SCHEMA_VERSION})",
                self.version
            )));
        }
        for (ch, entry) in &self.characters {
            if ch.chars().count() != 1 {
                return Err(InkError::validation(format!(
                    "character key '{ch}' must be exactly one character"
                )));
            }
            for v in &entry.variants {
                validate_variant(v).map_err(|e| {
                    InkError::validation(format!("character '{ch}', variant '{}': {e}", v.id))
                })?;
            }
        }
        Ok(())
    }
}

fn validate_variant(v: &Variant) -> Result<(), String> {
    if !v.weight.is_finite() {
        return Err("weight must be finite".to_string());
    }
    if v.strokes.is_empty() {
        return Err("variant has no strokes".to_string());
    }
    for (i, s) in v.strokes.iter().enumerate() {
        if s.resampled.is_empty() {
            return Err(format!("stroke {i} has no resampled points"));
        }
        if !s.resampled.windows(2).all(|w| w[0].s <= w[1].s) {
            return Err(format!("stroke {i} arc length decreases"));
        }
        if s.resampled.iter().any(|p| p.dt < 0.0 || !p.dt.is_finite()) {
            return Err(format!("stroke {i} has a negative or non-finite dt"));
        }
    }
    Ok(())
}

fn key(ch: char) -> String {
    ch.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/model.rs"]
mod tests;
