//! Product categories and their per-category attribute sets.
//!
//! On the wire a product carries `category` plus a flat list of
//! `{ key, value }` pairs. Inside the crate the pairs are parsed once into a
//! [`ProductAttributes`] variant whose field set is fixed by the category,
//! so a Monitor can never carry a `processor` and a duplicated key never
//! gets past construction.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::is_filled;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Merchandising,
    Computer,
    Monitor,
    Audio,
    Peripherals,
    Other,
}

/// Categories in the order they are offered in the category dropdown.
pub const ALL_CATEGORIES: [Category; 6] = [
    Category::Merchandising,
    Category::Computer,
    Category::Monitor,
    Category::Audio,
    Category::Peripherals,
    Category::Other,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merchandising => "Merchandising",
            Self::Computer => "Computer",
            Self::Monitor => "Monitor",
            Self::Audio => "Audio",
            Self::Peripherals => "Peripherals",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::Validation(format!("Invalid category '{s}'")))
    }

    /// Attribute keys a product of this category may carry, in display order.
    pub fn allowed_keys(&self) -> &'static [AttributeKey] {
        use AttributeKey::*;
        match self {
            Self::Merchandising => &[Color],
            Self::Computer => &[
                Brand,
                Model,
                Processor,
                Ram,
                Storage,
                Screen,
                KeyboardLanguage,
                Gpu,
                Color,
            ],
            Self::Monitor => &[Brand, Model, Screen, Color],
            Self::Audio => &[Brand, Model, Color],
            Self::Peripherals => &[Brand, Model, KeyboardLanguage, Color],
            Self::Other => &[Brand, Model, Color],
        }
    }

    /// Attribute keys that must be filled before a product can be saved.
    pub fn required_keys(&self) -> &'static [AttributeKey] {
        match self {
            Self::Merchandising => &[],
            _ => &[AttributeKey::Brand, AttributeKey::Model],
        }
    }

    /// Merchandising items are identified by name instead of brand/model.
    pub fn requires_name(&self) -> bool {
        matches!(self, Self::Merchandising)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Attribute keys
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Brand,
    Model,
    Color,
    Screen,
    KeyboardLanguage,
    Processor,
    Ram,
    Storage,
    Gpu,
}

impl AttributeKey {
    /// Wire key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Model => "model",
            Self::Color => "color",
            Self::Screen => "screen",
            Self::KeyboardLanguage => "keyboardLanguage",
            Self::Processor => "processor",
            Self::Ram => "ram",
            Self::Storage => "storage",
            Self::Gpu => "gpu",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "brand" => Ok(Self::Brand),
            "model" => Ok(Self::Model),
            "color" => Ok(Self::Color),
            "screen" => Ok(Self::Screen),
            "keyboardLanguage" => Ok(Self::KeyboardLanguage),
            "processor" => Ok(Self::Processor),
            "ram" => Ok(Self::Ram),
            "storage" => Ok(Self::Storage),
            "gpu" => Ok(Self::Gpu),
            _ => Err(CoreError::Validation(format!("Unknown attribute key '{s}'"))),
        }
    }

    /// Label used in form errors and table headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Model => "Model",
            Self::Color => "Color",
            Self::Screen => "Screen",
            Self::KeyboardLanguage => "Keyboard Language",
            Self::Processor => "Processor",
            Self::Ram => "RAM",
            Self::Storage => "Storage",
            Self::Gpu => "GPU",
        }
    }
}

/// A single `{ key, value }` pair as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub key: String,
    pub value: String,
}

impl AttributeEntry {
    pub fn new(key: AttributeKey, value: impl Into<String>) -> Self {
        Self {
            key: key.as_str().to_string(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-category field sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchandisingAttributes {
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputerAttributes {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub processor: Option<String>,
    pub ram: Option<String>,
    pub storage: Option<String>,
    pub screen: Option<String>,
    pub keyboard_language: Option<String>,
    pub gpu: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorAttributes {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub screen: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioAttributes {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeripheralsAttributes {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub keyboard_language: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtherAttributes {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
}

/// Category-specific attributes of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAttributes {
    Merchandising(MerchandisingAttributes),
    Computer(ComputerAttributes),
    Monitor(MonitorAttributes),
    Audio(AudioAttributes),
    Peripherals(PeripheralsAttributes),
    Other(OtherAttributes),
}

impl ProductAttributes {
    /// An attribute set with every field unset.
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Merchandising => Self::Merchandising(Default::default()),
            Category::Computer => Self::Computer(Default::default()),
            Category::Monitor => Self::Monitor(Default::default()),
            Category::Audio => Self::Audio(Default::default()),
            Category::Peripherals => Self::Peripherals(Default::default()),
            Category::Other => Self::Other(Default::default()),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Merchandising(_) => Category::Merchandising,
            Self::Computer(_) => Category::Computer,
            Self::Monitor(_) => Category::Monitor,
            Self::Audio(_) => Category::Audio,
            Self::Peripherals(_) => Category::Peripherals,
            Self::Other(_) => Category::Other,
        }
    }

    /// Build an attribute set from wire pairs.
    ///
    /// Pairs with an empty value are ignored. A non-empty value for a key the
    /// category does not carry, or the same key given twice, is rejected.
    pub fn from_pairs(category: Category, pairs: &[AttributeEntry]) -> Result<Self, CoreError> {
        let mut attrs = Self::empty(category);
        let mut seen = HashSet::new();

        for pair in pairs {
            if pair.value.trim().is_empty() {
                continue;
            }
            let key = AttributeKey::parse(&pair.key)?;
            if !seen.insert(key) {
                return Err(CoreError::Validation(format!(
                    "Duplicate attribute '{}'",
                    key.as_str()
                )));
            }
            attrs.set(key, Some(pair.value.trim().to_string()))?;
        }

        Ok(attrs)
    }

    /// Filled attributes as wire pairs, in the category's display order.
    pub fn to_pairs(&self) -> Vec<AttributeEntry> {
        self.category()
            .allowed_keys()
            .iter()
            .filter_map(|key| self.get(*key).map(|v| AttributeEntry::new(*key, v)))
            .collect()
    }

    /// Value of `key`, if the category carries it and it is filled.
    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.slot(key)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    /// Set or clear `key`. Fails if the category does not carry the key.
    pub fn set(&mut self, key: AttributeKey, value: Option<String>) -> Result<(), CoreError> {
        let category = self.category();
        let slot = self.slot_mut(key).ok_or_else(|| {
            CoreError::Validation(format!(
                "Attribute '{}' is not valid for category {category}",
                key.as_str()
            ))
        })?;
        *slot = value.filter(|v| !v.trim().is_empty());
        Ok(())
    }

    /// Required keys of the category that are not filled.
    pub fn missing_required(&self) -> Vec<AttributeKey> {
        self.category()
            .required_keys()
            .iter()
            .copied()
            .filter(|key| !is_filled(self.get(*key)))
            .collect()
    }

    /// Brand and model joined for display, when the category has them.
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [AttributeKey::Brand, AttributeKey::Model]
            .iter()
            .filter_map(|k| self.get(*k))
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    fn slot(&self, key: AttributeKey) -> Option<&Option<String>> {
        use AttributeKey as K;
        match (self, key) {
            (Self::Merchandising(a), K::Color) => Some(&a.color),
            (Self::Computer(a), K::Brand) => Some(&a.brand),
            (Self::Computer(a), K::Model) => Some(&a.model),
            (Self::Computer(a), K::Processor) => Some(&a.processor),
            (Self::Computer(a), K::Ram) => Some(&a.ram),
            (Self::Computer(a), K::Storage) => Some(&a.storage),
            (Self::Computer(a), K::Screen) => Some(&a.screen),
            (Self::Computer(a), K::KeyboardLanguage) => Some(&a.keyboard_language),
            (Self::Computer(a), K::Gpu) => Some(&a.gpu),
            (Self::Computer(a), K::Color) => Some(&a.color),
            (Self::Monitor(a), K::Brand) => Some(&a.brand),
            (Self::Monitor(a), K::Model) => Some(&a.model),
            (Self::Monitor(a), K::Screen) => Some(&a.screen),
            (Self::Monitor(a), K::Color) => Some(&a.color),
            (Self::Audio(a), K::Brand) => Some(&a.brand),
            (Self::Audio(a), K::Model) => Some(&a.model),
            (Self::Audio(a), K::Color) => Some(&a.color),
            (Self::Peripherals(a), K::Brand) => Some(&a.brand),
            (Self::Peripherals(a), K::Model) => Some(&a.model),
            (Self::Peripherals(a), K::KeyboardLanguage) => Some(&a.keyboard_language),
            (Self::Peripherals(a), K::Color) => Some(&a.color),
            (Self::Other(a), K::Brand) => Some(&a.brand),
            (Self::Other(a), K::Model) => Some(&a.model),
            (Self::Other(a), K::Color) => Some(&a.color),
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: AttributeKey) -> Option<&mut Option<String>> {
        use AttributeKey as K;
        match (self, key) {
            (Self::Merchandising(a), K::Color) => Some(&mut a.color),
            (Self::Computer(a), K::Brand) => Some(&mut a.brand),
            (Self::Computer(a), K::Model) => Some(&mut a.model),
            (Self::Computer(a), K::Processor) => Some(&mut a.processor),
            (Self::Computer(a), K::Ram) => Some(&mut a.ram),
            (Self::Computer(a), K::Storage) => Some(&mut a.storage),
            (Self::Computer(a), K::Screen) => Some(&mut a.screen),
            (Self::Computer(a), K::KeyboardLanguage) => Some(&mut a.keyboard_language),
            (Self::Computer(a), K::Gpu) => Some(&mut a.gpu),
            (Self::Computer(a), K::Color) => Some(&mut a.color),
            (Self::Monitor(a), K::Brand) => Some(&mut a.brand),
            (Self::Monitor(a), K::Model) => Some(&mut a.model),
            (Self::Monitor(a), K::Screen) => Some(&mut a.screen),
            (Self::Monitor(a), K::Color) => Some(&mut a.color),
            (Self::Audio(a), K::Brand) => Some(&mut a.brand),
            (Self::Audio(a), K::Model) => Some(&mut a.model),
            (Self::Audio(a), K::Color) => Some(&mut a.color),
            (Self::Peripherals(a), K::Brand) => Some(&mut a.brand),
            (Self::Peripherals(a), K::Model) => Some(&mut a.model),
            (Self::Peripherals(a), K::KeyboardLanguage) => Some(&mut a.keyboard_language),
            (Self::Peripherals(a), K::Color) => Some(&mut a.color),
            (Self::Other(a), K::Brand) => Some(&mut a.brand),
            (Self::Other(a), K::Model) => Some(&mut a.model),
            (Self::Other(a), K::Color) => Some(&mut a.color),
            _ => None,
        }
    }
}
