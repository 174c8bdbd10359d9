//! Generated non-player characters and their attribute sheet
//!
//! Attributes are semantically bounded to 0..=20 (organic rolls land in 3..=18),
//! but the bound is a game-rule concern and is not enforced here.

use serde::{Deserialize, Serialize};

/// Value substituted for any attribute the model omitted or garbled.
pub const DEFAULT_ATTRIBUTE_VALUE: i32 = 10;

/// Upper end of the semantic attribute range.
pub const MAX_ATTRIBUTE_VALUE: i32 = 20;

/// One of the seven character attributes, keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeField {
    Speed,
    GunAccuracy,
    ThrowingAccuracy,
    Strength,
    BaseStrength,
    Bravery,
    Experience,
}

impl AttributeField {
    pub const ALL: [AttributeField; 7] = [
        AttributeField::Speed,
        AttributeField::GunAccuracy,
        AttributeField::ThrowingAccuracy,
        AttributeField::Strength,
        AttributeField::BaseStrength,
        AttributeField::Bravery,
        AttributeField::Experience,
    ];

    /// JSON key used by the model payload.
    pub fn wire_name(self) -> &'static str {
        match self {
            AttributeField::Speed => "speed",
            AttributeField::GunAccuracy => "gunAccuracy",
            AttributeField::ThrowingAccuracy => "throwingAccuracy",
            AttributeField::Strength => "strength",
            AttributeField::BaseStrength => "baseStrength",
            AttributeField::Bravery => "bravery",
            AttributeField::Experience => "experience",
        }
    }
}

/// The complete seven-field attribute sheet. Never partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAttributes {
    pub speed: i32,
    pub gun_accuracy: i32,
    pub throwing_accuracy: i32,
    pub strength: i32,
    pub base_strength: i32,
    pub bravery: i32,
    pub experience: i32,
}

impl CharacterAttributes {
    /// Every field at [`DEFAULT_ATTRIBUTE_VALUE`].
    pub fn neutral() -> Self {
        Self {
            speed: DEFAULT_ATTRIBUTE_VALUE,
            gun_accuracy: DEFAULT_ATTRIBUTE_VALUE,
            throwing_accuracy: DEFAULT_ATTRIBUTE_VALUE,
            strength: DEFAULT_ATTRIBUTE_VALUE,
            base_strength: DEFAULT_ATTRIBUTE_VALUE,
            bravery: DEFAULT_ATTRIBUTE_VALUE,
            experience: DEFAULT_ATTRIBUTE_VALUE,
        }
    }

    pub fn get(&self, field: AttributeField) -> i32 {
        match field {
            AttributeField::Speed => self.speed,
            AttributeField::GunAccuracy => self.gun_accuracy,
            AttributeField::ThrowingAccuracy => self.throwing_accuracy,
            AttributeField::Strength => self.strength,
            AttributeField::BaseStrength => self.base_strength,
            AttributeField::Bravery => self.bravery,
            AttributeField::Experience => self.experience,
        }
    }

    pub fn set(&mut self, field: AttributeField, value: i32) {
        let slot = match field {
            AttributeField::Speed => &mut self.speed,
            AttributeField::GunAccuracy => &mut self.gun_accuracy,
            AttributeField::ThrowingAccuracy => &mut self.throwing_accuracy,
            AttributeField::Strength => &mut self.strength,
            AttributeField::BaseStrength => &mut self.base_strength,
            AttributeField::Bravery => &mut self.bravery,
            AttributeField::Experience => &mut self.experience,
        };
        *slot = value;
    }

    /// True when every field lies within 0..=20.
    pub fn within_bounds(&self) -> bool {
        AttributeField::ALL
            .iter()
            .all(|field| (0..=MAX_ATTRIBUTE_VALUE).contains(&self.get(*field)))
    }
}

impl Default for CharacterAttributes {
    fn default() -> Self {
        Self::neutral()
    }
}

/// A named NPC produced by the character generation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcCharacter {
    pub name: String,
    pub attributes: CharacterAttributes,
}
