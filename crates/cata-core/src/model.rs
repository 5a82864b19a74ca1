//! Tasting record types — the unit of data a session collects.
//!
//! A record is an immutable sensory evaluation of a single wine. Records are
//! never updated once they reach the session; the option sets below carry
//! the Spanish labels shown to tasters, which are also the values written to
//! JSON and CSV.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The role a user declares at login. Not verified against anything.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  /// Fills out tasting forms.
  Taster,
  /// Views, filters, and exports every record.
  Admin,
}

/// The user currently driving the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  /// Trimmed, never empty.
  pub name: String,
  pub role: Role,
}

impl Identity {
  /// Pair a free-text name with a role. Fails if the trimmed name is empty.
  pub fn new(name: &str, role: Role) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(Self {
      name: name.to_owned(),
      role,
    })
  }
}

// ─── Option sets ─────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum WineType {
  #[default]
  #[serde(rename = "Tinto")]
  #[strum(serialize = "Tinto")]
  Red,
  #[serde(rename = "Blanco")]
  #[strum(serialize = "Blanco")]
  White,
  #[serde(rename = "Rosado")]
  #[strum(serialize = "Rosado")]
  Rose,
  #[serde(rename = "Espumoso")]
  #[strum(serialize = "Espumoso")]
  Sparkling,
  #[serde(rename = "Postre")]
  #[strum(serialize = "Postre")]
  Dessert,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum Clarity {
  #[default]
  #[serde(rename = "Limpio")]
  #[strum(serialize = "Limpio")]
  Clear,
  #[serde(rename = "Turbio")]
  #[strum(serialize = "Turbio")]
  Hazy,
  #[serde(rename = "Opaco")]
  #[strum(serialize = "Opaco")]
  Cloudy,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum Body {
  #[serde(rename = "Ligero")]
  #[strum(serialize = "Ligero")]
  Light,
  #[default]
  #[serde(rename = "Medio")]
  #[strum(serialize = "Medio")]
  Medium,
  #[serde(rename = "Robusto")]
  #[strum(serialize = "Robusto")]
  Full,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum Aroma {
  #[serde(rename = "Afrutado")]
  #[strum(serialize = "Afrutado")]
  Fruity,
  #[serde(rename = "Floral")]
  #[strum(serialize = "Floral")]
  Floral,
  #[serde(rename = "Especiado")]
  #[strum(serialize = "Especiado")]
  Spicy,
  #[serde(rename = "Madera")]
  #[strum(serialize = "Madera")]
  Woody,
  #[serde(rename = "Terroso")]
  #[strum(serialize = "Terroso")]
  Earthy,
  #[serde(rename = "Herbal")]
  #[strum(serialize = "Herbal")]
  Herbal,
}

// ─── Score ───────────────────────────────────────────────────────────────────

/// A 1–5 rating, used for every slider and star field on the form.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  /// Fails with [`Error::ScoreOutOfRange`] outside 1–5.
  pub fn new(value: i64) -> Result<Self> {
    if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
      Ok(Self(value as u8))
    } else {
      Err(Error::ScoreOutOfRange(value))
    }
  }

  /// Pull `value` into 1–5 rather than rejecting it.
  pub fn clamped(value: i64) -> Self {
    Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
  }

  /// Move the score by `delta`, stopping at either end of the scale.
  pub fn step(self, delta: i64) -> Self { Self::clamped(i64::from(self.0) + delta) }

  pub fn get(self) -> u8 { self.0 }
}

impl Default for Score {
  fn default() -> Self { Self(3) }
}

impl TryFrom<i64> for Score {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new(value) }
}

impl From<Score> for u8 {
  fn from(score: Score) -> Self { score.0 }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── Aroma notes ─────────────────────────────────────────────────────────────

/// The aroma tags a taster ticked, in the order they were ticked.
/// Never holds the same note twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Aroma>", into = "Vec<Aroma>")]
pub struct AromaNotes(Vec<Aroma>);

impl AromaNotes {
  pub fn new() -> Self { Self::default() }

  /// Add `note` if absent, remove it if present. Returns whether the note is
  /// now selected.
  pub fn toggle(&mut self, note: Aroma) -> bool {
    if let Some(pos) = self.0.iter().position(|n| *n == note) {
      self.0.remove(pos);
      false
    } else {
      self.0.push(note);
      true
    }
  }

  pub fn contains(&self, note: Aroma) -> bool { self.0.contains(&note) }

  pub fn iter(&self) -> impl Iterator<Item = Aroma> + '_ { self.0.iter().copied() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  /// Labels joined by `", "`, as shown in the detail view and the export.
  pub fn joined(&self) -> String {
    self
      .0
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(", ")
  }
}

impl From<Vec<Aroma>> for AromaNotes {
  fn from(notes: Vec<Aroma>) -> Self {
    let mut set = Self::new();
    for note in notes {
      if !set.contains(note) {
        set.0.push(note);
      }
    }
    set
  }
}

impl From<AromaNotes> for Vec<Aroma> {
  fn from(notes: AromaNotes) -> Self { notes.0 }
}

impl FromIterator<Aroma> for AromaNotes {
  fn from_iter<I: IntoIterator<Item = Aroma>>(iter: I) -> Self {
    Self::from(iter.into_iter().collect::<Vec<_>>())
  }
}

// ─── TastingRecord ───────────────────────────────────────────────────────────

/// One submitted evaluation. Once handed to
/// [`SessionState`](crate::session::SessionState) no field is ever updated.
///
/// Serialises with camelCase field names (`tasterName`, `wineName`, ...) so
/// seed files written by the web front end load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TastingRecord {
  /// Creation timestamp, RFC 3339 with milliseconds.
  pub id:                 String,
  pub taster_name:        String,
  pub date:               DateTime<Utc>,
  pub wine_name:          String,
  pub winery:             String,
  pub year:               i32,
  pub wine_type:          WineType,
  pub region:             String,

  // Visual
  pub appearance_color:   String,
  pub appearance_clarity: Clarity,

  // Olfactory
  pub aroma_intensity:    Score,
  #[serde(default)]
  pub aroma_notes:        AromaNotes,

  // Gustatory
  pub flavor_acidity:     Score,
  pub flavor_tannins:     Score,
  pub flavor_body:        Body,
  pub finish:             Score,

  // Overall
  pub overall_rating:     Score,
  #[serde(default)]
  pub notes:              String,
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn identity_trims_name() {
    let id = Identity::new("  Ana  ", Role::Taster).unwrap();
    assert_eq!(id.name, "Ana");
    assert_eq!(id.role, Role::Taster);
  }

  #[test]
  fn identity_rejects_blank_name() {
    assert!(matches!(Identity::new("", Role::Admin), Err(Error::EmptyName)));
    assert!(matches!(
      Identity::new(" \t\n", Role::Admin),
      Err(Error::EmptyName)
    ));
  }

  #[test]
  fn option_sets_list_labels_in_order() {
    let wines: Vec<String> = WineType::iter().map(|w| w.to_string()).collect();
    assert_eq!(wines, ["Tinto", "Blanco", "Rosado", "Espumoso", "Postre"]);

    let aromas: Vec<String> = Aroma::iter().map(|a| a.to_string()).collect();
    assert_eq!(
      aromas,
      ["Afrutado", "Floral", "Especiado", "Madera", "Terroso", "Herbal"]
    );

    assert_eq!(Clarity::default().to_string(), "Limpio");
    assert_eq!(Body::default().to_string(), "Medio");
  }

  #[test]
  fn option_labels_parse_back() {
    assert_eq!("Rosado".parse::<WineType>(), Ok(WineType::Rose));
    assert_eq!("Opaco".parse::<Clarity>(), Ok(Clarity::Cloudy));
    assert_eq!("Robusto".parse::<Body>(), Ok(Body::Full));
    assert_eq!("Madera".parse::<Aroma>(), Ok(Aroma::Woody));
    assert!("Rose".parse::<WineType>().is_err());

    for w in WineType::iter() {
      assert_eq!(w.to_string().parse::<WineType>(), Ok(w));
    }
    for c in Clarity::iter() {
      assert_eq!(c.to_string().parse::<Clarity>(), Ok(c));
    }
    for b in Body::iter() {
      assert_eq!(b.to_string().parse::<Body>(), Ok(b));
    }
    for a in Aroma::iter() {
      assert_eq!(a.to_string().parse::<Aroma>(), Ok(a));
    }
  }

  #[test]
  fn score_bounds() {
    assert_eq!(Score::default().get(), 3);
    assert!(Score::new(1).is_ok());
    assert!(Score::new(5).is_ok());
    assert!(matches!(Score::new(0), Err(Error::ScoreOutOfRange(0))));
    assert!(matches!(Score::new(6), Err(Error::ScoreOutOfRange(6))));
    assert_eq!(Score::clamped(-4).get(), 1);
    assert_eq!(Score::clamped(42).get(), 5);
    assert_eq!(Score::default().step(1).get(), 4);
    assert_eq!(Score::clamped(5).step(1).get(), 5);
    assert_eq!(Score::clamped(1).step(-1).get(), 1);
  }

  #[test]
  fn toggling_twice_removes_note() {
    let mut notes = AromaNotes::new();
    assert!(notes.toggle(Aroma::Woody));
    assert!(notes.toggle(Aroma::Fruity));
    assert!(!notes.toggle(Aroma::Woody));
    assert_eq!(notes.iter().collect::<Vec<_>>(), [Aroma::Fruity]);
  }

  #[test]
  fn aroma_notes_keep_insertion_order_and_drop_duplicates() {
    let notes: AromaNotes =
      [Aroma::Spicy, Aroma::Fruity, Aroma::Spicy].into_iter().collect();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes.joined(), "Especiado, Afrutado");
  }

  #[test]
  fn record_deserialises_from_camel_case_json() {
    let json = r#"{
      "id": "2024-05-01T10:00:00.000Z",
      "tasterName": "Ana",
      "date": "2024-05-01T10:00:00.000Z",
      "wineName": "Malbec Reserva",
      "winery": "Bodega Sur",
      "year": 2020,
      "wineType": "Tinto",
      "region": "Mendoza",
      "appearanceColor": "rojo rubí",
      "appearanceClarity": "Limpio",
      "aromaIntensity": 4,
      "aromaNotes": ["Afrutado", "Especiado", "Afrutado"],
      "flavorAcidity": 3,
      "flavorTannins": 4,
      "flavorBody": "Robusto",
      "finish": 4,
      "overallRating": 5,
      "notes": ""
    }"#;

    let record: TastingRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.taster_name, "Ana");
    assert_eq!(record.wine_type, WineType::Red);
    assert_eq!(record.flavor_body, Body::Full);
    assert_eq!(record.overall_rating.get(), 5);
    assert_eq!(record.aroma_notes.joined(), "Afrutado, Especiado");
  }

  #[test]
  fn record_rejects_out_of_range_score() {
    let json = r#"{
      "id": "x", "tasterName": "Ana", "date": "2024-05-01T10:00:00Z",
      "wineName": "w", "winery": "b", "year": 2020, "wineType": "Blanco",
      "region": "r", "appearanceColor": "c", "appearanceClarity": "Turbio",
      "aromaIntensity": 9, "flavorAcidity": 3, "flavorTannins": 3,
      "flavorBody": "Medio", "finish": 3, "overallRating": 3
    }"#;
    assert!(serde_json::from_str::<TastingRecord>(json).is_err());
  }
}
