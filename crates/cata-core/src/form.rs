//! [`TastingForm`] — the draft a taster edits before submitting a record.
//!
//! The draft mirrors [`TastingRecord`] minus the fields stamped at submit
//! time (`id`, `taster_name`, `date`). A successful [`TastingForm::submit`]
//! hands exactly one record to the session, resets the draft, and raises a
//! short-lived success flag for the view.

use chrono::{DateTime, Datelike, Duration, SecondsFormat, Timelike, Utc};
use strum::Display;
use tracing::{debug, info};

use crate::{
  Error, Result,
  model::{Aroma, AromaNotes, Body, Clarity, Score, TastingRecord, WineType},
  session::SessionState,
};

/// How long the success flag stays visible after a submit, in seconds.
pub const SUCCESS_DISPLAY_SECS: i64 = 3;

// ─── Field names ─────────────────────────────────────────────────────────────

/// Text fields that must be non-empty for a submit to go through, in the
/// order they appear on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "camelCase")]
pub enum RequiredField {
  WineName,
  Winery,
  Region,
  AppearanceColor,
}

impl RequiredField {
  pub const ALL: [Self; 4] =
    [Self::WineName, Self::Winery, Self::Region, Self::AppearanceColor];
}

/// Every free-text field on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
  WineName,
  Winery,
  Region,
  AppearanceColor,
  Notes,
}

impl From<RequiredField> for TextField {
  fn from(field: RequiredField) -> Self {
    match field {
      RequiredField::WineName => Self::WineName,
      RequiredField::Winery => Self::Winery,
      RequiredField::Region => Self::Region,
      RequiredField::AppearanceColor => Self::AppearanceColor,
    }
  }
}

/// Every 1–5 field on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
  AromaIntensity,
  FlavorAcidity,
  FlavorTannins,
  Finish,
  OverallRating,
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The editable state of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
  pub wine_name:          String,
  pub winery:             String,
  pub year:               i32,
  pub wine_type:          WineType,
  pub region:             String,
  pub appearance_color:   String,
  pub appearance_clarity: Clarity,
  pub aroma_intensity:    Score,
  pub aroma_notes:        AromaNotes,
  pub flavor_acidity:     Score,
  pub flavor_tannins:     Score,
  pub flavor_body:        Body,
  pub finish:             Score,
  pub overall_rating:     Score,
  pub notes:              String,
}

impl Draft {
  /// A blank draft whose vintage defaults to `year`.
  pub fn new(year: i32) -> Self {
    Self {
      wine_name:          String::new(),
      winery:             String::new(),
      year,
      wine_type:          WineType::default(),
      region:             String::new(),
      appearance_color:   String::new(),
      appearance_clarity: Clarity::default(),
      aroma_intensity:    Score::default(),
      aroma_notes:        AromaNotes::new(),
      flavor_acidity:     Score::default(),
      flavor_tannins:     Score::default(),
      flavor_body:        Body::default(),
      finish:             Score::default(),
      overall_rating:     Score::default(),
      notes:              String::new(),
    }
  }

  fn text(&self, field: TextField) -> &String {
    match field {
      TextField::WineName => &self.wine_name,
      TextField::Winery => &self.winery,
      TextField::Region => &self.region,
      TextField::AppearanceColor => &self.appearance_color,
      TextField::Notes => &self.notes,
    }
  }

  fn text_mut(&mut self, field: TextField) -> &mut String {
    match field {
      TextField::WineName => &mut self.wine_name,
      TextField::Winery => &mut self.winery,
      TextField::Region => &mut self.region,
      TextField::AppearanceColor => &mut self.appearance_color,
      TextField::Notes => &mut self.notes,
    }
  }

  fn score_mut(&mut self, field: ScoreField) -> &mut Score {
    match field {
      ScoreField::AromaIntensity => &mut self.aroma_intensity,
      ScoreField::FlavorAcidity => &mut self.flavor_acidity,
      ScoreField::FlavorTannins => &mut self.flavor_tannins,
      ScoreField::Finish => &mut self.finish,
      ScoreField::OverallRating => &mut self.overall_rating,
    }
  }

  /// The first required field that is empty (or only whitespace), if any.
  ///
  /// Stricter than a plain "non-empty" check: a field of spaces counts as
  /// missing.
  pub fn first_missing(&self) -> Option<RequiredField> {
    RequiredField::ALL
      .into_iter()
      .find(|f| self.text((*f).into()).trim().is_empty())
  }
}

impl Default for Draft {
  fn default() -> Self { Self::new(Utc::now().year()) }
}

// ─── Success flag ────────────────────────────────────────────────────────────

/// "Just submitted" signal that expires [`SUCCESS_DISPLAY_SECS`] after it is
/// raised. The view polls it with the current time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuccessFlag {
  raised_at: Option<DateTime<Utc>>,
}

impl SuccessFlag {
  pub fn raise(&mut self, now: DateTime<Utc>) { self.raised_at = Some(now); }

  /// Drop the flag before it expires, e.g. when the form is torn down.
  pub fn clear(&mut self) { self.raised_at = None; }

  pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
    self.raised_at.is_some_and(|at| {
      now >= at && now - at < Duration::seconds(SUCCESS_DISPLAY_SECS)
    })
  }
}

// ─── Form controller ─────────────────────────────────────────────────────────

/// Collects one record's worth of input and submits it to a
/// [`SessionState`].
#[derive(Debug, Clone, Default)]
pub struct TastingForm {
  draft:      Draft,
  success:    SuccessFlag,
  /// Timestamp of the last record this form produced; keeps ids unique.
  last_stamp: Option<DateTime<Utc>>,
}

impl TastingForm {
  pub fn new() -> Self { Self::default() }

  pub fn draft(&self) -> &Draft { &self.draft }

  pub fn success(&self) -> &SuccessFlag { &self.success }

  pub fn success_mut(&mut self) -> &mut SuccessFlag { &mut self.success }

  // ── Setters ───────────────────────────────────────────────────────────────

  pub fn text(&self, field: TextField) -> &str { self.draft.text(field) }

  pub fn set_text(&mut self, field: TextField, value: impl Into<String>) {
    *self.draft.text_mut(field) = value.into();
  }

  pub fn set_year(&mut self, year: i32) { self.draft.year = year; }

  /// Parse `text` as the vintage. On failure the previous year is kept.
  pub fn set_year_text(&mut self, text: &str) -> Result<()> {
    let year = text
      .trim()
      .parse::<i32>()
      .map_err(|_| Error::InvalidNumber(text.to_owned()))?;
    self.draft.year = year;
    Ok(())
  }

  pub fn set_wine_type(&mut self, wine_type: WineType) { self.draft.wine_type = wine_type; }

  pub fn set_clarity(&mut self, clarity: Clarity) { self.draft.appearance_clarity = clarity; }

  pub fn set_body(&mut self, body: Body) { self.draft.flavor_body = body; }

  pub fn score(&self, field: ScoreField) -> Score {
    match field {
      ScoreField::AromaIntensity => self.draft.aroma_intensity,
      ScoreField::FlavorAcidity => self.draft.flavor_acidity,
      ScoreField::FlavorTannins => self.draft.flavor_tannins,
      ScoreField::Finish => self.draft.finish,
      ScoreField::OverallRating => self.draft.overall_rating,
    }
  }

  pub fn set_score(&mut self, field: ScoreField, score: Score) {
    *self.draft.score_mut(field) = score;
  }

  /// Parse `text` as a score, clamping it into 1–5. Non-numeric input keeps
  /// the previous value.
  pub fn set_score_text(&mut self, field: ScoreField, text: &str) -> Result<()> {
    let value = text
      .trim()
      .parse::<i64>()
      .map_err(|_| Error::InvalidNumber(text.to_owned()))?;
    self.set_score(field, Score::clamped(value));
    Ok(())
  }

  /// Select `note` if it is not selected, deselect it otherwise. Returns
  /// whether the note is now selected.
  pub fn toggle_aroma_note(&mut self, note: Aroma) -> bool {
    self.draft.aroma_notes.toggle(note)
  }

  // ── Submit ────────────────────────────────────────────────────────────────

  /// Turn the draft into a record from the logged-in taster and add it to
  /// `session`.
  ///
  /// On success the draft is reset to defaults and the success flag is raised
  /// at `now`. On failure nothing changes: no record is created and the draft
  /// keeps what was typed.
  pub fn submit(
    &mut self,
    session: &mut SessionState,
    now: DateTime<Utc>,
  ) -> Result<TastingRecord> {
    let taster_name = session
      .current_identity()
      .map(|id| id.name.clone())
      .ok_or(Error::NotLoggedIn)?;

    if let Some(field) = self.draft.first_missing() {
      debug!(%field, "submit rejected");
      return Err(Error::MissingField(field));
    }

    let stamp = self.next_stamp(now);
    let draft = std::mem::replace(&mut self.draft, Draft::new(now.year()));
    let record = TastingRecord {
      id: stamp.to_rfc3339_opts(SecondsFormat::Millis, true),
      taster_name,
      date: stamp,
      wine_name: draft.wine_name,
      winery: draft.winery,
      year: draft.year,
      wine_type: draft.wine_type,
      region: draft.region,
      appearance_color: draft.appearance_color,
      appearance_clarity: draft.appearance_clarity,
      aroma_intensity: draft.aroma_intensity,
      aroma_notes: draft.aroma_notes,
      flavor_acidity: draft.flavor_acidity,
      flavor_tannins: draft.flavor_tannins,
      flavor_body: draft.flavor_body,
      finish: draft.finish,
      overall_rating: draft.overall_rating,
      notes: draft.notes,
    };

    info!(id = %record.id, wine = %record.wine_name, "tasting submitted");
    session.add_record(record.clone());
    self.success.raise(now);
    Ok(record)
  }

  /// `now` truncated to milliseconds, pushed past the previous stamp if two
  /// submits land on the same millisecond.
  fn next_stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    let mut stamp = now.with_nanosecond(millis).unwrap_or(now);
    if let Some(last) = self.last_stamp
      && stamp <= last
    {
      stamp = last + Duration::milliseconds(1);
    }
    self.last_stamp = Some(stamp);
    stamp
  }
}
