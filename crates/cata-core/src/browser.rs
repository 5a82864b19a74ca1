//! Filtering and display helpers for the admin's record browser.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::model::{Score, TastingRecord, WineType};

/// Shown in place of the table when no record passes the filter.
pub const NO_MATCHES: &str =
  "No se encontraron registros que coincidan con los filtros.";

/// Shown in the detail view for a record without free-text notes.
pub const NO_NOTES: &str = "Sin comentarios adicionales.";

// ─── Criteria ────────────────────────────────────────────────────────────────

/// What the admin filters on. Absent criteria match every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
  /// Case-insensitive substring of the taster's name.
  pub taster:     Option<String>,
  /// First calendar day to include (UTC).
  pub start_date: Option<NaiveDate>,
  /// Last calendar day to include (UTC), inclusive of the whole day.
  pub end_date:   Option<NaiveDate>,
  pub wine_type:  Option<WineType>,
}

impl FilterCriteria {
  /// Whether no criterion is set. Blank taster text counts as unset.
  pub fn is_empty(&self) -> bool {
    self.taster_needle().is_none()
      && self.start_date.is_none()
      && self.end_date.is_none()
      && self.wine_type.is_none()
  }

  fn taster_needle(&self) -> Option<String> {
    self
      .taster
      .as_deref()
      .filter(|t| !t.trim().is_empty())
      .map(str::to_lowercase)
  }

  /// Midnight UTC at the start of `start_date`.
  fn lower_bound(&self) -> Option<DateTime<Utc>> {
    self.start_date.map(midnight)
  }

  /// Midnight UTC at the start of the day after `end_date`, exclusive.
  fn upper_bound(&self) -> Option<DateTime<Utc>> {
    self.end_date.and_then(|d| d.succ_opt()).map(midnight)
  }

  /// Whether `record` satisfies every criterion that is set.
  pub fn matches(&self, record: &TastingRecord) -> bool {
    let needle = self.taster_needle();
    self.matches_with(record, needle.as_deref())
  }

  fn matches_with(&self, record: &TastingRecord, needle: Option<&str>) -> bool {
    let taster = needle
      .is_none_or(|n| record.taster_name.to_lowercase().contains(n));
    let wine_type = self.wine_type.is_none_or(|w| record.wine_type == w);
    let after_start = self.lower_bound().is_none_or(|lo| record.date >= lo);
    let before_end = self.upper_bound().is_none_or(|hi| record.date < hi);
    taster && wine_type && after_start && before_end
  }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
  date.and_time(NaiveTime::MIN).and_utc()
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Records passing `criteria`, most recent `date` first whatever the input
/// order. Records sharing a timestamp keep their relative input order.
pub fn filter<'a>(
  records: &'a [TastingRecord],
  criteria: &FilterCriteria,
) -> Vec<&'a TastingRecord> {
  let needle = criteria.taster_needle();
  let mut out: Vec<&TastingRecord> = records
    .iter()
    .filter(|r| criteria.matches_with(r, needle.as_deref()))
    .collect();
  out.sort_by(|a, b| b.date.cmp(&a.date));
  out
}

// ─── Display helpers ─────────────────────────────────────────────────────────

/// `"4.0 / 5"`, the rating column format.
pub fn rating_label(score: Score) -> String {
  format!("{:.1} / {}", f64::from(score.get()), Score::MAX)
}

/// Filled and hollow stars, e.g. `★★★☆☆` for 3.
pub fn stars(score: Score) -> String {
  let filled = usize::from(score.get());
  let hollow = usize::from(Score::MAX) - filled;
  format!("{}{}", "★".repeat(filled), "☆".repeat(hollow))
}

/// The free-text notes, or [`NO_NOTES`] if there are none.
pub fn notes_or_placeholder(record: &TastingRecord) -> &str {
  if record.notes.trim().is_empty() {
    NO_NOTES
  } else {
    &record.notes
  }
}
