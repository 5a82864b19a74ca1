//! CSV export of a (filtered) record list.
//!
//! The column layout is fixed: 18 columns with Spanish headers, one row per
//! record in the order given, `,` between fields and `\n` between lines with
//! no terminator after the last row.

use std::io::Write;

use chrono::{DateTime, FixedOffset, Local, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result, model::TastingRecord};

/// Default name of the exported file.
pub const EXPORT_FILE_NAME: &str = "export_catas.csv";

pub const HEADERS: [&str; 18] = [
  "ID",
  "Catador",
  "Fecha",
  "Vino",
  "Bodega",
  "Año",
  "Tipo de Vino",
  "Región",
  "Color",
  "Claridad",
  "Intensidad Aroma",
  "Notas de Aroma",
  "Acidez",
  "Taninos",
  "Cuerpo",
  "Final",
  "Calificación General",
  "Notas",
];

// ─── Options ─────────────────────────────────────────────────────────────────

/// Which fields get wrapped in quotes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
  /// Only the aroma notes and notes columns are quoted, always. Matches the
  /// files produced by the web front end byte for byte.
  #[default]
  Compatible,
  /// Any field containing a delimiter, quote, or line break is quoted.
  Standard,
}

/// Time zone a record's date is shown in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateZone {
  #[default]
  Utc,
  /// The system zone, resolved per record so each date gets the offset in
  /// force on that day.
  Local,
  /// One offset for every record.
  Fixed(FixedOffset),
}

impl DateZone {
  pub fn format(self, date: DateTime<Utc>, format: &str) -> String {
    match self {
      Self::Utc => date.format(format).to_string(),
      Self::Local => date.with_timezone(&Local).format(format).to_string(),
      Self::Fixed(offset) => date.with_timezone(&offset).format(format).to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
  pub quoting:     Quoting,
  /// `chrono` format string for the date column.
  pub date_format: String,
  pub zone:        DateZone,
}

impl ExportOptions {
  /// `date` as it appears in the date column.
  pub fn format_date(&self, date: DateTime<Utc>) -> String {
    self.zone.format(date, &self.date_format)
  }
}

impl Default for ExportOptions {
  fn default() -> Self {
    Self {
      quoting:     Quoting::default(),
      date_format: "%d/%m/%Y, %H:%M:%S".to_owned(),
      zone:        DateZone::default(),
    }
  }
}

// ─── Export ──────────────────────────────────────────────────────────────────

/// Render `records` as CSV bytes.
pub fn to_csv_bytes<'a>(
  records: impl IntoIterator<Item = &'a TastingRecord>,
  options: &ExportOptions,
) -> Result<Vec<u8>> {
  let style = match options.quoting {
    Quoting::Compatible => QuoteStyle::Never,
    Quoting::Standard => QuoteStyle::Necessary,
  };
  let mut wtr = WriterBuilder::new()
    .quote_style(style)
    .terminator(Terminator::Any(b'\n'))
    .from_writer(Vec::new());

  wtr.write_record(HEADERS)?;
  let mut rows = 0usize;
  for record in records {
    wtr.write_record(row(record, options))?;
    rows += 1;
  }

  let mut buf = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
  // Lines are separated, not terminated.
  if buf.last() == Some(&b'\n') {
    buf.pop();
  }
  debug!(rows, bytes = buf.len(), "csv rendered");
  Ok(buf)
}

/// Write `records` as CSV to `out`. Returns the number of data rows.
pub fn export_csv<'a, W: Write>(
  mut out: W,
  records: impl IntoIterator<Item = &'a TastingRecord>,
  options: &ExportOptions,
) -> Result<usize> {
  let records: Vec<&TastingRecord> = records.into_iter().collect();
  let buf = to_csv_bytes(records.iter().copied(), options)?;
  out.write_all(&buf)?;
  out.flush()?;
  Ok(records.len())
}

fn row(r: &TastingRecord, options: &ExportOptions) -> [String; 18] {
  let (aroma_notes, notes) = match options.quoting {
    Quoting::Compatible => (
      format!("\"{}\"", r.aroma_notes.joined()),
      format!("\"{}\"", r.notes.replace('"', "\"\"")),
    ),
    Quoting::Standard => (r.aroma_notes.joined(), r.notes.clone()),
  };

  [
    r.id.clone(),
    r.taster_name.clone(),
    options.format_date(r.date),
    r.wine_name.clone(),
    r.winery.clone(),
    r.year.to_string(),
    r.wine_type.to_string(),
    r.region.clone(),
    r.appearance_color.clone(),
    r.appearance_clarity.to_string(),
    r.aroma_intensity.to_string(),
    aroma_notes,
    r.flavor_acidity.to_string(),
    r.flavor_tannins.to_string(),
    r.flavor_body.to_string(),
    r.finish.to_string(),
    r.overall_rating.to_string(),
    notes,
  ]
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::model::{Aroma, Body, Clarity, Score, WineType};

  fn sample() -> TastingRecord {
    TastingRecord {
      id:                 "2024-05-01T10:30:00.000Z".into(),
      taster_name:        "Ana".into(),
      date:               Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap(),
      wine_name:          "Malbec Reserva".into(),
      winery:             "Bodega Sur".into(),
      year:               2020,
      wine_type:          WineType::Red,
      region:             "Mendoza".into(),
      appearance_color:   "rojo rubí".into(),
      appearance_clarity: Clarity::Clear,
      aroma_intensity:    Score::clamped(4),
      aroma_notes:        [Aroma::Fruity, Aroma::Spicy].into_iter().collect(),
      flavor_acidity:     Score::default(),
      flavor_tannins:     Score::clamped(2),
      flavor_body:        Body::Full,
      finish:             Score::default(),
      overall_rating:     Score::clamped(5),
      notes:              "Un \"gran\" vino".into(),
    }
  }

  fn render(records: &[TastingRecord], options: &ExportOptions) -> String {
    String::from_utf8(to_csv_bytes(records, options).unwrap()).unwrap()
  }

  #[test]
  fn header_only_for_empty_list() {
    let out = render(&[], &ExportOptions::default());
    assert_eq!(
      out,
      "ID,Catador,Fecha,Vino,Bodega,Año,Tipo de Vino,Región,Color,Claridad,\
       Intensidad Aroma,Notas de Aroma,Acidez,Taninos,Cuerpo,Final,\
       Calificación General,Notas"
    );
  }

  #[test]
  fn compatible_row_matches_web_export() {
    let out = render(&[sample()], &ExportOptions::default());
    let lines: Vec<&str> = out.split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
      lines[1],
      "2024-05-01T10:30:00.000Z,Ana,01/05/2024, 10:30:00,Malbec Reserva,\
       Bodega Sur,2020,Tinto,Mendoza,rojo rubí,Limpio,4,\
       \"Afrutado, Especiado\",3,2,Robusto,3,5,\"Un \"\"gran\"\" vino\""
    );
  }

  #[test]
  fn compatible_quotes_empty_notes() {
    let mut r = sample();
    r.aroma_notes = Default::default();
    r.notes.clear();
    let out = render(&[r], &ExportOptions::default());
    assert!(out.ends_with(",\"\",3,2,Robusto,3,5,\"\""));
  }

  #[test]
  fn line_count_is_records_plus_one() {
    let records = vec![sample(), sample(), sample()];
    let out = render(&records, &ExportOptions::default());
    assert_eq!(out.split('\n').count(), 4);
    assert!(!out.ends_with('\n'));
  }

  #[test]
  fn standard_quoting_covers_every_field() {
    let mut r = sample();
    r.wine_name = "Crianza, edición limitada".into();
    r.notes = "sin comas".into();
    let options = ExportOptions {
      quoting: Quoting::Standard,
      date_format: "%Y-%m-%d".into(),
      ..Default::default()
    };
    let out = render(&[r], &options);
    let row = out.split('\n').nth(1).unwrap();
    assert!(row.contains(",\"Crianza, edición limitada\","));
    assert!(row.contains(",\"Afrutado, Especiado\","));
    assert!(row.ends_with(",sin comas"));
    assert!(row.contains(",2024-05-01,"));
  }

  #[test]
  fn standard_quoting_escapes_notes() {
    let mut r = sample();
    r.notes = "Dijo \"bien\", y\nsigue".into();
    let options = ExportOptions {
      quoting: Quoting::Standard,
      ..Default::default()
    };
    let out = render(&[r], &options);
    assert!(out.ends_with(",5,\"Dijo \"\"bien\"\", y\nsigue\""));
  }

  #[test]
  fn date_uses_configured_offset() {
    let options = ExportOptions {
      zone: DateZone::Fixed(FixedOffset::west_opt(3 * 3600).unwrap()),
      ..Default::default()
    };
    let out = render(&[sample()], &options);
    assert!(out.contains(",01/05/2024, 07:30:00,"));
  }

  #[test]
  fn local_zone_resolves_offset_per_record() {
    let winter = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
    let summer = Utc.with_ymd_and_hms(2026, 7, 15, 10, 0, 0).unwrap();
    let options = ExportOptions {
      zone: DateZone::Local,
      ..Default::default()
    };

    let mut records = vec![sample(), sample()];
    records[0].date = winter;
    records[1].date = summer;
    let out = render(&records, &options);

    for date in [winter, summer] {
      let expected = date
        .with_timezone(&Local)
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string();
      assert_eq!(options.format_date(date), expected);
      assert!(out.contains(&format!(",{expected},")));
    }
  }

  #[test]
  fn export_writes_to_any_writer() {
    let mut buf = Vec::new();
    let n = export_csv(&mut buf, &[sample(), sample()], &ExportOptions::default())
      .unwrap();
    assert_eq!(n, 2);
    let expected =
      to_csv_bytes(&[sample(), sample()], &ExportOptions::default()).unwrap();
    assert_eq!(buf, expected);
  }
}
