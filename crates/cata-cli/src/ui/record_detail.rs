//! Record detail pane — every field of the record under the cursor.

use cata_core::{browser, model::TastingRecord};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(record) = app.cursor_record() else {
    let block = Block::default()
      .title(" Detalle ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let hint = Paragraph::new("Seleccione un registro y pulse Enter.")
      .style(Style::default().fg(Color::DarkGray))
      .block(block);
    f.render_widget(hint, area);
    return;
  };

  let block = Block::default()
    .title(format!(" {} ({}) ", record.wine_name, record.year))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let date = app.export.options.format_date(record.date);

  let mut lines = vec![
    Line::from(Span::styled(
      format!("Catado por {} el {date}", record.taster_name),
      Style::default().fg(Color::DarkGray),
    )),
    Line::from(""),
  ];
  lines.extend(sections(record));

  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .block(block),
    area,
  );
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn sections(r: &TastingRecord) -> Vec<Line<'static>> {
  let aroma_notes = if r.aroma_notes.is_empty() {
    "—".to_owned()
  } else {
    r.aroma_notes.joined()
  };

  let groups: [(&str, Vec<(&str, String)>); 5] = [
    ("Información General", vec![
      ("Bodega", r.winery.clone()),
      ("Tipo", r.wine_type.to_string()),
      ("Región", r.region.clone()),
    ]),
    ("Apariencia", vec![
      ("Color", r.appearance_color.clone()),
      ("Claridad", r.appearance_clarity.to_string()),
    ]),
    ("Aroma", vec![
      ("Intensidad", format!("{} / 5", r.aroma_intensity)),
      ("Notas", aroma_notes),
    ]),
    ("Sabor", vec![
      ("Acidez", format!("{} / 5", r.flavor_acidity)),
      ("Taninos", format!("{} / 5", r.flavor_tannins)),
      ("Cuerpo", r.flavor_body.to_string()),
      ("Final", browser::stars(r.finish)),
    ]),
    ("Impresión General", vec![
      ("Calificación", format!(
        "{}  {}",
        browser::stars(r.overall_rating),
        browser::rating_label(r.overall_rating)
      )),
      ("Comentarios", browser::notes_or_placeholder(r).to_owned()),
    ]),
  ];

  let mut lines = Vec::new();
  for (heading, rows) in groups {
    lines.push(Line::from(Span::styled(
      heading.to_owned(),
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD),
    )));
    for (label, value) in rows {
      lines.push(Line::from(vec![
        Span::styled(format!("  {label:<14}"), Style::default().fg(Color::Cyan)),
        Span::raw(value),
      ]));
    }
    lines.push(Line::from(""));
  }
  lines
}
