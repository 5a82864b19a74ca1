//! Record table pane — filter bar above the admin's record list.

use cata_core::{
  browser::{self, NO_MATCHES},
  export::DateZone,
  model::TastingRecord,
};
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Row, Table, TableState},
};

use crate::app::{AdminFocus, App, parse_date};

/// The table shows the day only; the detail pane has the full timestamp.
pub const TABLE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Render the filter bar and the filtered table into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let [filter_area, table_area] =
    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

  draw_filters(f, filter_area, app);
  draw_table(f, table_area, app);
}

// ─── Filter bar ───────────────────────────────────────────────────────────────

fn draw_filters(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Filtros ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let wine_type = app
    .filter_wine_type
    .map_or_else(|| "Todos".to_owned(), |w| w.to_string());

  let mut spans = Vec::new();
  for (focus, label, value, is_date) in [
    (AdminFocus::Taster, "Catador", app.filter_taster.as_str(), false),
    (AdminFocus::StartDate, "Desde", app.filter_start.as_str(), true),
    (AdminFocus::EndDate, "Hasta", app.filter_end.as_str(), true),
    (AdminFocus::WineType, "Tipo", wine_type.as_str(), false),
  ] {
    let active = app.admin_focus == focus;
    let label_style = if active {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };
    // A date that does not parse is ignored by the filter; flag it.
    let value_style = if is_date && !value.is_empty() && parse_date(value).is_none() {
      Style::default().fg(Color::Red)
    } else {
      Style::default()
    };

    let shown = match (active, is_date, value.is_empty()) {
      (true, _, _) if focus != AdminFocus::WineType => format!("{value}_"),
      (false, true, true) => "AAAA-MM-DD".to_owned(),
      _ => value.to_owned(),
    };

    spans.push(Span::styled(format!(" {label} "), label_style));
    spans.push(Span::styled(format!(" {shown:<12}"), value_style));
  }

  f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

// ─── Table ────────────────────────────────────────────────────────────────────

fn draw_table(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered_records();
  let total = app.session.all_records().len();

  // Title with count.
  let title = if app.criteria().is_empty() {
    format!(" Registros ({total}) ")
  } else {
    format!(" Registros ({}/{total}) ", filtered.len())
  };

  let border = if app.admin_focus == AdminFocus::Table {
    Color::Cyan
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  if filtered.is_empty() {
    let empty = Paragraph::new(NO_MATCHES)
      .style(Style::default().fg(Color::DarkGray))
      .block(block);
    f.render_widget(empty, area);
    return;
  }

  let header = Row::new(["Catador", "Vino (año)", "Tipo", "Fecha", "Calificación"])
    .style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );

  let zone = app.export.options.zone;
  let rows: Vec<Row> = filtered
    .iter()
    .map(|r| Row::new(row_cells(r, zone)))
    .collect();

  let widths = [
    Constraint::Percentage(20),
    Constraint::Percentage(32),
    Constraint::Percentage(12),
    Constraint::Percentage(20),
    Constraint::Percentage(16),
  ];

  // Scrollable table with cursor tracking.
  let mut state = TableState::default();
  state.select(Some(app.list_cursor.min(filtered.len() - 1)));

  f.render_stateful_widget(
    Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}

/// Catador, Vino (año), Tipo, Fecha, Calificación.
fn row_cells(r: &TastingRecord, zone: DateZone) -> [String; 5] {
  [
    r.taster_name.clone(),
    format!("{} ({})", r.wine_name, r.year),
    r.wine_type.to_string(),
    zone.format(r.date, TABLE_DATE_FORMAT),
    browser::rating_label(r.overall_rating),
  ]
}
