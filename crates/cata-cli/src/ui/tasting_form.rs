//! Tasting form pane — the taster's screen.

use cata_core::{
  browser,
  form::SUCCESS_DISPLAY_SECS,
  model::{Aroma, Body, Clarity, Score, WineType},
};
use chrono::{DateTime, Utc};
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use strum::IntoEnumIterator;

use crate::app::{App, FormField};

pub const SUCCESS_BANNER: &str = "¡Éxito! Su registro de cata ha sido guardado.";

// ─── Public entry ─────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
  let show_banner = app.form.success().is_visible(now);
  let [banner_area, form_area] = Layout::vertical([
    Constraint::Length(if show_banner { 1 } else { 0 }),
    Constraint::Min(0),
  ])
  .areas(area);

  if show_banner {
    f.render_widget(
      Paragraph::new(format!(" {SUCCESS_BANNER}")).style(
        Style::default()
          .fg(Color::Black)
          .bg(Color::Green)
          .add_modifier(Modifier::BOLD),
      ),
      banner_area,
    );
  }

  let block = Block::default()
    .title(" Nueva cata ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(form_area);
  f.render_widget(block, form_area);

  let (lines, focus_line) = form_lines(app);

  // Keep the focused row on screen.
  let height = inner.height as usize;
  let scroll = focus_line.saturating_sub(height.saturating_sub(2));
  f.render_widget(Paragraph::new(lines).scroll((scroll as u16, 0)), inner);
}

// ─── Lines ────────────────────────────────────────────────────────────────────

/// Every row of the form, plus the index of the focused one.
fn form_lines(app: &App) -> (Vec<Line<'static>>, usize) {
  let focused = app.focused_field();
  let mut lines = Vec::new();
  let mut focus_line = 0;
  let mut section = "";

  for field in FormField::ALL {
    if field.section() != section {
      if !section.is_empty() {
        lines.push(Line::from(""));
      }
      section = field.section();
      lines.push(Line::from(Span::styled(
        section,
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD),
      )));
    }

    let is_focus = field == focused;
    if is_focus {
      focus_line = lines.len();
    }
    let label_style = if is_focus {
      Style::default()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };

    let mut spans = vec![Span::styled(format!(" {:<22}", field.label()), label_style)];
    spans.push(Span::raw(" "));
    spans.extend(value_spans(app, field, is_focus));
    lines.push(Line::from(spans));
  }

  let hint = format!(
    "Ctrl-S guarda la cata; el aviso de éxito dura {SUCCESS_DISPLAY_SECS} s."
  );
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

  (lines, focus_line)
}

fn value_spans(app: &App, field: FormField, is_focus: bool) -> Vec<Span<'static>> {
  let draft = app.form.draft();
  let cursor = if is_focus { "_" } else { "" };

  if let Some(text_field) = field.text_field() {
    return vec![Span::raw(format!("{}{cursor}", app.form.text(text_field)))];
  }
  if let Some(score_field) = field.score_field() {
    let score = app.form.score(score_field);
    return if field.is_star_rating() {
      vec![Span::styled(
        browser::stars(score),
        Style::default().fg(Color::Yellow),
      )]
    } else {
      vec![Span::raw(slider(score))]
    };
  }

  match field {
    FormField::Year => vec![Span::raw(format!("{}{cursor}", app.year_input))],
    FormField::WineType => options(WineType::iter(), draft.wine_type),
    FormField::Clarity => options(Clarity::iter(), draft.appearance_clarity),
    FormField::Body => options(Body::iter(), draft.flavor_body),
    FormField::AromaNotes => Aroma::iter()
      .enumerate()
      .flat_map(|(i, note)| {
        let mark = if draft.aroma_notes.contains(note) { "x" } else { " " };
        let style = if is_focus && i == app.aroma_cursor {
          Style::default().add_modifier(Modifier::REVERSED)
        } else {
          Style::default()
        };
        [Span::styled(format!("[{mark}] {note}"), style), Span::raw("  ")]
      })
      .collect(),
    _ => Vec::new(),
  }
}

/// `1 ──●────── 5  (2)`
fn slider(score: Score) -> String {
  let track = (Score::MIN..=Score::MAX)
    .map(|v| if v == score.get() { "●" } else { "─" })
    .collect::<Vec<_>>()
    .join("─");
  format!("{} {track} {}  ({score})", Score::MIN, Score::MAX)
}

fn options<T: PartialEq + std::fmt::Display>(
  all: impl Iterator<Item = T>,
  selected: T,
) -> Vec<Span<'static>> {
  all
    .flat_map(|option| {
      let span = if option == selected {
        Span::styled(
          format!("‹{option}›"),
          Style::default().add_modifier(Modifier::BOLD),
        )
      } else {
        Span::styled(format!(" {option} "), Style::default().fg(Color::DarkGray))
      };
      [span, Span::raw(" ")]
    })
    .collect()
}
