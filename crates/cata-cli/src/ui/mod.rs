//! TUI rendering — orchestrates all panes.

pub mod login;
pub mod record_detail;
pub mod record_list;
pub mod tasting_form;

use chrono::{DateTime, Local, Utc};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{AdminFocus, App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame. `now` decides whether the success
/// banner is still showing.
pub fn draw(f: &mut Frame, app: &App, now: DateTime<Utc>) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Login => login::draw(f, rows[1], app),
    Screen::Taster => tasting_form::draw(f, rows[1], app, now),
    Screen::Admin => draw_admin(f, rows[1], app),
  }
  draw_status(f, rows[2], app);

  if let Some(notice) = &app.notice {
    draw_notice(f, area, notice);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%d/%m/%Y").to_string();

  let who = app
    .session
    .current_identity()
    .map(|id| format!("  ·  {} ({})", id.name, id.role))
    .unwrap_or_default();

  let left = Span::styled(
    format!(" cata{who}"),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Admin body ───────────────────────────────────────────────────────────────

fn draw_admin(f: &mut Frame, area: Rect, app: &App) {
  if !app.show_detail {
    record_list::draw(f, area, app);
    return;
  }

  // List on the left (45%), detail on the right (55%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  record_list::draw(f, cols[0], app);
  record_detail::draw(f, cols[1], app);
}

// ─── Notice ───────────────────────────────────────────────────────────────────

/// Centered modal box; any key dismisses it.
fn draw_notice(f: &mut Frame, area: Rect, notice: &str) {
  let [row] = Layout::vertical([Constraint::Length(5)])
    .flex(Flex::Center)
    .areas(area);
  let [popup] = Layout::horizontal([Constraint::Length(50)])
    .flex(Flex::Center)
    .areas(row);

  let block = Block::default()
    .title(" Aviso ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(vec![
      Line::from(notice.to_owned()),
      Line::from(Span::styled(
        "Pulse cualquier tecla para continuar",
        Style::default().fg(Color::DarkGray),
      )),
    ])
    .wrap(Wrap { trim: true })
    .block(block),
    popup,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.screen {
    Screen::Login => (
      "LOGIN",
      "Escriba su nombre  Tab rol  Enter entrar  Esc salir",
    ),
    Screen::Taster => (
      "CATA",
      "↑↓ campo  ←→ valor  Espacio marcar aroma  Ctrl-S guardar  Ctrl-L salir",
    ),
    Screen::Admin if app.admin_focus == AdminFocus::Table => (
      "ADMIN",
      "↑↓/jk mover  Enter detalle  Tab filtros  Ctrl-E exportar  Ctrl-L salir",
    ),
    Screen::Admin => (
      "FILTRO",
      "Escriba para filtrar  ←→ tipo  Tab siguiente  Esc tabla",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
