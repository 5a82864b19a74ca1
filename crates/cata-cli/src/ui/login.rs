//! Login pane — name entry and role choice.

use cata_core::model::Role;
use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let [row] = Layout::vertical([Constraint::Length(9)])
    .flex(Flex::Center)
    .areas(area);
  let [boxed] = Layout::horizontal([Constraint::Length(46)])
    .flex(Flex::Center)
    .areas(row);

  let block = Block::default()
    .title(" Registro de Catas ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let label = Style::default()
    .fg(Color::Cyan)
    .add_modifier(Modifier::BOLD);

  let role_span = |role: Role, text: &'static str| {
    if role == app.login_role {
      Span::styled(
        format!("[{text}]"),
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
    } else {
      Span::styled(format!(" {text} "), Style::default().fg(Color::DarkGray))
    }
  };

  let lines = vec![
    Line::from(""),
    Line::from(vec![
      Span::styled("Nombre  ", label),
      Span::raw(format!("{}_", app.login_name)),
    ]),
    Line::from(""),
    Line::from(vec![
      Span::styled("Rol     ", label),
      role_span(Role::Taster, "Catador"),
      Span::raw("  "),
      role_span(Role::Admin, "Administrador"),
    ]),
    Line::from(""),
    Line::from(Span::styled(
      "Ctrl-T catador  Ctrl-A administrador",
      Style::default().fg(Color::DarkGray),
    )),
  ];

  f.render_widget(Paragraph::new(lines).block(block), boxed);
}
