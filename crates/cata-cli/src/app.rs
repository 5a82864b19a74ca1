//! Application state machine and event dispatcher.

use std::{fs::File, io::BufWriter, iter, path::PathBuf};

use anyhow::Context as _;
use cata_core::{
  Error,
  browser::{self, FilterCriteria},
  export::{self, ExportOptions},
  form::{RequiredField, ScoreField, TastingForm, TextField},
  model::{Aroma, Body, Clarity, Role, TastingRecord, WineType},
  session::SessionState,
};
use chrono::{DateTime, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;
use tracing::{error, info};

/// Blocking notice for a login attempt with no name.
pub const EMPTY_NAME_NOTICE: &str = "Por favor, introduzca un nombre.";

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Name entry and role choice.
  Login,
  /// The tasting form.
  Taster,
  /// Filterable record table with a detail pane.
  Admin,
}

// ─── Form fields ──────────────────────────────────────────────────────────────

/// One focusable row of the tasting form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  WineName,
  Winery,
  Year,
  WineType,
  Region,
  AppearanceColor,
  Clarity,
  AromaIntensity,
  AromaNotes,
  FlavorAcidity,
  FlavorTannins,
  Body,
  Finish,
  OverallRating,
  Notes,
}

impl FormField {
  pub const ALL: [Self; 15] = [
    Self::WineName,
    Self::Winery,
    Self::Year,
    Self::WineType,
    Self::Region,
    Self::AppearanceColor,
    Self::Clarity,
    Self::AromaIntensity,
    Self::AromaNotes,
    Self::FlavorAcidity,
    Self::FlavorTannins,
    Self::Body,
    Self::Finish,
    Self::OverallRating,
    Self::Notes,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Self::WineName => "Nombre del Vino",
      Self::Winery => "Bodega",
      Self::Year => "Año",
      Self::WineType => "Tipo de Vino",
      Self::Region => "Región",
      Self::AppearanceColor => "Color",
      Self::Clarity => "Claridad",
      Self::AromaIntensity => "Intensidad del Aroma",
      Self::AromaNotes => "Notas de Aroma",
      Self::FlavorAcidity => "Acidez",
      Self::FlavorTannins => "Taninos",
      Self::Body => "Cuerpo",
      Self::Finish => "Final",
      Self::OverallRating => "Calificación General",
      Self::Notes => "Comentarios Abiertos",
    }
  }

  /// Heading of the form section this field belongs to.
  pub fn section(self) -> &'static str {
    match self {
      Self::WineName | Self::Winery | Self::Year | Self::WineType | Self::Region => {
        "Información General"
      }
      Self::AppearanceColor | Self::Clarity => "Apariencia (Visual)",
      Self::AromaIntensity | Self::AromaNotes => "Aroma (Olfativo)",
      Self::FlavorAcidity | Self::FlavorTannins | Self::Body | Self::Finish => {
        "Sabor (Gustativo)"
      }
      Self::OverallRating | Self::Notes => "Impresión General",
    }
  }

  pub fn text_field(self) -> Option<TextField> {
    match self {
      Self::WineName => Some(TextField::WineName),
      Self::Winery => Some(TextField::Winery),
      Self::Region => Some(TextField::Region),
      Self::AppearanceColor => Some(TextField::AppearanceColor),
      Self::Notes => Some(TextField::Notes),
      _ => None,
    }
  }

  pub fn score_field(self) -> Option<ScoreField> {
    match self {
      Self::AromaIntensity => Some(ScoreField::AromaIntensity),
      Self::FlavorAcidity => Some(ScoreField::FlavorAcidity),
      Self::FlavorTannins => Some(ScoreField::FlavorTannins),
      Self::Finish => Some(ScoreField::Finish),
      Self::OverallRating => Some(ScoreField::OverallRating),
      _ => None,
    }
  }

  /// Finish and overall rating are stars; the other scores are sliders.
  pub fn is_star_rating(self) -> bool {
    matches!(self, Self::Finish | Self::OverallRating)
  }
}

impl From<RequiredField> for FormField {
  fn from(field: RequiredField) -> Self {
    match field {
      RequiredField::WineName => Self::WineName,
      RequiredField::Winery => Self::Winery,
      RequiredField::Region => Self::Region,
      RequiredField::AppearanceColor => Self::AppearanceColor,
    }
  }
}

// ─── Admin focus ──────────────────────────────────────────────────────────────

/// Which part of the admin screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminFocus {
  Table,
  Taster,
  StartDate,
  EndDate,
  WineType,
}

impl AdminFocus {
  const ORDER: [Self; 5] = [
    Self::Table,
    Self::Taster,
    Self::StartDate,
    Self::EndDate,
    Self::WineType,
  ];

  fn shifted(self, step: i64) -> Self { cycle_in(&Self::ORDER, self, step) }
}

// ─── Export settings ──────────────────────────────────────────────────────────

/// Where and how `Ctrl-E` writes the filtered view.
#[derive(Debug, Clone)]
pub struct ExportSettings {
  pub path:    PathBuf,
  pub options: ExportOptions,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Identity and every record of this run.
  pub session: SessionState,

  // ── Login ─────────────────────────────────────────────────────────────────
  pub login_name: String,
  /// Role the Enter key logs in as.
  pub login_role: Role,
  /// Modal message; the next key press dismisses it.
  pub notice:     Option<String>,

  // ── Taster ────────────────────────────────────────────────────────────────
  pub form:         TastingForm,
  /// Index into [`FormField::ALL`].
  pub form_focus:   usize,
  /// Raw text of the year field; may be empty or partial while typing.
  pub year_input:   String,
  /// Index into the aroma option list.
  pub aroma_cursor: usize,

  // ── Admin ─────────────────────────────────────────────────────────────────
  pub filter_taster:    String,
  pub filter_start:     String,
  pub filter_end:       String,
  pub filter_wine_type: Option<WineType>,
  pub admin_focus:      AdminFocus,
  /// Cursor position within the *filtered* record list.
  pub list_cursor:      usize,
  pub show_detail:      bool,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub export: ExportSettings,
}

impl App {
  pub fn new(session: SessionState, export: ExportSettings) -> Self {
    let form = TastingForm::new();
    let year_input = form.draft().year.to_string();
    Self {
      screen: Screen::Login,
      session,
      login_name: String::new(),
      login_role: Role::Taster,
      notice: None,
      form,
      form_focus: 0,
      year_input,
      aroma_cursor: 0,
      filter_taster: String::new(),
      filter_start: String::new(),
      filter_end: String::new(),
      filter_wine_type: None,
      admin_focus: AdminFocus::Table,
      list_cursor: 0,
      show_detail: false,
      status_msg: String::new(),
      export,
    }
  }

  pub fn focused_field(&self) -> FormField { FormField::ALL[self.form_focus] }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Criteria built from the filter bar. Unparseable dates count as unset.
  pub fn criteria(&self) -> FilterCriteria {
    FilterCriteria {
      taster:     (!self.filter_taster.trim().is_empty())
        .then(|| self.filter_taster.clone()),
      start_date: parse_date(&self.filter_start),
      end_date:   parse_date(&self.filter_end),
      wine_type:  self.filter_wine_type,
    }
  }

  pub fn filtered_records(&self) -> Vec<&TastingRecord> {
    browser::filter(self.session.all_records(), &self.criteria())
  }

  /// The record under the list cursor in the filtered view, if any.
  pub fn cursor_record(&self) -> Option<&TastingRecord> {
    self.filtered_records().get(self.list_cursor).copied()
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event at `now`. Returns `true` to continue, `false` to
  /// quit.
  pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // A notice blocks everything until dismissed.
    if self.notice.take().is_some() {
      return Ok(true);
    }

    match self.screen {
      Screen::Login => Ok(self.handle_login_key(key)),
      Screen::Taster => {
        self.handle_form_key(key, now);
        Ok(true)
      }
      Screen::Admin => Ok(self.handle_admin_key(key)),
    }
  }

  fn handle_login_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Esc => return false,
      KeyCode::Char('t') if ctrl => self.try_login(Role::Taster),
      KeyCode::Char('a') if ctrl => self.try_login(Role::Admin),
      KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
        self.login_role = match self.login_role {
          Role::Taster => Role::Admin,
          Role::Admin => Role::Taster,
        };
      }
      KeyCode::Enter => self.try_login(self.login_role),
      KeyCode::Backspace => {
        self.login_name.pop();
      }
      KeyCode::Char(c) if !ctrl => self.login_name.push(c),
      _ => {}
    }
    true
  }

  fn try_login(&mut self, role: Role) {
    match self.session.login(&self.login_name, role) {
      Ok(identity) => {
        self.status_msg = format!("Bienvenido, {}", identity.name);
        self.login_name.clear();
        self.screen = match role {
          Role::Taster => Screen::Taster,
          Role::Admin => Screen::Admin,
        };
        self.form_focus = 0;
        self.aroma_cursor = 0;
        self.admin_focus = AdminFocus::Table;
        self.list_cursor = 0;
        self.show_detail = false;
      }
      Err(Error::EmptyName) => self.notice = Some(EMPTY_NAME_NOTICE.to_owned()),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn logout(&mut self) {
    self.session.logout();
    self.form.success_mut().clear();
    self.screen = Screen::Login;
    self.show_detail = false;
    self.status_msg.clear();
  }

  // ── Taster ────────────────────────────────────────────────────────────────

  fn handle_form_key(&mut self, key: KeyEvent, now: DateTime<Utc>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let field = self.focused_field();
    match key.code {
      KeyCode::Char('s') if ctrl => self.submit(now),
      KeyCode::Char('l') if ctrl => self.logout(),

      KeyCode::Up | KeyCode::BackTab => self.move_form_focus(-1),
      KeyCode::Down | KeyCode::Tab | KeyCode::Enter => self.move_form_focus(1),

      KeyCode::Left => self.adjust(field, -1),
      KeyCode::Right => self.adjust(field, 1),

      KeyCode::Char(' ') if field == FormField::AromaNotes => {
        if let Some(note) = Aroma::iter().nth(self.aroma_cursor) {
          self.form.toggle_aroma_note(note);
        }
      }

      KeyCode::Backspace => {
        if let Some(text_field) = field.text_field() {
          let mut text = self.form.text(text_field).to_owned();
          text.pop();
          self.form.set_text(text_field, text);
        } else if field == FormField::Year {
          self.year_input.pop();
          // An emptied field keeps the last valid year until submit.
          let _ = self.form.set_year_text(&self.year_input);
        }
      }

      KeyCode::Char(c) if !ctrl => {
        if let Some(text_field) = field.text_field() {
          let mut text = self.form.text(text_field).to_owned();
          text.push(c);
          self.form.set_text(text_field, text);
        } else if field == FormField::Year && c.is_ascii_digit() && self.year_input.len() < 4 {
          self.year_input.push(c);
          let _ = self.form.set_year_text(&self.year_input);
        }
      }

      _ => {}
    }
  }

  fn move_form_focus(&mut self, step: i64) {
    let len = FormField::ALL.len() as i64;
    self.form_focus = (self.form_focus as i64 + step).rem_euclid(len) as usize;
  }

  /// Left/right on an option, score, or year field.
  fn adjust(&mut self, field: FormField, step: i64) {
    let draft = self.form.draft();
    match field {
      FormField::WineType => {
        let next = cycle(draft.wine_type, step);
        self.form.set_wine_type(next);
      }
      FormField::Clarity => {
        let next = cycle::<Clarity>(draft.appearance_clarity, step);
        self.form.set_clarity(next);
      }
      FormField::Body => {
        let next = cycle::<Body>(draft.flavor_body, step);
        self.form.set_body(next);
      }
      FormField::AromaNotes => {
        let last = Aroma::iter().count() - 1;
        self.aroma_cursor = (self.aroma_cursor as i64 + step).clamp(0, last as i64) as usize;
      }
      FormField::Year => {
        let year = draft.year + step as i32;
        self.form.set_year(year);
        self.year_input = year.to_string();
      }
      other => {
        if let Some(score_field) = other.score_field() {
          let next = self.form.score(score_field).step(step);
          self.form.set_score(score_field, next);
        }
      }
    }
  }

  fn submit(&mut self, now: DateTime<Utc>) {
    if self.form.set_year_text(&self.year_input).is_err() {
      self.notice = Some(format!(
        "Por favor, introduzca un {} válido.",
        FormField::Year.label()
      ));
      self.form_focus = index_of(FormField::Year);
      return;
    }

    match self.form.submit(&mut self.session, now) {
      Ok(record) => {
        info!(id = %record.id, "record saved from form");
        self.year_input = self.form.draft().year.to_string();
        self.form_focus = 0;
        self.aroma_cursor = 0;
        self.status_msg.clear();
      }
      Err(Error::MissingField(missing)) => {
        let field = FormField::from(missing);
        self.notice = Some(format!(
          "Por favor, complete el campo {}.",
          field.label()
        ));
        self.form_focus = index_of(field);
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  // ── Admin ─────────────────────────────────────────────────────────────────

  fn handle_admin_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('e') if ctrl => {
        self.export();
        return true;
      }
      KeyCode::Char('l') if ctrl => {
        self.logout();
        return true;
      }
      KeyCode::Tab => {
        self.admin_focus = self.admin_focus.shifted(1);
        return true;
      }
      KeyCode::BackTab => {
        self.admin_focus = self.admin_focus.shifted(-1);
        return true;
      }
      _ => {}
    }

    match self.admin_focus {
      AdminFocus::Table => return self.handle_table_key(key),
      AdminFocus::WineType => match key.code {
        KeyCode::Left => self.cycle_wine_type_filter(-1),
        KeyCode::Right | KeyCode::Char(' ') => self.cycle_wine_type_filter(1),
        KeyCode::Esc | KeyCode::Enter => self.admin_focus = AdminFocus::Table,
        _ => {}
      },
      focus => {
        let is_date = focus != AdminFocus::Taster;
        let input = match focus {
          AdminFocus::Taster => &mut self.filter_taster,
          AdminFocus::StartDate => &mut self.filter_start,
          _ => &mut self.filter_end,
        };
        match key.code {
          KeyCode::Esc | KeyCode::Enter => self.admin_focus = AdminFocus::Table,
          KeyCode::Backspace => {
            input.pop();
            self.list_cursor = 0;
          }
          KeyCode::Char(c) if !ctrl => {
            let accepted = !is_date || ((c.is_ascii_digit() || c == '-') && input.len() < 10);
            if accepted {
              input.push(c);
              self.list_cursor = 0;
            }
          }
          _ => {}
        }
      }
    }
    true
  }

  fn handle_table_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.filtered_records().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter => self.show_detail = !self.show_detail && self.cursor_record().is_some(),
      KeyCode::Esc => self.show_detail = false,

      KeyCode::Char('/') => self.admin_focus = AdminFocus::Taster,

      _ => {}
    }
    true
  }

  fn cycle_wine_type_filter(&mut self, step: i64) {
    let options: Vec<Option<WineType>> =
      iter::once(None).chain(WineType::iter().map(Some)).collect();
    self.filter_wine_type = cycle_in(&options, self.filter_wine_type, step);
    self.list_cursor = 0;
  }

  // ── Export ────────────────────────────────────────────────────────────────

  fn export(&mut self) {
    match self.write_export() {
      Ok(rows) => {
        info!(rows, path = %self.export.path.display(), "csv exported");
        self.status_msg = format!(
          "Exportados {rows} registros a {}",
          self.export.path.display()
        );
      }
      Err(e) => {
        let reason = format!("{e:#}");
        error!(error = %reason, "csv export failed");
        self.status_msg = format!("Error al exportar: {reason}");
      }
    }
  }

  fn write_export(&self) -> anyhow::Result<usize> {
    let path = &self.export.path;
    let file = File::create(path)
      .with_context(|| format!("creating {}", path.display()))?;
    let rows = export::export_csv(
      BufWriter::new(file),
      self.filtered_records(),
      &self.export.options,
    )
    .with_context(|| format!("writing {}", path.display()))?;
    Ok(rows)
  }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// `YYYY-MM-DD`, or `None` while the input is blank or incomplete.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

fn index_of(field: FormField) -> usize {
  FormField::ALL
    .iter()
    .position(|f| *f == field)
    .unwrap_or_default()
}

/// The option `step` places after `current`, wrapping around.
fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T, step: i64) -> T {
  let all: Vec<T> = T::iter().collect();
  cycle_in(&all, current, step)
}

fn cycle_in<T: PartialEq + Copy>(options: &[T], current: T, step: i64) -> T {
  let pos = options.iter().position(|v| *v == current).unwrap_or(0) as i64;
  let len = options.len() as i64;
  options[(pos + step).rem_euclid(len) as usize]
}
