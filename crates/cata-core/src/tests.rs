//! End-to-end session scenarios: login, submit through the form, browse and
//! export as an admin.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::{
  browser::{FilterCriteria, filter},
  export::{ExportOptions, to_csv_bytes},
  form::{ScoreField, TastingForm, TextField},
  model::{Aroma, Role, Score, WineType},
  session::SessionState,
};

fn at(d: u32, h: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap()
}

fn fill(form: &mut TastingForm, wine: &str) {
  form.set_text(TextField::WineName, wine);
  form.set_text(TextField::Winery, "Bodega");
  form.set_text(TextField::Region, "Mendoza");
  form.set_text(TextField::AppearanceColor, "púrpura");
}

#[test]
fn taster_submission_scenario() {
  let mut session = SessionState::new();
  session.login("Ana", Role::Taster).unwrap();

  let mut form = TastingForm::new();
  fill(&mut form, "Malbec Reserva");
  form.set_year_text("2020").unwrap();
  form.toggle_aroma_note(Aroma::Fruity);
  form.toggle_aroma_note(Aroma::Woody);
  form.toggle_aroma_note(Aroma::Spicy);
  form.toggle_aroma_note(Aroma::Woody);

  let record = form.submit(&mut session, at(1, 12)).unwrap();

  assert_eq!(record.taster_name, "Ana");
  assert_eq!(record.wine_name, "Malbec Reserva");
  assert_eq!(record.year, 2020);
  assert_eq!(record.overall_rating, Score::default());
  assert_eq!(record.aroma_intensity.get(), 3);
  assert_eq!(
    record.aroma_notes.iter().collect::<Vec<_>>(),
    [Aroma::Fruity, Aroma::Spicy]
  );
  assert_eq!(session.all_records().len(), 1);
  assert_eq!(session.all_records()[0], record);
}

#[test]
fn new_records_go_to_the_front() {
  let mut session = SessionState::new();
  session.login("Ana", Role::Taster).unwrap();
  let mut form = TastingForm::new();

  for (i, wine) in ["primero", "segundo", "tercero"].into_iter().enumerate() {
    fill(&mut form, wine);
    form.submit(&mut session, at(1, 10 + i as u32)).unwrap();
  }

  let wines: Vec<_> = session
    .all_records()
    .iter()
    .map(|r| r.wine_name.as_str())
    .collect();
  assert_eq!(wines, ["tercero", "segundo", "primero"]);
}

#[test]
fn admin_filters_and_exports_what_tasters_submitted() {
  let mut session = SessionState::new();
  let mut form = TastingForm::new();

  session.login("Ana", Role::Taster).unwrap();
  fill(&mut form, "Malbec");
  form.submit(&mut session, at(3, 9)).unwrap();
  fill(&mut form, "Torrontés");
  form.set_wine_type(WineType::White);
  form.set_score(ScoreField::OverallRating, Score::clamped(5));
  form.submit(&mut session, at(5, 9)).unwrap();
  session.logout();

  session.login("Luis", Role::Taster).unwrap();
  fill(&mut form, "Cabernet");
  form.submit(&mut session, at(4, 9)).unwrap();
  session.logout();

  session.login("Marta", Role::Admin).unwrap();
  let all = session.all_records();

  let everything = filter(all, &FilterCriteria::default());
  assert_eq!(everything.len(), 3);
  assert!(everything.windows(2).all(|w| w[0].date >= w[1].date));

  let criteria = FilterCriteria {
    taster: Some("ana".into()),
    end_date: NaiveDate::from_ymd_opt(2024, 6, 4),
    ..Default::default()
  };
  let view = filter(all, &criteria);
  assert_eq!(view.len(), 1);
  assert_eq!(view[0].wine_name, "Malbec");

  let csv = to_csv_bytes(view, &ExportOptions::default()).unwrap();
  let csv = String::from_utf8(csv).unwrap();
  assert_eq!(csv.lines().count(), 2);
  assert!(csv.lines().nth(1).unwrap().contains(",Ana,"));

  let nothing = FilterCriteria {
    wine_type: Some(WineType::Dessert),
    ..Default::default()
  };
  assert!(filter(all, &nothing).is_empty());
}

#[test]
fn filter_result_is_subset_satisfying_criteria() {
  let mut session = SessionState::new();
  let mut form = TastingForm::new();
  let tasters = ["Ana", "ana lía", "Luis", "Bea"];
  let types = [WineType::Red, WineType::Rose, WineType::Red, WineType::Sparkling];

  for (i, (taster, wine_type)) in tasters.iter().zip(types).enumerate() {
    session.login(taster, Role::Taster).unwrap();
    fill(&mut form, "vino");
    form.set_wine_type(wine_type);
    form.submit(&mut session, at(1 + i as u32 * 3, 8)).unwrap();
  }

  let all = session.all_records();
  let criteria = FilterCriteria {
    taster:     Some("AnA".into()),
    start_date: NaiveDate::from_ymd_opt(2024, 6, 2),
    end_date:   None,
    wine_type:  Some(WineType::Rose),
  };
  let view = filter(all, &criteria);
  assert_eq!(view.len(), 1);
  for r in &view {
    assert!(all.contains(r));
    assert!(criteria.matches(r));
  }
}
