//! [`SessionState`] — the single owner of the identity and the record list.
//!
//! Every mutation in a session goes through here. Other components get
//! read-only views ([`SessionState::all_records`]) or contribute exactly one
//! new record at a time ([`SessionState::add_record`]).

use std::io::Read;

use tracing::{debug, info};

use crate::{
  Result,
  model::{Identity, Role, TastingRecord},
};

/// In-memory session: at most one logged-in identity and an append-only,
/// newest-first list of records.
#[derive(Debug, Default)]
pub struct SessionState {
  identity: Option<Identity>,
  records:  Vec<TastingRecord>,
}

impl SessionState {
  /// An empty session with nobody logged in.
  pub fn new() -> Self { Self::default() }

  /// A session that starts with `records` already in the list, kept in the
  /// given order.
  pub fn with_records(records: Vec<TastingRecord>) -> Self {
    debug!(count = records.len(), "session seeded");
    Self {
      identity: None,
      records,
    }
  }

  /// A session seeded from a JSON array of records (camelCase keys, as the
  /// web front end writes them).
  pub fn from_json_reader(reader: impl Read) -> Result<Self> {
    let records: Vec<TastingRecord> = serde_json::from_reader(reader)?;
    Ok(Self::with_records(records))
  }

  // ── Identity ──────────────────────────────────────────────────────────────

  /// Log in as `name` with `role`, replacing any current identity.
  ///
  /// A blank name is rejected with [`Error::EmptyName`](crate::Error) and the
  /// current identity is left untouched.
  pub fn login(&mut self, name: &str, role: Role) -> Result<&Identity> {
    let identity = Identity::new(name, role)?;
    info!(name = %identity.name, %role, "logged in");
    Ok(self.identity.insert(identity))
  }

  /// Clear the current identity. Logging out twice is harmless.
  pub fn logout(&mut self) {
    if let Some(identity) = self.identity.take() {
      info!(name = %identity.name, "logged out");
    }
  }

  pub fn current_identity(&self) -> Option<&Identity> { self.identity.as_ref() }

  // ── Records ───────────────────────────────────────────────────────────────

  /// Put `record` at the front of the list. No validation happens here; the
  /// form checks required fields before calling this.
  pub fn add_record(&mut self, record: TastingRecord) {
    debug!(id = %record.id, taster = %record.taster_name, "record added");
    self.records.insert(0, record);
  }

  /// Every record, newest submission first.
  pub fn all_records(&self) -> &[TastingRecord] { &self.records }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  #[test]
  fn blank_login_leaves_identity_unchanged() {
    let mut s = SessionState::new();
    assert!(matches!(s.login("   ", Role::Taster), Err(Error::EmptyName)));
    assert!(s.current_identity().is_none());

    s.login("Ana", Role::Admin).unwrap();
    assert!(s.login("", Role::Taster).is_err());
    let current = s.current_identity().unwrap();
    assert_eq!(current.name, "Ana");
    assert_eq!(current.role, Role::Admin);
  }

  #[test]
  fn login_logout_cycles() {
    let mut s = SessionState::new();
    for _ in 0..3 {
      let id = s.login(" Luis ", Role::Taster).unwrap();
      assert_eq!(id.name, "Luis");
      s.logout();
      assert!(s.current_identity().is_none());
    }
    s.logout();
    assert!(s.current_identity().is_none());
  }

  #[test]
  fn seeds_from_json_in_given_order() {
    let json = r#"[
      {"id": "b", "tasterName": "Bea", "date": "2024-05-02T09:00:00.000Z",
       "wineName": "Albariño", "winery": "Rías", "year": 2022,
       "wineType": "Blanco", "region": "Galicia", "appearanceColor": "pajizo",
       "appearanceClarity": "Limpio", "aromaIntensity": 4,
       "aromaNotes": ["Floral"], "flavorAcidity": 5, "flavorTannins": 1,
       "flavorBody": "Ligero", "finish": 3, "overallRating": 4, "notes": ""},
      {"id": "a", "tasterName": "Ana", "date": "2024-05-01T09:00:00.000Z",
       "wineName": "Malbec", "winery": "Sur", "year": 2020,
       "wineType": "Tinto", "region": "Mendoza", "appearanceColor": "púrpura",
       "appearanceClarity": "Limpio", "aromaIntensity": 3, "flavorAcidity": 3,
       "flavorTannins": 4, "flavorBody": "Robusto", "finish": 4,
       "overallRating": 5}
    ]"#;
    let s = SessionState::from_json_reader(json.as_bytes()).unwrap();
    let ids: Vec<_> = s.all_records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
    assert!(s.current_identity().is_none());
  }

  #[test]
  fn malformed_seed_is_a_serialization_error() {
    let err = SessionState::from_json_reader(&b"{not json"[..]).unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
  }
}
