// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use bankdash::api::DEFAULT_BASE_URL;
use bankdash::config::{reset_base_url, resolve_base_url, set_base_url, UrlSource};
use bankdash::db;
use bankdash::session::Session;
use bankdash::storage::{
    MemoryStorage, SqliteStorage, Storage, API_URL_KEY, AUTH_TOKEN_KEY, USER_KEY,
};
use rusqlite::Connection;
use tempfile::tempdir;

fn setup() -> SqliteStorage {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    SqliteStorage::new(conn)
}

#[test]
fn sqlite_storage_get_set_remove() {
    let mut s = setup();
    assert_eq!(s.get(AUTH_TOKEN_KEY).unwrap(), None);
    s.set(AUTH_TOKEN_KEY, "a").unwrap();
    s.set(AUTH_TOKEN_KEY, "b").unwrap();
    assert_eq!(s.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("b"));

    let rows: i64 = s
        .connection()
        .query_row("SELECT COUNT(*) FROM settings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    s.remove(AUTH_TOKEN_KEY).unwrap();
    assert_eq!(s.get(AUTH_TOKEN_KEY).unwrap(), None);
    // removing twice is fine
    s.remove(AUTH_TOKEN_KEY).unwrap();
}

#[test]
fn sqlite_storage_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.sqlite");
    {
        let mut s = SqliteStorage::new(db::open_at(&path).unwrap());
        s.set(AUTH_TOKEN_KEY, "persisted").unwrap();
    }
    let s = SqliteStorage::new(db::open_at(&path).unwrap());
    assert_eq!(s.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("persisted"));
}

#[test]
fn session_reads_token_once_and_writes_through() {
    let mut session = Session::open(Box::new(setup())).unwrap();
    assert!(!session.is_authenticated());

    session
        .store("tok", r#"{"id":1,"first_name":"Marie","last_name":"Curie"}"#)
        .unwrap();
    assert_eq!(session.token(), Some("tok"));
    assert_eq!(
        session.storage().get(AUTH_TOKEN_KEY).unwrap().as_deref(),
        Some("tok")
    );
    assert_eq!(
        session.cached_user().unwrap().map(|u| u.display_name()),
        Some("Marie Curie".to_string())
    );

    session.clear().unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(session.storage().get(USER_KEY).unwrap(), None);
}

#[test]
fn session_picks_up_stored_token() {
    let storage = MemoryStorage::new().with_entry(AUTH_TOKEN_KEY, "from-disk");
    let session = Session::open(Box::new(storage)).unwrap();
    assert_eq!(session.token(), Some("from-disk"));
}

#[test]
fn garbled_cached_user_reads_as_absent() {
    let storage = MemoryStorage::new().with_entry(USER_KEY, "not json");
    let session = Session::open(Box::new(storage)).unwrap();
    assert_eq!(session.cached_user().unwrap(), None);
}

#[test]
fn base_url_precedence() {
    let mut s = MemoryStorage::new();
    let (url, src) = resolve_base_url(None, &s).unwrap();
    assert_eq!((url.as_str(), src), (DEFAULT_BASE_URL, UrlSource::Default));

    let stored = set_base_url(&mut s, " https://bank.example.com/api/ ").unwrap();
    assert_eq!(stored, "https://bank.example.com/api");
    assert_eq!(s.get(API_URL_KEY).unwrap().as_deref(), Some("https://bank.example.com/api"));
    let (url, src) = resolve_base_url(None, &s).unwrap();
    assert_eq!((url.as_str(), src), ("https://bank.example.com/api", UrlSource::Stored));

    let (url, src) = resolve_base_url(Some("http://127.0.0.1:5000/api"), &s).unwrap();
    assert_eq!((url.as_str(), src), ("http://127.0.0.1:5000/api", UrlSource::Flag));

    // blank flag is ignored
    let (_, src) = resolve_base_url(Some("  "), &s).unwrap();
    assert_eq!(src, UrlSource::Stored);

    reset_base_url(&mut s).unwrap();
    assert_eq!(resolve_base_url(None, &s).unwrap().1, UrlSource::Default);
}

#[test]
fn bad_base_urls_are_refused() {
    let mut s = MemoryStorage::new();
    assert!(set_base_url(&mut s, "not a url").is_err());
    assert!(set_base_url(&mut s, "ftp://bank.example.com").is_err());
    assert_eq!(s.get(API_URL_KEY).unwrap(), None);
}
