// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value persistence. The shell owns one store and hands it to every
//! command; records, preferences and the reminder queue are JSON blobs in it.

use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::models::{Preferences, Subscription};

pub const SUBSCRIPTIONS_KEY: &str = "subscription-storage";
pub const PREFERENCES_KEY: &str = "user-preferences-storage";
pub const REMINDERS_KEY: &str = "reminder-storage";

/// Called with the new value after every successful write of its key.
pub type Listener = Box<dyn Fn(&str)>;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn subscribe(&mut self, key: &str, listener: Listener);
}

#[derive(Default)]
struct Listeners {
    by_key: HashMap<String, Vec<Listener>>,
}

impl Listeners {
    fn add(&mut self, key: &str, listener: Listener) {
        self.by_key.entry(key.to_string()).or_default().push(listener);
    }

    fn notify(&self, key: &str, value: &str) {
        if let Some(ls) = self.by_key.get(key) {
            for l in ls {
                l(value);
            }
        }
    }
}

pub struct SqliteStore {
    conn: Connection,
    listeners: Listeners,
}

impl SqliteStore {
    /// Wraps a connection whose schema is already initialized.
    pub fn new(conn: Connection) -> Self {
        SqliteStore {
            conn,
            listeners: Listeners::default(),
        }
    }

    /// In-memory database with the schema applied.
    pub fn in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        crate::db::init_schema(&mut conn)?;
        Ok(SqliteStore::new(conn))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()
            .with_context(|| format!("Read '{}'", key))?;
        Ok(v)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store(key, value, updated_at) VALUES(?1, ?2, datetime('now'))
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=excluded.updated_at",
                params![key, value],
            )
            .with_context(|| format!("Write '{}'", key))?;
        log::debug!("stored {} ({} bytes)", key, value.len());
        self.listeners.notify(key, value);
        Ok(())
    }

    fn subscribe(&mut self, key: &str, listener: Listener) {
        self.listeners.add(key, listener);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    listeners: Listeners,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.listeners.notify(key, value);
        Ok(())
    }

    fn subscribe(&mut self, key: &str, listener: Listener) {
        self.listeners.add(key, listener);
    }
}

pub fn load_subscriptions(store: &dyn KeyValueStore) -> Result<Vec<Subscription>> {
    match store.get(SUBSCRIPTIONS_KEY)? {
        Some(raw) => serde_json::from_str(&raw).context("Stored subscriptions are corrupt"),
        None => Ok(Vec::new()),
    }
}

pub fn save_subscriptions(store: &mut dyn KeyValueStore, records: &[Subscription]) -> Result<()> {
    let raw = serde_json::to_string(records)?;
    store.set(SUBSCRIPTIONS_KEY, &raw)
}

pub fn load_preferences(store: &dyn KeyValueStore) -> Result<Preferences> {
    match store.get(PREFERENCES_KEY)? {
        Some(raw) => serde_json::from_str(&raw).context("Stored preferences are corrupt"),
        None => Ok(Preferences::default()),
    }
}

pub fn save_preferences(store: &mut dyn KeyValueStore, prefs: &Preferences) -> Result<()> {
    let raw = serde_json::to_string(prefs)?;
    store.set(PREFERENCES_KEY, &raw)
}
