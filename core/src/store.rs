//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine calls store methods: nothing else executes SQL.

use crate::{
    error::SimResult,
    event::EventLogEntry,
    snapshot::Snapshot,
    types::Tick,
};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Saves ──────────────────────────────────────────────────

    pub fn save_snapshot(&self, slot: &str, snapshot: &Snapshot) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO save_slot (slot, session_id, version, saved_at, ticks, state_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                slot,
                snapshot.session_id,
                snapshot.version,
                snapshot.saved_at.to_rfc3339(),
                snapshot.statistics.ticks as i64,
                snapshot.to_json()?,
            ],
        )?;
        Ok(())
    }

    /// Most recent save in `slot`. A stored row that no longer parses is
    /// reported as `MalformedData`.
    pub fn latest_snapshot(&self, slot: &str) -> SimResult<Option<Snapshot>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM save_slot WHERE slot = ?1
                 ORDER BY id DESC LIMIT 1",
                params![slot],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| Snapshot::from_json(&j)).transpose()
    }

    pub fn save_count(&self, slot: &str) -> SimResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM save_slot WHERE slot = ?1",
            params![slot],
            |row| row.get(0),
        )?)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (session_id, tick, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.session_id,
                entry.tick as i64,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_session(&self, session_id: &str) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, tick, event_type, payload
             FROM event_log WHERE session_id = ?1
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![session_id], |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                session_id: row.get(1)?,
                tick:       row.get::<_, i64>(2)? as Tick,
                event_type: row.get(3)?,
                payload:    row.get(4)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, session_id: &str, event_type: &str) -> SimResult<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE session_id = ?1 AND event_type = ?2",
            params![session_id, event_type],
            |row| row.get(0),
        )?)
    }
}
