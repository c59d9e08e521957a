use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{
    helpers::{parse_datetime, parse_json_column, to_json_column},
    Database,
};
use crate::models::ContextMemory;

/// Raw column values, decoded outside the rusqlite row callback.
struct ContextMemoryRow {
    session_id: String,
    last_modified: String,
    common_characters: String,
    common_locations: String,
    last_classifications: String,
    character_dialogue_map: String,
}

fn read_row(row: &Row) -> Result<ContextMemoryRow, rusqlite::Error> {
    Ok(ContextMemoryRow {
        session_id: row.get("session_id")?,
        last_modified: row.get("last_modified")?,
        common_characters: row.get("common_characters")?,
        common_locations: row.get("common_locations")?,
        last_classifications: row.get("last_classifications")?,
        character_dialogue_map: row.get("character_dialogue_map")?,
    })
}

impl ContextMemoryRow {
    fn into_memory(self) -> Result<ContextMemory> {
        Ok(ContextMemory {
            last_modified: parse_datetime(&self.last_modified, "last_modified")?,
            common_characters: parse_json_column(&self.common_characters, "common_characters")?,
            common_locations: parse_json_column(&self.common_locations, "common_locations")?,
            last_classifications: parse_json_column(
                &self.last_classifications,
                "last_classifications",
            )?,
            character_dialogue_map: parse_json_column(
                &self.character_dialogue_map,
                "character_dialogue_map",
            )?,
            session_id: self.session_id,
        })
    }
}

/// Summary row for listing stored sessions.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemorySessionInfo {
    pub session_id: String,
    pub last_modified: DateTime<Utc>,
    pub character_count: usize,
}

impl Database {
    /// Load the stored memory for a session, if any.
    pub async fn load_context_memory(&self, session_id: &str) -> Result<Option<ContextMemory>> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT session_id, last_modified, common_characters, common_locations,
                        last_classifications, character_dialogue_map
                 FROM context_memory
                 WHERE session_id = ?1",
            )?;

            let row = stmt.query_row(params![session_id], read_row).optional()?;

            row.map(ContextMemoryRow::into_memory)
                .transpose()
                .with_context(|| format!("corrupt context memory for session {session_id}"))
        })
        .await
    }

    /// Insert or replace a session's memory. Concurrent writers for the same
    /// session are not coordinated; the last write wins.
    pub async fn save_context_memory(&self, memory: &ContextMemory) -> Result<()> {
        let record = memory.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO context_memory (session_id, last_modified, common_characters,
                                             common_locations, last_classifications,
                                             character_dialogue_map)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(session_id) DO UPDATE SET
                     last_modified = excluded.last_modified,
                     common_characters = excluded.common_characters,
                     common_locations = excluded.common_locations,
                     last_classifications = excluded.last_classifications,
                     character_dialogue_map = excluded.character_dialogue_map",
                params![
                    record.session_id,
                    record.last_modified.to_rfc3339(),
                    to_json_column(&record.common_characters, "common_characters")?,
                    to_json_column(&record.common_locations, "common_locations")?,
                    to_json_column(&record.last_classifications, "last_classifications")?,
                    to_json_column(&record.character_dialogue_map, "character_dialogue_map")?,
                ],
            )
            .with_context(|| "failed to save context memory")?;
            Ok(())
        })
        .await
    }

    /// Returns whether a row was removed.
    pub async fn delete_context_memory(&self, session_id: &str) -> Result<bool> {
        let session_id = session_id.to_string();
        self.execute(move |conn| {
            let removed = conn
                .execute(
                    "DELETE FROM context_memory WHERE session_id = ?1",
                    params![session_id],
                )
                .with_context(|| "failed to delete context memory")?;
            Ok(removed > 0)
        })
        .await
    }

    /// Stored sessions, most recently modified first.
    pub async fn list_memory_sessions(&self) -> Result<Vec<MemorySessionInfo>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT session_id, last_modified, common_characters
                 FROM context_memory
                 ORDER BY last_modified DESC",
            )?;

            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(session_id, last_modified, characters)| -> Result<MemorySessionInfo> {
                    let characters: Vec<String> =
                        parse_json_column(&characters, "common_characters")?;
                    Ok(MemorySessionInfo {
                        last_modified: parse_datetime(&last_modified, "last_modified")?,
                        character_count: characters.len(),
                        session_id,
                    })
                })
                .collect()
        })
        .await
    }
}
