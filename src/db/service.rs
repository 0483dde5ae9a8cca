use crate::db::models::{Conversation, ConversationSummary, User};
use crate::validation::UserProfile;
use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::{params, types::Type, Connection, Error as DbError, Result as DbResult, Row};

pub struct DbService;

// Timestamps are stored as fixed-width RFC 3339 text so they sort lexically.
fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(row: &Row, idx: usize) -> DbResult<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl DbService {
    fn row_to_conversation(row: &Row) -> DbResult<Conversation> {
        let raw: String = row.get(1)?;
        let messages = serde_json::from_str(&raw)
            .map_err(|e| DbError::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

        Ok(Conversation {
            session_id: row.get(0)?,
            messages,
            created_at: parse_ts(row, 2)?,
            updated_at: parse_ts(row, 3)?,
        })
    }

    fn row_to_summary(row: &Row) -> DbResult<ConversationSummary> {
        Ok(ConversationSummary {
            session_id: row.get(0)?,
            created_at: parse_ts(row, 1)?,
            updated_at: parse_ts(row, 2)?,
        })
    }

    fn row_to_user(row: &Row) -> DbResult<User> {
        Ok(User {
            key: row.get(0)?,
            sub: row.get(1)?,
            email: row.get(2)?,
            name: row.get(3)?,
            picture: row.get(4)?,
            email_verified: row.get(5)?,
            hd: row.get(6)?,
            locale: row.get(7)?,
            phone: row.get(8)?,
            last_login_at: parse_ts(row, 9)?,
            created_at: parse_ts(row, 10)?,
        })
    }

    // --- Conversation Operations ---

    /// Inserts or replaces the messages of a conversation. `created_at` is only
    /// written on the insert branch; the conflict branch leaves it alone.
    pub fn upsert_conversation(
        conn: &Connection,
        session_id: &str,
        messages: &serde_json::Value,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        let now = format_ts(now);
        conn.execute(
            "INSERT INTO conversations (session_id, messages, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (session_id) DO UPDATE SET
                messages = EXCLUDED.messages,
                updated_at = EXCLUDED.updated_at",
            params![session_id, messages.to_string(), now, now],
        )?;
        Ok(())
    }

    pub fn get_conversation(conn: &Connection, session_id: &str) -> DbResult<Option<Conversation>> {
        let mut stmt = conn.prepare(
            "SELECT session_id, messages, created_at, updated_at FROM conversations WHERE session_id = ?",
        )?;
        let mut rows = stmt.query_map(params![session_id], Self::row_to_conversation)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    pub fn list_conversations(
        conn: &Connection,
        limit: usize,
        offset: usize,
    ) -> DbResult<Vec<ConversationSummary>> {
        let mut stmt = conn.prepare(
            "SELECT session_id, created_at, updated_at FROM conversations
             ORDER BY updated_at DESC LIMIT ? OFFSET ?",
        )?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], Self::row_to_summary)?;

        rows.collect()
    }

    /// Returns the number of rows removed, which is 0 or 1.
    pub fn delete_conversation(conn: &Connection, session_id: &str) -> DbResult<usize> {
        conn.execute("DELETE FROM conversations WHERE session_id = ?", params![session_id])
    }

    // --- User Operations ---

    /// Optional attributes missing from `profile` keep whatever was stored before.
    pub fn upsert_user(conn: &Connection, profile: &UserProfile, now: DateTime<Utc>) -> DbResult<()> {
        let now = format_ts(now);
        conn.execute(
            "INSERT INTO users (user_key, sub, email, name, picture, email_verified, hd, locale, phone, last_login_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_key) DO UPDATE SET
                sub = COALESCE(EXCLUDED.sub, sub),
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                picture = COALESCE(EXCLUDED.picture, picture),
                email_verified = COALESCE(EXCLUDED.email_verified, email_verified),
                hd = COALESCE(EXCLUDED.hd, hd),
                locale = COALESCE(EXCLUDED.locale, locale),
                phone = COALESCE(EXCLUDED.phone, phone),
                last_login_at = EXCLUDED.last_login_at",
            params![
                profile.key(),
                profile.sub.as_deref(),
                profile.email,
                profile.name,
                profile.picture.as_deref(),
                profile.email_verified,
                profile.hd.as_deref(),
                profile.locale.as_deref(),
                profile.phone.as_deref(),
                now,
                now,
            ],
        )?;
        Ok(())
    }

    pub fn get_user(conn: &Connection, key: &str) -> DbResult<Option<User>> {
        let mut stmt = conn.prepare(
            "SELECT user_key, sub, email, name, picture, email_verified, hd, locale, phone, last_login_at, created_at
             FROM users WHERE user_key = ?",
        )?;
        let mut rows = stmt.query_map(params![key], Self::row_to_user)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }
}
