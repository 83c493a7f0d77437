// src/repository.rs

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Result};

/// A stored row: document id plus its JSON body.
pub struct DocumentRow {
    pub id: String,
    pub data: String,
}

/// Inserts a new document body.
pub fn insert_document(
    conn: &Connection,
    collection: &str,
    id: &str,
    data: &str,
    now_ts: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO documents (collection, id, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        params![collection, id, data, now_ts, now_ts],
    )?;
    debug!("[DB] Inserted {}/{}", collection, id);
    Ok(())
}

/// Fetches a document body, if the document exists.
pub fn find_document(conn: &Connection, collection: &str, id: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT data FROM documents WHERE collection = ? AND id = ?",
        params![collection, id],
        |row| row.get(0),
    )
    .optional()
}

/// All documents of a collection, ordered by id.
pub fn list_documents(conn: &Connection, collection: &str) -> Result<Vec<DocumentRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, data
         FROM documents
         WHERE collection = ?
         ORDER BY id ASC",
    )?;

    let rows = stmt
        .query_map([collection], |row| {
            Ok(DocumentRow {
                id: row.get(0)?,
                data: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<DocumentRow>, _>>()?;

    Ok(rows)
}

/// Replaces a document body. Returns the number of rows touched (0 when missing).
pub fn replace_document(
    conn: &Connection,
    collection: &str,
    id: &str,
    data: &str,
    now_ts: i64,
) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE documents SET data = ?, updated_at = ? WHERE collection = ? AND id = ?",
        params![data, now_ts, collection, id],
    )?;
    debug!("[DB] Replaced {}/{} ({} row)", collection, id, changed);
    Ok(changed)
}

/// Last modification time of a document, in unix seconds.
pub fn get_updated_at(conn: &Connection, collection: &str, id: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT updated_at FROM documents WHERE collection = ? AND id = ?",
        params![collection, id],
        |row| row.get(0),
    )
    .optional()
}
