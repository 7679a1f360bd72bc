//! SQLite schema definitions for the key-value store database.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

// =============================================================================
// Version 1 - Key-value state
// =============================================================================

const KV_STATE_TABLE_V1: Table = Table {
    name: "kv_state",
    columns: &[
        sqlite_column!("key", &SqlType::Text, is_primary_key = true),
        sqlite_column!("value", &SqlType::Text, non_null = true),
    ],
};

// =============================================================================
// Version 2 - Track last write time per key
// =============================================================================

const KV_STATE_TABLE_V2: Table = Table {
    name: "kv_state",
    columns: &[
        sqlite_column!("key", &SqlType::Text, is_primary_key = true),
        sqlite_column!("value", &SqlType::Text, non_null = true),
        sqlite_column!(
            "updated_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
    ],
};

fn migrate_v1_to_v2(conn: &rusqlite::Connection) -> anyhow::Result<()> {
    conn.execute(
        "ALTER TABLE kv_state ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0",
        [],
    )?;
    Ok(())
}

pub const KV_VERSIONED_SCHEMAS: &[VersionedSchema] = &[
    VersionedSchema {
        version: 1,
        tables: &[KV_STATE_TABLE_V1],
        migration: None,
    },
    VersionedSchema {
        version: 2,
        tables: &[KV_STATE_TABLE_V2],
        migration: Some(migrate_v1_to_v2),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_each_schema_creates_and_validates() {
        for schema in KV_VERSIONED_SCHEMAS {
            let conn = Connection::open_in_memory().unwrap();
            schema.create(&conn).unwrap();
            schema.validate(&conn).unwrap();
        }
    }

    #[test]
    fn test_v1_to_v2_migration_matches_v2_layout() {
        let conn = Connection::open_in_memory().unwrap();
        KV_VERSIONED_SCHEMAS[0].create(&conn).unwrap();
        migrate_v1_to_v2(&conn).unwrap();
        KV_VERSIONED_SCHEMAS[1].validate(&conn).unwrap();
    }
}
