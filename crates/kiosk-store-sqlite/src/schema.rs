//! SQL schema for the kiosk SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS products (
    product_id  INTEGER PRIMARY KEY,   -- upstream catalog id
    title       TEXT NOT NULL,
    brand       TEXT,
    category    TEXT,
    price       REAL,
    description TEXT
);

-- At most one summary per product. The primary key doubles as the sole
-- arbiter between concurrent generation attempts: the second insert fails
-- and the writer re-reads the winner's row.
CREATE TABLE IF NOT EXISTS product_summaries (
    product_id   INTEGER PRIMARY KEY REFERENCES products(product_id),
    summary_json TEXT NOT NULL,        -- serialised Summary, either shape
    provider     TEXT NOT NULL,
    model        TEXT NOT NULL,
    created_at   TEXT NOT NULL         -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS products_category_idx ON products(category);

PRAGMA user_version = 1;
";
