//! v001: records table plus an external-content FTS5 index on content and title.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS records (
    id            TEXT NOT NULL UNIQUE,
    content       TEXT NOT NULL,
    title         TEXT,
    source        TEXT NOT NULL,
    group_id      TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    content_hash  TEXT NOT NULL,
    metadata      TEXT NOT NULL DEFAULT '{}'
);

CREATE INDEX IF NOT EXISTS idx_records_group_created ON records(group_id, created_at);
CREATE INDEX IF NOT EXISTS idx_records_content_hash ON records(content_hash);

CREATE VIRTUAL TABLE IF NOT EXISTS records_fts USING fts5(
    content,
    title,
    content='records',
    content_rowid='rowid',
    tokenize='unicode61'
);

-- Content and title are immutable, so only inserts need mirroring.
CREATE TRIGGER IF NOT EXISTS records_fts_insert AFTER INSERT ON records BEGIN
    INSERT INTO records_fts(rowid, content, title)
    VALUES (new.rowid, new.content, coalesce(new.title, ''));
END;
";
