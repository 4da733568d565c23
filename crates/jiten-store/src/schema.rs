//! DDL shared by both backends; the remote store speaks the same SQL dialect.

pub const SCHEMA_VERSION: &str = "1";

pub const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS schema_meta (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS dictionaries (
        id             INTEGER PRIMARY KEY,
        title          TEXT    NOT NULL,
        revision       TEXT    NOT NULL,
        format         INTEGER,
        author         TEXT,
        url            TEXT,
        description    TEXT,
        attribution    TEXT,
        sequenced      INTEGER NOT NULL DEFAULT 0,
        frequency_mode TEXT,
        is_bundled     INTEGER NOT NULL DEFAULT 0,
        sort_order     INTEGER NOT NULL DEFAULT 0,
        installed_at   TEXT    NOT NULL DEFAULT (datetime('now')),
        UNIQUE (title, revision)
    )",
    "CREATE TABLE IF NOT EXISTS glossaries (
        id      INTEGER PRIMARY KEY,
        hash    TEXT NOT NULL UNIQUE,
        content TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS def_tag_sets (
        id   INTEGER PRIMARY KEY,
        tags TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS term_tag_sets (
        id   INTEGER PRIMARY KEY,
        tags TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS rule_sets (
        id    INTEGER PRIMARY KEY,
        rules TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS terms (
        id           INTEGER PRIMARY KEY,
        dict_id      INTEGER NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
        term         TEXT    NOT NULL,
        reading      TEXT    NOT NULL,
        def_tags_id  INTEGER REFERENCES def_tag_sets(id),
        rules_id     INTEGER REFERENCES rule_sets(id),
        score        INTEGER NOT NULL DEFAULT 0,
        glossary_id  INTEGER NOT NULL REFERENCES glossaries(id),
        sequence     INTEGER,
        term_tags_id INTEGER REFERENCES term_tag_sets(id)
    )",
    "CREATE TABLE IF NOT EXISTS term_meta (
        id      INTEGER PRIMARY KEY,
        dict_id INTEGER NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
        term    TEXT    NOT NULL,
        mode    TEXT    NOT NULL,
        reading TEXT,
        data    TEXT    NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tags (
        id         INTEGER PRIMARY KEY,
        dict_id    INTEGER NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
        name       TEXT    NOT NULL,
        category   TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        notes      TEXT,
        score      INTEGER NOT NULL DEFAULT 0,
        UNIQUE (dict_id, name)
    )",
    "CREATE TABLE IF NOT EXISTS kanji (
        id       INTEGER PRIMARY KEY,
        dict_id  INTEGER NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
        kanji    TEXT    NOT NULL,
        onyomi   TEXT,
        kunyomi  TEXT,
        tags     TEXT,
        meanings TEXT NOT NULL DEFAULT '[]',
        stats    TEXT NOT NULL DEFAULT '{}'
    )",
    "CREATE TABLE IF NOT EXISTS kanji_meta (
        id      INTEGER PRIMARY KEY,
        dict_id INTEGER NOT NULL REFERENCES dictionaries(id) ON DELETE CASCADE,
        kanji   TEXT    NOT NULL,
        mode    TEXT    NOT NULL,
        data    TEXT    NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_terms_term ON terms (term)",
    "CREATE INDEX IF NOT EXISTS idx_terms_reading ON terms (reading)",
    "CREATE INDEX IF NOT EXISTS idx_terms_lookup ON terms (term, reading, score DESC)",
    "CREATE INDEX IF NOT EXISTS idx_terms_sequence ON terms (dict_id, sequence)",
    "CREATE INDEX IF NOT EXISTS idx_term_meta_term ON term_meta (term)",
    "CREATE INDEX IF NOT EXISTS idx_kanji_character ON kanji (kanji)",
    "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
    "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('created_at', datetime('now'))",
];

pub const INSERT_DICTIONARY: &str = "INSERT INTO dictionaries \
    (title, revision, format, author, url, description, attribution, sequenced, frequency_mode, is_bundled) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

pub const INSERT_TERM: &str = "INSERT INTO terms \
    (dict_id, term, reading, def_tags_id, rules_id, score, glossary_id, sequence, term_tags_id) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

pub const INSERT_TERM_META: &str =
    "INSERT INTO term_meta (dict_id, term, mode, reading, data) VALUES (?1, ?2, ?3, ?4, ?5)";

pub const INSERT_TAG: &str = "INSERT OR IGNORE INTO tags \
    (dict_id, name, category, sort_order, notes, score) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

pub const INSERT_KANJI: &str = "INSERT INTO kanji \
    (dict_id, kanji, onyomi, kunyomi, tags, meanings, stats) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub const INSERT_KANJI_META: &str =
    "INSERT INTO kanji_meta (dict_id, kanji, mode, data) VALUES (?1, ?2, ?3, ?4)";
