/// A term row ready for insertion; interned references already resolved.
#[derive(Debug, Clone)]
pub struct TermRow {
    pub dict_id: i64,
    pub term: String,
    pub reading: String,
    pub def_tags_id: Option<i64>,
    pub rules_id: Option<i64>,
    pub score: i64,
    pub glossary_id: i64,
    pub sequence: Option<i64>,
    pub term_tags_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TermMetaRow {
    pub dict_id: i64,
    pub term: String,
    pub mode: String,
    pub reading: Option<String>,
    pub data: String,
}

#[derive(Debug, Clone)]
pub struct TagRow {
    pub dict_id: i64,
    pub name: String,
    pub category: String,
    pub sort_order: i64,
    pub notes: String,
    pub score: i64,
}

#[derive(Debug, Clone)]
pub struct KanjiRow {
    pub dict_id: i64,
    pub kanji: String,
    pub onyomi: String,
    pub kunyomi: String,
    pub tags: Option<String>,
    pub meanings: String,
    pub stats: String,
}

#[derive(Debug, Clone)]
pub struct KanjiMetaRow {
    pub dict_id: i64,
    pub kanji: String,
    pub mode: String,
    pub data: String,
}

/// A homogeneous batch of rows bound for one table.
#[derive(Debug, Clone)]
pub enum RowBatch {
    Terms(Vec<TermRow>),
    TermMeta(Vec<TermMetaRow>),
    Tags(Vec<TagRow>),
    Kanji(Vec<KanjiRow>),
    KanjiMeta(Vec<KanjiMetaRow>),
}

impl RowBatch {
    pub fn table(&self) -> &'static str {
        match self {
            RowBatch::Terms(_) => "terms",
            RowBatch::TermMeta(_) => "term_meta",
            RowBatch::Tags(_) => "tags",
            RowBatch::Kanji(_) => "kanji",
            RowBatch::KanjiMeta(_) => "kanji_meta",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RowBatch::Terms(rows) => rows.len(),
            RowBatch::TermMeta(rows) => rows.len(),
            RowBatch::Tags(rows) => rows.len(),
            RowBatch::Kanji(rows) => rows.len(),
            RowBatch::KanjiMeta(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into batches of at most `limit` rows each.
    pub fn chunks(self, limit: usize) -> Vec<RowBatch> {
        fn split<T>(rows: Vec<T>, limit: usize, wrap: fn(Vec<T>) -> RowBatch) -> Vec<RowBatch> {
            if rows.len() <= limit {
                return vec![wrap(rows)];
            }
            let mut out = Vec::with_capacity(rows.len().div_ceil(limit));
            let mut rows = rows.into_iter();
            loop {
                let chunk: Vec<T> = rows.by_ref().take(limit).collect();
                if chunk.is_empty() {
                    break;
                }
                out.push(wrap(chunk));
            }
            out
        }

        match self {
            RowBatch::Terms(rows) => split(rows, limit, RowBatch::Terms),
            RowBatch::TermMeta(rows) => split(rows, limit, RowBatch::TermMeta),
            RowBatch::Tags(rows) => split(rows, limit, RowBatch::Tags),
            RowBatch::Kanji(rows) => split(rows, limit, RowBatch::Kanji),
            RowBatch::KanjiMeta(rows) => split(rows, limit, RowBatch::KanjiMeta),
        }
    }
}
