use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::backend::{DictionaryRecord, StoreBackend, StringTable};
use crate::error::StoreError;
use crate::retry::{RetryPolicy, retry};
use crate::rows::RowBatch;
use crate::schema;

/// Hosted multi-tenant store reached over an HTTP SQL-pipeline API
/// (libSQL-style `/v2/pipeline`).
///
/// Other importer instances may write concurrently; interning relies on the
/// server-side uniqueness constraints, and batch writes are wrapped in
/// BEGIN/COMMIT inside a single pipeline call so each batch is
/// all-or-nothing.
pub struct RemoteBackend {
    api: RemoteApi,
    retry: RetryPolicy,
    batch_size: usize,
}

impl RemoteBackend {
    /// Connect to the hosted store and ensure the schema exists.
    pub async fn connect(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        retry: RetryPolicy,
        batch_size: usize,
    ) -> Result<Self, StoreError> {
        let api = RemoteApi {
            base_url: base_url.into(),
            auth_token,
            client: reqwest::Client::new(),
        };
        let backend = Self {
            api,
            retry,
            batch_size,
        };
        backend.ensure_schema().await?;
        Ok(backend)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let stmts: Vec<Stmt> = schema::SCHEMA_STATEMENTS
            .iter()
            .map(|sql| Stmt::bare(sql))
            .collect();
        self.api.pipeline(stmts).await?;
        tracing::debug!("remote schema ensured");
        Ok(())
    }

    /// One round trip: upsert-or-ignore, then read the surviving row's id.
    async fn intern(&self, insert: Stmt, select: Stmt) -> Result<i64, StoreError> {
        let stmts = vec![insert, select];
        let results = retry(self.retry, "intern round-trip", || {
            self.api.pipeline(stmts.clone())
        })
        .await?;
        results
            .get(1)
            .and_then(|result| result.rows.first())
            .and_then(|row| row.first())
            .and_then(ApiValue::as_i64)
            .ok_or_else(|| StoreError::Remote {
                message: "intern lookup returned no id".to_string(),
                retryable: false,
            })
    }
}

#[async_trait]
impl StoreBackend for RemoteBackend {
    async fn dictionary_exists(
        &mut self,
        title: &str,
        revision: &str,
    ) -> Result<bool, StoreError> {
        let stmt = Stmt::new(
            "SELECT 1 FROM dictionaries WHERE title = ?1 AND revision = ?2 LIMIT 1",
            vec![ApiValue::text(title), ApiValue::text(revision)],
        );
        let results = self.api.pipeline(vec![stmt]).await?;
        Ok(results.first().is_some_and(|r| !r.rows.is_empty()))
    }

    async fn register_dictionary(
        &mut self,
        record: &DictionaryRecord,
    ) -> Result<i64, StoreError> {
        let stmt = Stmt::new(
            schema::INSERT_DICTIONARY,
            vec![
                ApiValue::text(&record.title),
                ApiValue::text(&record.revision),
                ApiValue::opt_integer(record.format),
                ApiValue::opt_text(record.author.as_deref()),
                ApiValue::opt_text(record.url.as_deref()),
                ApiValue::opt_text(record.description.as_deref()),
                ApiValue::opt_text(record.attribution.as_deref()),
                ApiValue::flag(record.sequenced),
                ApiValue::opt_text(record.frequency_mode.as_deref()),
                ApiValue::flag(record.is_bundled),
            ],
        );
        let results = self.api.pipeline(vec![stmt]).await?;
        results
            .first()
            .and_then(|r| r.last_insert_rowid.as_deref())
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| StoreError::Remote {
                message: "dictionary insert returned no row id".to_string(),
                retryable: false,
            })
    }

    async fn intern_glossary(&mut self, hash: &str, content: &str) -> Result<i64, StoreError> {
        let insert = Stmt::new(
            "INSERT OR IGNORE INTO glossaries (hash, content) VALUES (?1, ?2)",
            vec![ApiValue::text(hash), ApiValue::text(content)],
        );
        let select = Stmt::new(
            "SELECT id FROM glossaries WHERE hash = ?1",
            vec![ApiValue::text(hash)],
        );
        self.intern(insert, select).await
    }

    async fn intern_string(
        &mut self,
        table: StringTable,
        value: &str,
    ) -> Result<i64, StoreError> {
        let insert = Stmt::new(
            &format!(
                "INSERT OR IGNORE INTO {} ({}) VALUES (?1)",
                table.table(),
                table.column()
            ),
            vec![ApiValue::text(value)],
        );
        let select = Stmt::new(
            &format!(
                "SELECT id FROM {} WHERE {} = ?1",
                table.table(),
                table.column()
            ),
            vec![ApiValue::text(value)],
        );
        self.intern(insert, select).await
    }

    async fn insert_batch(&mut self, batch: RowBatch) -> Result<(), StoreError> {
        let table = batch.table();
        let rows = batch.len();
        let mut stmts = Vec::with_capacity(rows + 2);
        stmts.push(Stmt::bare("BEGIN"));
        push_row_stmts(&mut stmts, &batch);
        stmts.push(Stmt::bare("COMMIT"));

        retry(self.retry, "batch write", || self.api.pipeline(stmts.clone())).await?;
        tracing::debug!("wrote {rows} rows into {table}");
        Ok(())
    }

    async fn remove_dictionary(&mut self, dict_id: i64) -> Result<(), StoreError> {
        let stmt = Stmt::new(
            "DELETE FROM dictionaries WHERE id = ?1",
            vec![ApiValue::integer(dict_id)],
        );
        self.api.pipeline(vec![stmt]).await?;
        Ok(())
    }

    async fn finalize(&mut self) -> Result<(), StoreError> {
        // compaction is the hosted service's concern
        Ok(())
    }

    fn batch_limit(&self) -> Option<usize> {
        Some(self.batch_size)
    }
}

fn push_row_stmts(stmts: &mut Vec<Stmt>, batch: &RowBatch) {
    match batch {
        RowBatch::Terms(rows) => {
            for row in rows {
                stmts.push(Stmt::new(
                    schema::INSERT_TERM,
                    vec![
                        ApiValue::integer(row.dict_id),
                        ApiValue::text(&row.term),
                        ApiValue::text(&row.reading),
                        ApiValue::opt_integer(row.def_tags_id),
                        ApiValue::opt_integer(row.rules_id),
                        ApiValue::integer(row.score),
                        ApiValue::integer(row.glossary_id),
                        ApiValue::opt_integer(row.sequence),
                        ApiValue::opt_integer(row.term_tags_id),
                    ],
                ));
            }
        }
        RowBatch::TermMeta(rows) => {
            for row in rows {
                stmts.push(Stmt::new(
                    schema::INSERT_TERM_META,
                    vec![
                        ApiValue::integer(row.dict_id),
                        ApiValue::text(&row.term),
                        ApiValue::text(&row.mode),
                        ApiValue::opt_text(row.reading.as_deref()),
                        ApiValue::text(&row.data),
                    ],
                ));
            }
        }
        RowBatch::Tags(rows) => {
            for row in rows {
                stmts.push(Stmt::new(
                    schema::INSERT_TAG,
                    vec![
                        ApiValue::integer(row.dict_id),
                        ApiValue::text(&row.name),
                        ApiValue::text(&row.category),
                        ApiValue::integer(row.sort_order),
                        ApiValue::text(&row.notes),
                        ApiValue::integer(row.score),
                    ],
                ));
            }
        }
        RowBatch::Kanji(rows) => {
            for row in rows {
                stmts.push(Stmt::new(
                    schema::INSERT_KANJI,
                    vec![
                        ApiValue::integer(row.dict_id),
                        ApiValue::text(&row.kanji),
                        ApiValue::text(&row.onyomi),
                        ApiValue::text(&row.kunyomi),
                        ApiValue::opt_text(row.tags.as_deref()),
                        ApiValue::text(&row.meanings),
                        ApiValue::text(&row.stats),
                    ],
                ));
            }
        }
        RowBatch::KanjiMeta(rows) => {
            for row in rows {
                stmts.push(Stmt::new(
                    schema::INSERT_KANJI_META,
                    vec![
                        ApiValue::integer(row.dict_id),
                        ApiValue::text(&row.kanji),
                        ApiValue::text(&row.mode),
                        ApiValue::text(&row.data),
                    ],
                ));
            }
        }
    }
}

struct RemoteApi {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl RemoteApi {
    /// Execute a sequence of statements in one HTTP call.
    async fn pipeline(&self, stmts: Vec<Stmt>) -> Result<Vec<ExecuteResult>, StoreError> {
        let mut requests: Vec<PipelineStep> = stmts
            .into_iter()
            .map(|stmt| PipelineStep::Execute { stmt })
            .collect();
        requests.push(PipelineStep::Close);

        let url = format!("{}/v2/pipeline", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&PipelineRequest { requests });
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let body: PipelineResponse = response.json().await?;

        let mut results = Vec::with_capacity(body.results.len());
        for step in body.results {
            match step {
                StepResult::Ok {
                    response: StepResponse::Execute { result },
                } => results.push(result),
                StepResult::Ok {
                    response: StepResponse::Close,
                } => {}
                StepResult::Error { error } => {
                    return Err(StoreError::Remote {
                        retryable: is_retryable_code(error.code.as_deref()),
                        message: error.message,
                    });
                }
            }
        }
        Ok(results)
    }
}

fn is_retryable_code(code: Option<&str>) -> bool {
    matches!(
        code,
        Some("SQLITE_BUSY" | "SQLITE_LOCKED" | "SERVICE_UNAVAILABLE")
    )
}

#[derive(Serialize)]
struct PipelineRequest {
    requests: Vec<PipelineStep>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PipelineStep {
    Execute { stmt: Stmt },
    Close,
}

#[derive(Serialize, Clone)]
struct Stmt {
    sql: String,
    args: Vec<ApiValue>,
}

impl Stmt {
    fn new(sql: &str, args: Vec<ApiValue>) -> Self {
        Self {
            sql: sql.to_string(),
            args,
        }
    }

    fn bare(sql: &str) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// Cell values on the wire; integers are string-encoded per the protocol.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ApiValue {
    Null,
    Integer { value: String },
    Float { value: f64 },
    Text { value: String },
}

impl ApiValue {
    fn integer(value: i64) -> Self {
        ApiValue::Integer {
            value: value.to_string(),
        }
    }

    fn text(value: &str) -> Self {
        ApiValue::Text {
            value: value.to_string(),
        }
    }

    fn flag(value: bool) -> Self {
        Self::integer(value as i64)
    }

    fn opt_integer(value: Option<i64>) -> Self {
        value.map_or(ApiValue::Null, Self::integer)
    }

    fn opt_text(value: Option<&str>) -> Self {
        value.map_or(ApiValue::Null, Self::text)
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            ApiValue::Integer { value } => value.parse().ok(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct PipelineResponse {
    results: Vec<StepResult>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StepResult {
    Ok { response: StepResponse },
    Error { error: ApiError },
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StepResponse {
    Execute { result: ExecuteResult },
    Close,
}

#[derive(Deserialize)]
struct ExecuteResult {
    #[serde(default)]
    rows: Vec<Vec<ApiValue>>,
    #[serde(default)]
    last_insert_rowid: Option<String>,
}
