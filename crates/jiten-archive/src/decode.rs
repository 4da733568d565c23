use serde_json::Value;

use jiten_types::index::DictionaryIndex;
use jiten_types::records::{
    KanjiMetaRecord, KanjiRecord, MetaMode, TagRecord, TermMetaRecord, TermRecord,
};

use crate::error::ArchiveError;

/// Decode `index.json`; missing `title` or `revision` is fatal.
pub fn decode_index(bytes: &[u8]) -> Result<DictionaryIndex, ArchiveError> {
    serde_json::from_slice(bytes).map_err(|source| ArchiveError::Json {
        entry: "index.json".to_string(),
        source,
    })
}

/// Decode one `term_bank_N.json` payload.
pub fn decode_term_bank(entry: &str, bytes: &[u8]) -> Result<Vec<TermRecord>, ArchiveError> {
    let rows = parse_bank(entry, bytes)?;
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let ctx = RecordCtx { entry, index };
        let row = ctx.fields(row, 8)?;
        if !row[5].is_array() {
            return Err(ctx.bad("glossary must be an array"));
        }
        records.push(TermRecord {
            term: ctx.string(row, 0, "term")?,
            reading: ctx.string(row, 1, "reading")?,
            definition_tags: ctx.tag_set(row, 2, "definitionTags")?,
            rules: ctx.tag_set(row, 3, "rules")?,
            score: ctx.integer(row, 4, "score")?,
            glossary: row[5].clone(),
            sequence: ctx.opt_integer(row, 6, "sequence")?,
            term_tags: ctx.tag_set(row, 7, "termTags")?,
        });
    }
    Ok(records)
}

/// Decode one `term_meta_bank_N.json` payload, surfacing the reading carried
/// inside frequency/pitch data objects.
pub fn decode_term_meta_bank(
    entry: &str,
    bytes: &[u8],
) -> Result<Vec<TermMetaRecord>, ArchiveError> {
    let rows = parse_bank(entry, bytes)?;
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let ctx = RecordCtx { entry, index };
        let row = ctx.fields(row, 3)?;
        let term = ctx.string(row, 0, "term")?;
        let mode = ctx.meta_mode(row, 1)?;
        let data = row[2].clone();
        let reading = data
            .get("reading")
            .and_then(Value::as_str)
            .map(str::to_string);
        if mode == MetaMode::PitchAccent && reading.is_none() {
            return Err(ctx.bad("pitch data must carry a reading"));
        }
        records.push(TermMetaRecord {
            term,
            mode,
            reading,
            data,
        });
    }
    Ok(records)
}

/// Decode one `tag_bank_N.json` payload.
pub fn decode_tag_bank(entry: &str, bytes: &[u8]) -> Result<Vec<TagRecord>, ArchiveError> {
    let rows = parse_bank(entry, bytes)?;
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let ctx = RecordCtx { entry, index };
        let row = ctx.fields(row, 5)?;
        records.push(TagRecord {
            name: ctx.string(row, 0, "name")?,
            category: ctx.string(row, 1, "category")?,
            sort_order: ctx.integer(row, 2, "sortOrder")?,
            notes: ctx.string(row, 3, "notes")?,
            score: ctx.integer(row, 4, "score")?,
        });
    }
    Ok(records)
}

/// Decode one `kanji_bank_N.json` payload.
pub fn decode_kanji_bank(entry: &str, bytes: &[u8]) -> Result<Vec<KanjiRecord>, ArchiveError> {
    let rows = parse_bank(entry, bytes)?;
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let ctx = RecordCtx { entry, index };
        let row = ctx.fields(row, 6)?;
        if !row[4].is_array() {
            return Err(ctx.bad("meanings must be an array"));
        }
        if !row[5].is_object() {
            return Err(ctx.bad("stats must be an object"));
        }
        records.push(KanjiRecord {
            kanji: ctx.string(row, 0, "character")?,
            onyomi: ctx.string(row, 1, "onyomi")?,
            kunyomi: ctx.string(row, 2, "kunyomi")?,
            tags: ctx.tag_set(row, 3, "tags")?,
            meanings: row[4].clone(),
            stats: row[5].clone(),
        });
    }
    Ok(records)
}

/// Decode one `kanji_meta_bank_N.json` payload; the mode is always `freq`.
pub fn decode_kanji_meta_bank(
    entry: &str,
    bytes: &[u8],
) -> Result<Vec<KanjiMetaRecord>, ArchiveError> {
    let rows = parse_bank(entry, bytes)?;
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let ctx = RecordCtx { entry, index };
        let row = ctx.fields(row, 3)?;
        let kanji = ctx.string(row, 0, "kanji")?;
        if ctx.meta_mode(row, 1)? != MetaMode::Frequency {
            return Err(ctx.bad("kanji meta mode must be \"freq\""));
        }
        records.push(KanjiMetaRecord {
            kanji,
            data: row[2].clone(),
        });
    }
    Ok(records)
}

fn parse_bank(entry: &str, bytes: &[u8]) -> Result<Vec<Value>, ArchiveError> {
    serde_json::from_slice(bytes).map_err(|source| ArchiveError::Json {
        entry: entry.to_string(),
        source,
    })
}

struct RecordCtx<'a> {
    entry: &'a str,
    index: usize,
}

impl RecordCtx<'_> {
    fn bad(&self, reason: impl Into<String>) -> ArchiveError {
        ArchiveError::Record {
            entry: self.entry.to_string(),
            index: self.index,
            reason: reason.into(),
        }
    }

    /// A record must be an array of exactly `arity` fields.
    fn fields<'v>(&self, row: &'v Value, arity: usize) -> Result<&'v [Value], ArchiveError> {
        let fields = row
            .as_array()
            .ok_or_else(|| self.bad("record must be an array"))?;
        if fields.len() != arity {
            return Err(self.bad(format!(
                "expected {arity} fields, found {}",
                fields.len()
            )));
        }
        Ok(fields)
    }

    fn string(&self, row: &[Value], field: usize, name: &str) -> Result<String, ArchiveError> {
        row[field]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.bad(format!("{name} must be a string")))
    }

    /// Tag/rule set fields: null, empty, or whitespace-only all mean "no set".
    fn tag_set(
        &self,
        row: &[Value],
        field: usize,
        name: &str,
    ) -> Result<Option<String>, ArchiveError> {
        match &row[field] {
            Value::Null => Ok(None),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
            _ => Err(self.bad(format!("{name} must be a string or null"))),
        }
    }

    /// Integer fields arrive as JSON numbers or numeric strings, depending
    /// on the publisher.
    fn integer(&self, row: &[Value], field: usize, name: &str) -> Result<i64, ArchiveError> {
        match &row[field] {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| self.bad(format!("{name} must be an integer"))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| self.bad(format!("{name} must be an integer"))),
            _ => Err(self.bad(format!("{name} must be an integer"))),
        }
    }

    fn opt_integer(
        &self,
        row: &[Value],
        field: usize,
        name: &str,
    ) -> Result<Option<i64>, ArchiveError> {
        if row[field].is_null() {
            return Ok(None);
        }
        self.integer(row, field, name).map(Some)
    }

    fn meta_mode(&self, row: &[Value], field: usize) -> Result<MetaMode, ArchiveError> {
        match row[field].as_str() {
            Some("freq") => Ok(MetaMode::Frequency),
            Some("pitch") => Ok(MetaMode::PitchAccent),
            Some(other) => Err(self.bad(format!("unknown meta mode {other:?}"))),
            None => Err(self.bad("mode must be a string")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn term_records_decode_positionally() {
        let bank = json!([
            ["猫", "ねこ", null, "", "100", [{"type": "text", "text": "cat"}], 1, "n"],
            ["犬", "いぬ", "n", "v5", -5, ["dog"], null, "  "],
        ])
        .to_string();

        let records = decode_term_bank("term_bank_1.json", bank.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);

        let cat = &records[0];
        assert_eq!(cat.term, "猫");
        assert_eq!(cat.reading, "ねこ");
        assert_eq!(cat.definition_tags, None);
        assert_eq!(cat.rules, None);
        assert_eq!(cat.score, 100); // numeric string coerced
        assert_eq!(cat.glossary, json!([{"type": "text", "text": "cat"}]));
        assert_eq!(cat.sequence, Some(1));
        assert_eq!(cat.term_tags, Some("n".to_string()));

        let dog = &records[1];
        assert_eq!(dog.definition_tags, Some("n".to_string()));
        assert_eq!(dog.rules, Some("v5".to_string()));
        assert_eq!(dog.score, -5);
        assert_eq!(dog.sequence, None);
        assert_eq!(dog.term_tags, None); // whitespace-only resolves to no set
    }

    #[test]
    fn wrong_arity_is_fatal() {
        let bank = json!([["猫", "ねこ", null, "", 100, [], 1]]).to_string();
        let err = decode_term_bank("term_bank_1.json", bank.as_bytes()).unwrap_err();
        assert!(matches!(err, ArchiveError::Record { index: 0, .. }));
    }

    #[test]
    fn malformed_json_is_fatal() {
        let err = decode_term_bank("term_bank_1.json", b"[[\"x\",").unwrap_err();
        assert!(matches!(err, ArchiveError::Json { .. }));
    }

    #[test]
    fn term_meta_surfaces_reading_from_data() {
        let bank = json!([
            ["猫", "freq", {"value": 42, "reading": "ねこ"}],
            ["打", "freq", 120],
            ["犬", "pitch", {"reading": "いぬ", "pitches": [{"position": 2}]}],
        ])
        .to_string();

        let records = decode_term_meta_bank("term_meta_bank_1.json", bank.as_bytes()).unwrap();
        assert_eq!(records[0].mode, MetaMode::Frequency);
        assert_eq!(records[0].reading, Some("ねこ".to_string()));
        assert_eq!(records[1].reading, None);
        assert_eq!(records[2].mode, MetaMode::PitchAccent);
        assert_eq!(records[2].reading, Some("いぬ".to_string()));
    }

    #[test]
    fn unknown_meta_mode_is_fatal() {
        let bank = json!([["猫", "ipa", {}]]).to_string();
        let err = decode_term_meta_bank("term_meta_bank_1.json", bank.as_bytes()).unwrap_err();
        assert!(matches!(err, ArchiveError::Record { .. }));
    }

    #[test]
    fn pitch_without_reading_is_fatal() {
        let bank = json!([["犬", "pitch", {"pitches": []}]]).to_string();
        let err = decode_term_meta_bank("term_meta_bank_1.json", bank.as_bytes()).unwrap_err();
        assert!(matches!(err, ArchiveError::Record { .. }));
    }

    #[test]
    fn tag_records_decode() {
        let bank = json!([["n", "partOfSpeech", "-3", "noun", 0]]).to_string();
        let records = decode_tag_bank("tag_bank_1.json", bank.as_bytes()).unwrap();
        assert_eq!(
            records[0],
            TagRecord {
                name: "n".to_string(),
                category: "partOfSpeech".to_string(),
                sort_order: -3,
                notes: "noun".to_string(),
                score: 0,
            }
        );
    }

    #[test]
    fn kanji_records_decode() {
        let bank = json!([
            ["猫", "ビョウ", "ねこ", "jouyou", ["cat"], {"strokes": "11"}],
        ])
        .to_string();
        let records = decode_kanji_bank("kanji_bank_1.json", bank.as_bytes()).unwrap();
        assert_eq!(records[0].kanji, "猫");
        assert_eq!(records[0].tags, Some("jouyou".to_string()));
        assert_eq!(records[0].meanings, json!(["cat"]));
        assert_eq!(records[0].stats, json!({"strokes": "11"}));
    }

    #[test]
    fn kanji_meta_requires_freq_mode() {
        let bank = json!([["猫", "freq", 300]]).to_string();
        let records = decode_kanji_meta_bank("kanji_meta_bank_1.json", bank.as_bytes()).unwrap();
        assert_eq!(records[0].kanji, "猫");
        assert_eq!(records[0].data, json!(300));

        let bank = json!([["猫", "pitch", {}]]).to_string();
        assert!(decode_kanji_meta_bank("kanji_meta_bank_1.json", bank.as_bytes()).is_err());
    }

    #[test]
    fn index_requires_title_and_revision() {
        let index = decode_index(br#"{"title":"Test","revision":"1","format":3}"#).unwrap();
        assert_eq!(index.title, "Test");
        assert_eq!(index.format_version(), Some(3));

        assert!(matches!(
            decode_index(br#"{"title":"Test"}"#),
            Err(ArchiveError::Json { .. })
        ));
    }
}
