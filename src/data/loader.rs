use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Catalog, CatalogRecord, FieldValue};

/// Column names accepted for the delimited genre field.
const GENRE_COLUMN_ALIASES: [&str; 2] = ["listed_in", "genre"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with named columns (Netflix-style export)
/// * `.json`    – `[{ "title": ..., "release_year": ..., ...meta }, ...]`
/// * `.parquet` – flat columns, one row per title
///
/// A `title` column is required; `release_year`, `duration` and the genre
/// column (`listed_in` or `genre`) are picked up when present. Cell-level
/// garbage never fails the load — unusable years and durations are carried
/// as missing values and excluded from statistics downstream.
pub fn load_file(path: &Path) -> Result<Catalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// -- Shared cell parsers --

/// Lenient year parsing: integers, float-formatted integers, blank → None.
fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    s.parse::<f64>().ok().map(|y| y as i32)
}

/// Split a delimited genre cell into trimmed, non-empty tags.
fn split_genres(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

fn guess_field_type(s: &str) -> FieldValue {
    if s.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return FieldValue::Float(f);
    }
    if s == "true" || s == "false" {
        return FieldValue::Bool(s == "true");
    }
    FieldValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. The title / year / duration /
/// genre columns are mapped onto the record fields; every other column is
/// kept as typed extra metadata.
fn load_csv(path: &Path) -> Result<Catalog> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let title_idx = headers
        .iter()
        .position(|h| h == "title")
        .context("CSV missing 'title' column")?;
    let year_idx = headers.iter().position(|h| h == "release_year");
    let duration_idx = headers.iter().position(|h| h == "duration");
    let genre_idx = GENRE_COLUMN_ALIASES
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name));

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let title = row.get(title_idx).unwrap_or("").trim().to_string();
        let release_year = year_idx.and_then(|i| row.get(i)).and_then(parse_year);
        let duration = duration_idx
            .and_then(|i| row.get(i))
            .map(|s| guess_field_type(s.trim()))
            .unwrap_or(FieldValue::Null);
        let genres = genre_idx
            .and_then(|i| row.get(i))
            .map(split_genres)
            .unwrap_or_default();

        let mut extra = BTreeMap::new();
        for (col_idx, value) in row.iter().enumerate() {
            if col_idx == title_idx
                || Some(col_idx) == year_idx
                || Some(col_idx) == duration_idx
                || Some(col_idx) == genre_idx
            {
                continue;
            }
            let col_name = &headers[col_idx];
            extra.insert(col_name.clone(), guess_field_type(value.trim()));
        }

        records.push(CatalogRecord {
            title,
            release_year,
            duration,
            genres,
            extra,
        });
    }

    Ok(Catalog::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "title": "Example",
///     "release_year": 1994,
///     "duration": "90 min",
///     "listed_in": "Action, Dramas",
///     "rating": "PG"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let title = obj
            .get("title")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        let release_year = obj.get("release_year").and_then(json_year);
        let duration = obj
            .get("duration")
            .map(json_to_field)
            .unwrap_or(FieldValue::Null);
        let genres = GENRE_COLUMN_ALIASES
            .iter()
            .find_map(|name| obj.get(*name))
            .and_then(|v| v.as_str())
            .map(split_genres)
            .unwrap_or_default();

        let mut extra = BTreeMap::new();
        for (key, val) in obj {
            if key == "title"
                || key == "release_year"
                || key == "duration"
                || GENRE_COLUMN_ALIASES.contains(&key.as_str())
            {
                continue;
            }
            extra.insert(key.clone(), json_to_field(val));
        }

        records.push(CatalogRecord {
            title,
            release_year,
            duration,
            genres,
            extra,
        });
    }

    Ok(Catalog::from_records(records))
}

fn json_year(val: &JsonValue) -> Option<i32> {
    if let Some(i) = val.as_i64() {
        return i32::try_from(i).ok();
    }
    if let Some(f) = val.as_f64() {
        return Some(f as i32);
    }
    val.as_str().and_then(parse_year)
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog export.
///
/// Expected schema: flat Utf8 / Int64 / Float64 / Boolean columns, one row
/// per title, with a `title` column and optionally `release_year`,
/// `duration` and a genre column. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let title_idx = schema
            .index_of("title")
            .map_err(|_| anyhow::anyhow!("Parquet file missing 'title' column"))?;
        let year_idx = schema.index_of("release_year").ok();
        let duration_idx = schema.index_of("duration").ok();
        let genre_idx = GENRE_COLUMN_ALIASES
            .iter()
            .find_map(|name| schema.index_of(name).ok());

        // Collect extra column indices (everything not mapped above)
        let meta_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                *i != title_idx
                    && Some(*i) != year_idx
                    && Some(*i) != duration_idx
                    && Some(*i) != genre_idx
            })
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..n_rows {
            let title = match extract_field_value(batch.column(title_idx), row) {
                FieldValue::Null => String::new(),
                value => value.to_string(),
            };
            let release_year = year_idx.and_then(|i| {
                match extract_field_value(batch.column(i), row) {
                    FieldValue::Integer(y) => i32::try_from(y).ok(),
                    FieldValue::Float(y) => Some(y as i32),
                    FieldValue::String(s) => parse_year(&s),
                    _ => None,
                }
            });
            let duration = duration_idx
                .map(|i| extract_field_value(batch.column(i), row))
                .unwrap_or(FieldValue::Null);
            let genres = genre_idx
                .map(|i| match extract_field_value(batch.column(i), row) {
                    FieldValue::String(s) => split_genres(&s),
                    _ => Vec::new(),
                })
                .unwrap_or_default();

            let mut extra = BTreeMap::new();
            for (col_idx, col_name) in &meta_cols {
                let value = extract_field_value(batch.column(*col_idx), row);
                extra.insert(col_name.clone(), value);
            }

            records.push(CatalogRecord {
                title,
                release_year,
                duration,
                genres,
                extra,
            });
        }
    }

    Ok(Catalog::from_records(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_field_value(col: &Arc<dyn Array>, row: usize) -> FieldValue {
    if col.is_null(row) {
        return FieldValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                FieldValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                FieldValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            FieldValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            FieldValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            FieldValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            FieldValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            FieldValue::Bool(arr.value(row))
        }
        _ => FieldValue::String(format!("{:?}", col.data_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn csv_loads_records_and_splits_genres() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "catalog.csv",
            "title,release_year,duration,listed_in,rating\n\
             First,1994,90 min,\"Action, Dramas\",PG\n\
             Second,,88 min,Dramas,R\n\
             Third,2003,,,\n",
        );

        let catalog = load_file(&path).unwrap();
        assert_eq!(catalog.len(), 3);

        let first = &catalog.records[0];
        assert_eq!(first.title, "First");
        assert_eq!(first.release_year, Some(1994));
        assert_eq!(first.duration, FieldValue::String("90 min".into()));
        assert_eq!(first.genres, ["Action", "Dramas"]);
        assert_eq!(first.extra["rating"], FieldValue::String("PG".into()));

        // Blank year and blank cells stay missing instead of failing.
        assert_eq!(catalog.records[1].release_year, None);
        assert_eq!(catalog.records[2].duration, FieldValue::Null);
        assert!(catalog.records[2].genres.is_empty());
        assert_eq!(catalog.records[2].extra["rating"], FieldValue::Null);

        assert_eq!(
            catalog.genre_index.iter().collect::<Vec<_>>(),
            ["Action", "Dramas"]
        );
        assert_eq!(catalog.extra_columns, ["rating"]);
    }

    #[test]
    fn csv_accepts_genre_alias() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "catalog.csv",
            "title,genre\nOnly,Action\n",
        );
        let catalog = load_file(&path).unwrap();
        assert_eq!(catalog.records[0].genres, ["Action"]);
        assert!(catalog.extra_columns.is_empty());
    }

    #[test]
    fn csv_without_title_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "catalog.csv", "name,release_year\nFirst,1994\n");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn json_loads_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "catalog.json",
            r#"[
                {"title": "First", "release_year": 1994, "duration": "90 min",
                 "listed_in": "Action, Dramas", "rating": "PG"},
                {"title": "Second", "release_year": null, "duration": null}
            ]"#,
        );

        let catalog = load_file(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records[0].release_year, Some(1994));
        assert_eq!(catalog.records[0].genres, ["Action", "Dramas"]);
        assert_eq!(
            catalog.records[0].extra["rating"],
            FieldValue::String("PG".into())
        );
        assert_eq!(catalog.records[1].release_year, None);
        assert_eq!(catalog.records[1].duration, FieldValue::Null);
    }

    #[test]
    fn json_rejects_non_array_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "catalog.json", r#"{"title": "First"}"#);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn parquet_loads_records_with_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, false),
            Field::new("release_year", DataType::Int64, true),
            Field::new("duration", DataType::Utf8, true),
            Field::new("listed_in", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["First", "Second"])),
                Arc::new(Int64Array::from(vec![Some(1994), None])),
                Arc::new(StringArray::from(vec![Some("90 min"), None])),
                Arc::new(StringArray::from(vec![Some("Action, Dramas"), None])),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let catalog = load_file(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records[0].release_year, Some(1994));
        assert_eq!(catalog.records[0].genres, ["Action", "Dramas"]);
        assert_eq!(catalog.records[1].release_year, None);
        assert_eq!(catalog.records[1].duration, FieldValue::Null);
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = load_file(Path::new("catalog.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }

    #[test]
    fn year_parsing_is_lenient() {
        assert_eq!(parse_year("1994"), Some(1994));
        assert_eq!(parse_year(" 1994 "), Some(1994));
        assert_eq!(parse_year("1994.0"), Some(1994));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("unknown"), None);
    }

    #[test]
    fn genre_splitting_trims_and_drops_empties() {
        assert_eq!(
            split_genres(" Action , Dramas ,, "),
            vec!["Action".to_string(), "Dramas".to_string()]
        );
        assert!(split_genres("").is_empty());
    }
}
