use crate::catalog::QuestionId;
use crate::error::ParseError;
use crate::validation::RawResponses;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Parse a JSON array of response objects.
///
/// Items are kept untyped, whatever their JSON type; validation happens per
/// item during the batch run so that one malformed entry does not reject the
/// whole file.
pub fn parse_json(content: &str) -> std::result::Result<Vec<Value>, ParseError> {
    match serde_json::from_str::<Value>(content)? {
        Value::Array(items) => Ok(items),
        _ => Err(ParseError::NotAList),
    }
}

/// Parse CSV rows with columns `q1..q10`; extra columns are ignored
pub fn parse_csv<R: Read>(reader: R) -> std::result::Result<Vec<RawResponses>, ParseError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();

    let columns = QuestionId::ALL
        .iter()
        .map(|question| {
            headers
                .iter()
                .position(|h| h == question.as_str())
                .map(|position| (*question, position))
                .ok_or_else(|| ParseError::MissingColumn {
                    column: question.to_string(),
                })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut responses = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        let row = row_index + 1;

        let mut item = RawResponses::new();
        for (question, position) in &columns {
            let cell = record.get(*position).unwrap_or_default();
            let value: i64 = cell.parse().map_err(|_| ParseError::InvalidValue {
                row,
                column: question.to_string(),
                value: cell.to_string(),
            })?;
            item.insert(question.to_string(), Value::from(value));
        }
        responses.push(item);
    }

    Ok(responses)
}

/// Load response sets from a JSON file
pub fn load_json(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let responses =
        parse_json(&content).with_context(|| format!("Failed to parse JSON input: {}", path.display()))?;

    debug!(path = %path.display(), count = responses.len(), "Loaded JSON responses");
    Ok(responses)
}

/// Load response sets from a CSV file
pub fn load_csv(path: &Path) -> Result<Vec<Value>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let responses =
        parse_csv(file).with_context(|| format!("Failed to parse CSV input: {}", path.display()))?;

    debug!(path = %path.display(), count = responses.len(), "Loaded CSV responses");
    Ok(responses
        .into_iter()
        .map(|row| Value::Object(row.into_iter().collect()))
        .collect())
}

/// Load response sets, choosing the format from the file extension (`.csv` or JSON otherwise)
pub fn load_responses(path: &Path) -> Result<Vec<Value>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv { load_csv(path) } else { load_json(path) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Language;
    use crate::runner::process_batch;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    const CSV_INPUT: &str = "\
id,q1,q2,q3,q4,q5,q6,q7,q8,q9,q10
a,2,-2,1,-1,2,-2,1,-1,1,-1
b, 0,0,0,0,0,0,0,0,0,0
";

    #[test]
    fn test_parse_json_list() {
        let content = r#"[
            {"q1": 2, "q2": -2, "q3": 1, "q4": -1, "q5": 2, "q6": -2, "q7": 1, "q8": -1, "q9": 1, "q10": -1},
            {"q1": 3}
        ]"#;

        let responses = parse_json(content).unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["q10"], json!(-1));
        assert_eq!(responses[1], json!({"q1": 3}));
    }

    #[test]
    fn test_parse_json_rejects_non_list() {
        let err = parse_json(r#"{"q1": 1}"#).unwrap_err();
        assert!(matches!(err, ParseError::NotAList));

        let err = parse_json("2").unwrap_err();
        assert!(matches!(err, ParseError::NotAList));
    }

    #[test]
    fn test_parse_json_keeps_non_object_items_for_the_batch() {
        let content = r#"[
            {"q1": 2, "q2": -2, "q3": 1, "q4": -1, "q5": 2, "q6": -2, "q7": 1, "q8": -1, "q9": 1, "q10": -1},
            [2, -2, 1, -1, 2, -2, 1, -1, 1, -1],
            {"q1": 0, "q2": 0, "q3": 0, "q4": 0, "q5": 0, "q6": 0, "q7": 0, "q8": 0, "q9": 0, "q10": 0}
        ]"#;

        let responses = parse_json(content).unwrap();
        assert_eq!(responses.len(), 3);
        assert!(responses[1].is_array());

        let outcome = process_batch(&responses, Language::En);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].index, 1);
        assert_eq!(outcome.errors[0].input, json!([2, -2, 1, -1, 2, -2, 1, -1, 1, -1]));
        assert_eq!(
            outcome.errors[0].message,
            "Expected an object of q1..q10 responses, got a list"
        );
    }

    #[test]
    fn test_parse_json_malformed() {
        let err = parse_json("[{").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_parse_csv_rows() {
        let responses = parse_csv(CSV_INPUT.as_bytes()).unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["q1"], json!(2));
        assert_eq!(responses[1]["q1"], json!(0));
        assert!(!responses[0].contains_key("id"));
        assert_eq!(responses[0].len(), 10);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let input = "q1,q2,q3,q4,q5,q6,q7,q8,q9\n0,0,0,0,0,0,0,0,0\n";
        let err = parse_csv(input.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Missing column q10 in CSV");
    }

    #[test]
    fn test_parse_csv_invalid_value_names_column() {
        let input = "q1,q2,q3,q4,q5,q6,q7,q8,q9,q10\n0,0,0,0,x,0,0,0,0,0\n";
        let err = parse_csv(input.as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "q5");
                assert_eq!(value, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_csv_keeps_out_of_range_for_validation() {
        let input = "q1,q2,q3,q4,q5,q6,q7,q8,q9,q10\n5,0,0,0,0,0,0,0,0,0\n";
        let responses = parse_csv(input.as_bytes()).unwrap();
        assert_eq!(responses[0]["q1"], json!(5));
    }

    #[test]
    fn test_load_responses_by_extension() {
        let mut csv_file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(csv_file, "{}", CSV_INPUT).unwrap();
        assert_eq!(load_responses(csv_file.path()).unwrap().len(), 2);

        let mut json_file = NamedTempFile::new().unwrap();
        write!(json_file, "[]").unwrap();
        assert!(load_responses(json_file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_responses_missing_file() {
        let err = load_responses(Path::new("/nonexistent/input.json")).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }

    #[test]
    fn test_load_json_reports_path() {
        let mut json_file = NamedTempFile::new().unwrap();
        write!(json_file, "{{}}").unwrap();

        let err = load_json(json_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON input"));
    }
}
