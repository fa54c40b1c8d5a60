//! Wire shapes for the Sheets v4 `values` endpoints and the OAuth token
//! exchange.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `ValueRange` as returned by `values.get`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValueRangeDto {
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRangeDto {
    /// Rows as text. The API trims trailing blank cells, so rows are ragged.
    pub(super) fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `ValueRange` request body for `values.update` and `values.append`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValueRangeBody<'a> {
    pub range: &'a str,
    pub major_dimension: &'static str,
    pub values: [&'a [String]; 1],
}

impl<'a> ValueRangeBody<'a> {
    pub(super) fn single_row(range: &'a str, cells: &'a [String]) -> Self {
        Self {
            range,
            major_dimension: "ROWS",
            values: [cells],
        }
    }
}

/// Response of `values.append`.
#[derive(Debug, Deserialize)]
pub(super) struct AppendResponseDto {
    pub updates: Option<UpdatedRangeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdatedRangeDto {
    pub updated_range: Option<String>,
}

/// Successful OAuth token response.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Google API error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorDto {
    pub error: ApiErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBodyDto {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn stringifies_non_text_cells() {
        let dto: ValueRangeDto = serde_json::from_value(json!({
            "range": "'Sheet1'!A1:L3",
            "majorDimension": "ROWS",
            "values": [["Asha", 9876543210_u64, true, null], []]
        }))
        .expect("decode");
        assert_eq!(
            dto.into_rows(),
            vec![
                vec![
                    "Asha".to_owned(),
                    "9876543210".to_owned(),
                    "true".to_owned(),
                    String::new()
                ],
                Vec::new()
            ]
        );
    }

    #[rstest]
    fn empty_ranges_omit_values() {
        let dto: ValueRangeDto =
            serde_json::from_value(json!({"range": "'Sheet1'!A1:L1000"})).expect("decode");
        assert!(dto.into_rows().is_empty());
    }

    #[rstest]
    fn row_body_serialises_as_single_row() {
        let cells = vec!["a".to_owned(), "b".to_owned()];
        let body = serde_json::to_value(ValueRangeBody::single_row("'S'!A2:L2", &cells))
            .expect("encode");
        assert_eq!(
            body,
            json!({"range": "'S'!A2:L2", "majorDimension": "ROWS", "values": [["a", "b"]]})
        );
    }
}
