// Raw batch payload mapping - the capture client's JSON wire format
use crate::error::PipelineError;
use serde::Deserialize;
use serde_json::Value;

/// The structure POSTed by the capture client: `{"data": [ ... ]}`.
#[derive(Debug, Deserialize)]
pub struct RawBatch {
    #[serde(default)]
    pub data: Vec<RawSample>,
}

/// One entry of the raw payload. Field names are camelCase on the wire.
///
/// Values are kept as loose JSON so that a single bad entry never rejects
/// the whole payload; per-field validation happens when the tabular form
/// is decoded.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSample {
    #[serde(default)]
    pub index: Option<Value>,
    #[serde(default)]
    pub date_time: Option<Value>,
    #[serde(default)]
    pub latitude: Option<Value>,
    #[serde(default)]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub inclination: Option<Value>,
}

/// Parse the raw payload bytes; a structurally invalid body is a
/// [`PipelineError::Decode`].
pub fn parse_payload(bytes: &[u8]) -> Result<RawBatch, PipelineError> {
    serde_json::from_slice(bytes).map_err(|e| PipelineError::Decode(e.to_string()))
}

/// Verbatim cell text for a raw field: strings unquoted, numbers in plain
/// decimal form, missing or null fields as an empty cell.
pub fn cell_text(value: &Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_payload() {
        let body = br#"{"data":[{"index":0,"dateTime":"2024-01-01 12:00:00","latitude":47.1,"longitude":8.5,"inclination":-0.75}]}"#;
        let payload = parse_payload(body).unwrap();
        assert_eq!(payload.data.len(), 1);
        assert_eq!(cell_text(&payload.data[0].index), "0");
        assert_eq!(cell_text(&payload.data[0].date_time), "2024-01-01 12:00:00");
        assert_eq!(cell_text(&payload.data[0].inclination), "-0.75");
    }

    #[test]
    fn test_missing_fields_become_empty_cells() {
        let body = br#"{"data":[{"index":3}]}"#;
        let payload = parse_payload(body).unwrap();
        assert_eq!(cell_text(&payload.data[0].latitude), "");
        assert_eq!(cell_text(&payload.data[0].date_time), "");
    }

    #[test]
    fn test_missing_data_field_is_empty_batch_payload() {
        let payload = parse_payload(b"{}").unwrap();
        assert!(payload.data.is_empty());
    }

    #[test]
    fn test_structurally_invalid_body_is_decode_error() {
        assert!(matches!(
            parse_payload(b"not json"),
            Err(PipelineError::Decode(_))
        ));
    }
}
