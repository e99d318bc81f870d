// Tabular codec - CSV form of a batch
use crate::domain::sample::{Batch, Sample};
use crate::error::PipelineError;
use crate::infrastructure::payload::{cell_text, RawBatch};
use std::io::{Read, Write};

/// Fixed, order-significant column set shared with the capture client's
/// CSV exports.
pub const CSV_HEADER: [&str; 5] = [
    "Index",
    "DateTime",
    "Latitude",
    "Longitude",
    "Inclination(degrees)",
];

/// Result of decoding a tabular input: the surviving batch plus one
/// warning per dropped row.
#[derive(Debug)]
pub struct DecodedBatch {
    pub batch: Batch,
    pub warnings: Vec<String>,
}

/// Write a batch as CSV. Numeric fields use their plain decimal form;
/// precision formatting is a rendering-time concern.
pub fn encode_batch<W: Write>(batch: &Batch, writer: W) -> Result<(), PipelineError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER).map_err(store_error)?;
    for sample in batch.samples() {
        csv.write_record([
            sample.index.to_string(),
            sample.date_time.clone(),
            sample.latitude.to_string(),
            sample.longitude.to_string(),
            sample.inclination.to_string(),
        ])
        .map_err(store_error)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write a raw payload as CSV with every field carried verbatim (missing
/// fields become empty cells). Row-level validation is deferred to
/// [`decode`], mirroring the capture client's own exports.
pub fn encode_payload<W: Write>(payload: &RawBatch, writer: W) -> Result<(), PipelineError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER).map_err(store_error)?;
    for entry in &payload.data {
        csv.write_record([
            cell_text(&entry.index),
            cell_text(&entry.date_time),
            cell_text(&entry.latitude),
            cell_text(&entry.longitude),
            cell_text(&entry.inclination),
        ])
        .map_err(store_error)?;
    }
    csv.flush()?;
    Ok(())
}

/// Decode tabular rows into a batch.
///
/// Rows are parsed independently: a row with a non-integer Index or a
/// non-float coordinate/inclination is dropped with a warning and parsing
/// continues. A wrong header is a [`PipelineError::Decode`]; zero
/// surviving rows is [`PipelineError::EmptyBatch`].
pub fn decode<R: Read>(reader: R) -> Result<DecodedBatch, PipelineError> {
    let mut csv = csv::Reader::from_reader(reader);
    let header = csv
        .headers()
        .map_err(|e| PipelineError::Decode(e.to_string()))?;
    if !header.iter().eq(CSV_HEADER) {
        return Err(PipelineError::Decode(format!(
            "unexpected header: {:?}",
            header.iter().collect::<Vec<_>>()
        )));
    }

    let mut samples = Vec::new();
    let mut warnings = Vec::new();
    for (row, record) in csv.records().enumerate() {
        let parsed = record
            .map_err(|e| e.to_string())
            .and_then(|record| parse_row(&record));
        match parsed {
            Ok(sample) => samples.push(sample),
            Err(reason) => {
                tracing::warn!(row, %reason, "skipping row with invalid data");
                warnings.push(format!("row {row}: {reason}"));
            }
        }
    }

    let batch = Batch::from_samples(samples)?;
    Ok(DecodedBatch { batch, warnings })
}

fn parse_row(record: &csv::StringRecord) -> Result<Sample, String> {
    let field = |i: usize| record.get(i).unwrap_or("");
    let index = field(0)
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid Index {:?}", field(0)))?;
    let latitude = parse_float(field(2), "Latitude")?;
    let longitude = parse_float(field(3), "Longitude")?;
    let inclination = parse_float(field(4), "Inclination(degrees)")?;
    Ok(Sample::new(index, field(1), latitude, longitude, inclination))
}

fn parse_float(text: &str, column: &str) -> Result<f64, String> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid {column} {text:?}"))
}

fn store_error(error: csv::Error) -> PipelineError {
    PipelineError::Store(std::io::Error::other(error))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch() -> Batch {
        Batch::from_samples(vec![
            Sample::new(0, "2024-01-01 12:00:00", 47.1, 8.5, 0.25),
            Sample::new(1, "2024-01-01 12:00:05", 47.10001, 8.50001, -1.5),
        ])
        .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_samples_in_order() {
        let batch = sample_batch();
        let mut buffer = Vec::new();
        encode_batch(&batch, &mut buffer).unwrap();

        let decoded = decode(buffer.as_slice()).unwrap();
        assert!(decoded.warnings.is_empty());
        assert_eq!(decoded.batch.samples(), batch.samples());
    }

    #[test]
    fn test_header_written_exactly() {
        let mut buffer = Vec::new();
        encode_batch(&sample_batch(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("Index,DateTime,Latitude,Longitude,Inclination(degrees)\n"));
    }

    #[test]
    fn test_malformed_row_is_dropped_with_one_warning() {
        let input = "Index,DateTime,Latitude,Longitude,Inclination(degrees)\n\
                     0,t0,10.0,20.0,0.5\n\
                     x,t1,10.0,20.0,0.5\n\
                     2,t2,10.0,20.0,-0.5\n";
        let decoded = decode(input.as_bytes()).unwrap();
        assert_eq!(decoded.batch.len(), 2);
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.batch.samples()[1].index, 2);
    }

    #[test]
    fn test_non_float_coordinate_drops_row() {
        let input = "Index,DateTime,Latitude,Longitude,Inclination(degrees)\n\
                     0,t0,north,20.0,0.5\n\
                     1,t1,10.0,20.0,0.5\n";
        let decoded = decode(input.as_bytes()).unwrap();
        assert_eq!(decoded.batch.len(), 1);
        assert_eq!(decoded.warnings.len(), 1);
    }

    #[test]
    fn test_all_malformed_rows_is_empty_batch() {
        let input = "Index,DateTime,Latitude,Longitude,Inclination(degrees)\n\
                     a,t0,10.0,20.0,0.5\n\
                     b,t1,10.0,20.0,0.5\n";
        assert!(matches!(
            decode(input.as_bytes()),
            Err(PipelineError::EmptyBatch)
        ));
    }

    #[test]
    fn test_header_only_is_empty_batch() {
        let input = "Index,DateTime,Latitude,Longitude,Inclination(degrees)\n";
        assert!(matches!(
            decode(input.as_bytes()),
            Err(PipelineError::EmptyBatch)
        ));
    }

    #[test]
    fn test_wrong_header_is_decode_error() {
        let input = "Idx,When,Lat,Lon,Tilt\n0,t0,10.0,20.0,0.5\n";
        assert!(matches!(
            decode(input.as_bytes()),
            Err(PipelineError::Decode(_))
        ));
    }

    #[test]
    fn test_encode_payload_writes_fields_verbatim() {
        let payload = crate::infrastructure::payload::parse_payload(
            br#"{"data":[{"index":0,"dateTime":"t0","latitude":10.5,"longitude":20.25,"inclination":-0.75},{"index":1}]}"#,
        )
        .unwrap();
        let mut buffer = Vec::new();
        encode_payload(&payload, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Index,DateTime,Latitude,Longitude,Inclination(degrees)")
        );
        assert_eq!(lines.next(), Some("0,t0,10.5,20.25,-0.75"));
        assert_eq!(lines.next(), Some("1,,,,"));
    }
}
