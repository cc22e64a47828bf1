use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::DataFormatError;

use super::record::{Record, TopicId};

const COLUMN_TOPIC: &str = "Topic";
const COLUMN_TIMESTAMP: &str = "Timestamp";
const COLUMN_FREQUENCY: &str = "Frequency";
const COLUMN_SENTIMENT: &str = "comment_sentiment";
const COLUMN_WORDS: &str = "Words";

struct ColumnIndices {
    topic: usize,
    timestamp: usize,
    frequency: usize,
    sentiment: usize,
    words: usize,
}

impl ColumnIndices {
    fn from_headers(headers: &StringRecord) -> Result<Self, DataFormatError> {
        let find = |column: &'static str| {
            headers
                .iter()
                .position(|header| header == column)
                .ok_or(DataFormatError::MissingColumn { column })
        };

        Ok(Self {
            topic: find(COLUMN_TOPIC)?,
            timestamp: find(COLUMN_TIMESTAMP)?,
            frequency: find(COLUMN_FREQUENCY)?,
            sentiment: find(COLUMN_SENTIMENT)?,
            words: find(COLUMN_WORDS)?,
        })
    }

    fn record(&self, raw: &StringRecord, row: usize) -> Result<Record, DataFormatError> {
        let frequency = parse_number(raw, self.frequency, row, COLUMN_FREQUENCY)?;
        if frequency < 0.0 {
            return Err(malformed(raw, self.frequency, row, COLUMN_FREQUENCY));
        }

        Ok(Record {
            topic: parse_topic(raw, self.topic, row)?,
            timestamp: field(raw, self.timestamp).to_string(),
            frequency,
            sentiment: parse_number(raw, self.sentiment, row, COLUMN_SENTIMENT)?,
            words: field(raw, self.words).to_string(),
        })
    }
}

fn field(raw: &StringRecord, index: usize) -> &str {
    raw.get(index).unwrap_or_default()
}

fn malformed(raw: &StringRecord, index: usize, row: usize, name: &'static str) -> DataFormatError {
    DataFormatError::MalformedField {
        row,
        field: name,
        value: field(raw, index).to_string(),
    }
}

fn parse_topic(raw: &StringRecord, index: usize, row: usize) -> Result<TopicId, DataFormatError> {
    field(raw, index)
        .parse::<TopicId>()
        .map_err(|_| malformed(raw, index, row, COLUMN_TOPIC))
}

fn parse_number(
    raw: &StringRecord,
    index: usize,
    row: usize,
    name: &'static str,
) -> Result<f64, DataFormatError> {
    field(raw, index)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| malformed(raw, index, row, name))
}

/// Parses a topics-over-time CSV table. Any malformed row fails the whole
/// table; rows are numbered from 1, excluding the header.
pub fn parse_records(raw: &str) -> Result<Vec<Record>, DataFormatError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader
        .headers()
        .map_err(DataFormatError::UnreadableHeader)?
        .clone();
    let columns = ColumnIndices::from_headers(&headers)?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        let raw_row = result.map_err(|source| DataFormatError::UnreadableRow { row, source })?;
        records.push(columns.record(&raw_row, row)?);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Topic,Words,Frequency,Timestamp,comment_sentiment\n";

    #[test]
    fn parses_rows_in_source_order() {
        let raw = format!(
            "{HEADER}3,\"election, vote\",12,2022-01,0.25\n-1,misc,0,2022-02, -0.5 \n"
        );

        let records = parse_records(&raw).expect("valid table");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].topic, 3);
        assert_eq!(records[0].words, "election, vote");
        assert_eq!(records[0].frequency, 12.0);
        assert_eq!(records[0].timestamp, "2022-01");
        assert_eq!(records[1].topic, -1);
        assert_eq!(records[1].sentiment, -0.5);
    }

    #[test]
    fn ignores_extra_columns() {
        let raw = "Name,Topic,Timestamp,Frequency,comment_sentiment,Words,Extra\n\
                   x,1,Jan,4.5,0.1,words,y\n";

        let records = parse_records(raw).expect("valid table");
        assert_eq!(records[0].frequency, 4.5);
    }

    #[test]
    fn header_only_table_is_empty() {
        let records = parse_records(HEADER).expect("valid table");
        assert!(records.is_empty());
    }

    #[test]
    fn missing_column_is_named() {
        let raw = "Topic,Timestamp,Frequency,Words\n1,Jan,2,w\n";

        let error = parse_records(raw).expect_err("no sentiment column");
        assert!(matches!(
            error,
            DataFormatError::MissingColumn {
                column: "comment_sentiment"
            }
        ));
    }

    #[test]
    fn malformed_number_names_field_and_row() {
        let raw = format!("{HEADER}1,w,2,Jan,0.1\n2,w,lots,Jan,0.2\n");

        let error = parse_records(&raw).expect_err("bad frequency");
        match error {
            DataFormatError::MalformedField { row, field, value } => {
                assert_eq!(row, 2);
                assert_eq!(field, "Frequency");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_finite_and_negative_values() {
        for bad in ["1,w,NaN,Jan,0.1", "1,w,-3,Jan,0.1", "1,w,2,Jan,inf", "1.5,w,2,Jan,0"] {
            let raw = format!("{HEADER}{bad}\n");
            let error = parse_records(&raw).expect_err(bad);
            assert_eq!(error.row(), Some(1), "{bad}");
        }
    }

    #[test]
    fn short_row_is_unreadable() {
        let raw = format!("{HEADER}1,w,2,Jan,0.1\n1,w,2\n");

        let error = parse_records(&raw).expect_err("missing fields");
        assert!(matches!(error, DataFormatError::UnreadableRow { row: 2, .. }));
    }
}
