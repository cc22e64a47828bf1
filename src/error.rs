use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("unreadable CSV header")]
    UnreadableHeader(#[source] csv::Error),
    #[error("missing required column `{column}`")]
    MissingColumn { column: &'static str },
    #[error("row {row}: unreadable CSV record")]
    UnreadableRow {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("row {row}: malformed `{field}` value {value:?}")]
    MalformedField {
        row: usize,
        field: &'static str,
        value: String,
    },
}

impl DataFormatError {
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::UnreadableRow { row, .. } | Self::MalformedField { row, .. } => Some(*row),
            Self::UnreadableHeader(_) | Self::MissingColumn { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("cannot go back: the window already starts at the first period")]
pub struct NavigationBoundaryError;
