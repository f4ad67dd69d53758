//! CSV [`Record`] decoding.

use std::{fmt, str::FromStr};

use axum::extract::Multipart;
use csv::{ReaderBuilder, StringRecord};
use derive_more::{Display, Error};

use crate::{AsError, Error as ApiError};

/// Cursor decoding the fields of a headerless CSV record one by one.
///
/// The first failure is remembered and every following read is skipped,
/// so the decoded values are meaningful only if [`Record::finish()`]
/// succeeds.
#[derive(Debug)]
pub struct Record<'r> {
    /// Record being decoded.
    record: &'r StringRecord,

    /// Zero-based index of the next field.
    column: usize,

    /// First failure, if any.
    error: Option<DecodeError>,
}

impl<'r> Record<'r> {
    /// Starts decoding the provided [`StringRecord`].
    #[must_use]
    pub fn new(record: &'r StringRecord) -> Self {
        Self {
            record,
            column: 0,
            error: None,
        }
    }

    /// Reads the next field as a [`String`].
    pub fn string(&mut self) -> String {
        self.advance().unwrap_or_default().to_owned()
    }

    /// Reads the next field as an integer.
    pub fn int(&mut self) -> i64 {
        self.parse()
    }

    /// Reads the next field as a floating point number.
    pub fn float(&mut self) -> f64 {
        self.parse()
    }

    /// Finishes decoding, returning the first failure, if any.
    ///
    /// # Errors
    ///
    /// If any read field is missing or malformed.
    pub fn finish(self) -> Result<(), DecodeError> {
        self.error.map_or(Ok(()), Err)
    }

    fn advance(&mut self) -> Option<&'r str> {
        if self.error.is_some() {
            return None;
        }
        let field = self.record.get(self.column);
        if field.is_none() {
            self.error = Some(DecodeError::Missing {
                column: self.column,
            });
        }
        self.column += 1;
        field
    }

    fn parse<T>(&mut self) -> T
    where
        T: Default + FromStr<Err: fmt::Display>,
    {
        let column = self.column;
        let Some(field) = self.advance() else {
            return T::default();
        };
        field.parse().unwrap_or_else(|e: T::Err| {
            self.error = Some(DecodeError::Malformed {
                column,
                reason: e.to_string(),
            });
            T::default()
        })
    }
}

/// Error of decoding a [`Record`].
#[derive(Clone, Debug, Display, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// Field is absent.
    #[display("column {column} is missing")]
    Missing {
        /// Zero-based index of the absent field.
        column: usize,
    },

    /// Field cannot be converted.
    #[display("column {column} is malformed: {reason}")]
    Malformed {
        /// Zero-based index of the malformed field.
        column: usize,

        /// Conversion failure.
        reason: String,
    },
}

impl AsError for DecodeError {
    fn try_as_error(&self) -> Option<ApiError> {
        Some(ApiError {
            code: "INVALID_RECORD",
            ..ApiError::bad_request(self)
        })
    }
}

impl AsError for csv::Error {
    fn try_as_error(&self) -> Option<ApiError> {
        Some(ApiError {
            code: "INVALID_CSV",
            ..ApiError::bad_request(self)
        })
    }
}

/// Reads headerless CSV [`StringRecord`]s from the [`Multipart`] field with
/// the provided `name`.
///
/// Returns [`None`] if there is no such field.
///
/// # Errors
///
/// If the request body or the CSV itself is malformed.
pub async fn read(
    mut multipart: Multipart,
    name: &str,
) -> Result<Option<Vec<StringRecord>>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(AsError::into_error)?
    {
        if field.name() != Some(name) {
            continue;
        }
        let bytes = field.bytes().await.map_err(AsError::into_error)?;
        return parse(&bytes).map(Some).map_err(AsError::into_error);
    }
    Ok(None)
}

/// Parses headerless CSV [`StringRecord`]s out of the provided `bytes`.
///
/// Rows may have different lengths, so that a short row is reported by its
/// [`Record`] rather than by the reader.
fn parse(bytes: &[u8]) -> Result<Vec<StringRecord>, csv::Error> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes)
        .into_records()
        .collect()
}

#[cfg(test)]
mod spec {
    use csv::StringRecord;

    use super::{parse, DecodeError, Record};

    #[test]
    fn decodes_fields_in_order() {
        let record = StringRecord::from(vec!["7", "Sofa", "1.5"]);
        let mut rec = Record::new(&record);

        assert_eq!(rec.int(), 7);
        assert_eq!(rec.string(), "Sofa");
        assert!((rec.float() - 1.5).abs() < f64::EPSILON);
        assert_eq!(rec.finish(), Ok(()));
    }

    #[test]
    fn stops_on_first_failure() {
        let record = StringRecord::from(vec!["7", "x", "y"]);
        let mut rec = Record::new(&record);

        assert_eq!(rec.int(), 7);
        assert_eq!(rec.int(), 0);
        assert_eq!(rec.string(), "");
        assert!(matches!(
            rec.finish(),
            Err(DecodeError::Malformed { column: 1, .. }),
        ));
    }

    #[test]
    fn reports_missing_fields() {
        let record = StringRecord::from(vec!["7"]);
        let mut rec = Record::new(&record);

        _ = rec.int();
        _ = rec.string();
        _ = rec.int();

        assert_eq!(rec.finish(), Err(DecodeError::Missing { column: 1 }));
    }

    #[test]
    fn parses_rows_of_different_lengths() {
        let rows = parse(b"1,\"a, b\",3\n2,c\n").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "a, b");
        assert_eq!(rows[1].len(), 2);
    }
}
