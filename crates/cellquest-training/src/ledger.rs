//! Ranked history of episode outcomes.
//!
//! A ledger is an ordered list of records where position 0 (the head) is the best
//! record seen so far. Records are compared by [`LedgerRecord::key`]; higher is better.
//!
//! On disk a ledger is newline-delimited text, one comma-joined numeric row per record,
//! head first:
//!
//! ```text
//! 412,3,1,10
//! 97,1,1,1
//! ```
//!
//! # Insertion
//!
//! - [`Ledger::offer`] inserts a record at the head only if it beats the current head
//!   (or the ledger is empty) and otherwise leaves the ledger untouched. This is what the
//!   learning step uses.
//! - [`Ledger::record`] inserts at the head when better and appends otherwise, keeping a
//!   full history of results up to the capacity. The arena never calls it. It is for
//!   embedders that drive their own training loop and want every result ranked.
//!
//! Both keep at most [`Ledger::capacity`] records. When the cap is exceeded the
//! lowest-keyed record other than the head is dropped, so the head always survives.

use std::{fmt::Write as _, num::ParseFloatError};

use cellquest_engine::{FactionSettings, GlobalParams, ParamsError};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LedgerRowError {
    #[display("invalid number {field:?} in ledger row")]
    InvalidNumber {
        field: String,
        source: ParseFloatError,
    },
    #[display("ledger row has {actual} fields, expected {expected}")]
    FieldCount { expected: usize, actual: usize },
    #[display("invalid parameter row")]
    #[from]
    Params(ParamsError),
}

/// A value that can be ranked and stored as a ledger row.
pub trait LedgerRecord: Sized {
    /// Ranking key. Higher is better.
    fn key(&self) -> f64;

    fn to_row(&self) -> String;

    fn parse_row(row: &str) -> Result<Self, LedgerRowError>;
}

fn parse_numbers(row: &str) -> Result<Vec<f64>, LedgerRowError> {
    row.split(',')
        .map(|field| {
            let field = field.trim();
            field
                .parse::<f64>()
                .map_err(|source| LedgerRowError::InvalidNumber {
                    field: field.to_owned(),
                    source,
                })
        })
        .collect()
}

fn join_numbers(values: impl IntoIterator<Item = f64>) -> String {
    let mut row = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            row.push(',');
        }
        write!(&mut row, "{value}").unwrap();
    }
    row
}

/// One faction's result: live cells at episode end and the settings it played with.
///
/// Row shape: `count,aggression,defense,mobility`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactionRecord {
    pub count: u64,
    pub settings: FactionSettings,
}

impl LedgerRecord for FactionRecord {
    fn key(&self) -> f64 {
        #[expect(clippy::cast_precision_loss)]
        let key = self.count as f64;
        key
    }

    fn to_row(&self) -> String {
        let [aggression, defense, mobility] = self.settings.to_array();
        format!("{},{}", self.count, join_numbers([aggression, defense, mobility]))
    }

    fn parse_row(row: &str) -> Result<Self, LedgerRowError> {
        let values = parse_numbers(row)?;
        let [count, aggression, defense, mobility] = values[..] else {
            return Err(LedgerRowError::FieldCount {
                expected: 4,
                actual: values.len(),
            });
        };
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = count.max(0.0) as u64;
        Ok(Self {
            count,
            settings: FactionSettings::new(aggression, defense, mobility),
        })
    }
}

/// A global parameter vector whose index 0 holds the episode length it achieved.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamsRecord(pub GlobalParams);

impl LedgerRecord for ParamsRecord {
    fn key(&self) -> f64 {
        self.0.episode_length()
    }

    fn to_row(&self) -> String {
        join_numbers(self.0.as_slice().iter().copied())
    }

    fn parse_row(row: &str) -> Result<Self, LedgerRowError> {
        Ok(Self(GlobalParams::new(parse_numbers(row)?)?))
    }
}

/// Where [`Ledger::record`] put a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The record became the new head.
    Head,
    /// The record was appended behind the head.
    Kept,
    /// The record was appended and immediately evicted by the capacity cap.
    Dropped,
}

/// Capped, head-is-best list of records.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger<R> {
    records: Vec<R>,
    capacity: usize,
}

impl<R> Ledger<R>
where
    R: LedgerRecord,
{
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates an empty ledger. A zero capacity is raised to one so the head is kept.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Decodes ledger text, skipping rows that fail to parse.
    #[must_use]
    pub fn parse(text: &str, capacity: usize) -> Self {
        let mut ledger = Self::new(capacity);
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match R::parse_row(line) {
                Ok(record) => ledger.records.push(record),
                Err(error) => {
                    tracing::warn!(line = line_no + 1, %error, "skipping malformed ledger row");
                }
            }
        }
        ledger.enforce_capacity();
        ledger
    }

    /// Encodes the ledger as newline-terminated rows, head first.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for record in &self.records {
            text.push_str(&record.to_row());
            text.push('\n');
        }
        text
    }

    #[must_use]
    pub fn head(&self) -> Option<&R> {
        self.records.first()
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn beats_head(&self, record: &R) -> bool {
        self.head().is_none_or(|head| record.key() > head.key())
    }

    /// Makes `record` the new head if it strictly beats the current one.
    ///
    /// Returns whether the ledger changed.
    pub fn offer(&mut self, record: R) -> bool {
        if !self.beats_head(&record) {
            return false;
        }
        self.records.insert(0, record);
        self.enforce_capacity();
        true
    }

    /// Stores `record`, at the head if it strictly beats it and at the tail otherwise.
    pub fn record(&mut self, record: R) -> Placement {
        if self.beats_head(&record) {
            self.records.insert(0, record);
            self.enforce_capacity();
            return Placement::Head;
        }
        self.records.push(record);
        let appended = self.records.len() - 1;
        match self.evict_lowest() {
            Some(evicted) if evicted == appended => Placement::Dropped,
            _ => Placement::Kept,
        }
    }

    fn enforce_capacity(&mut self) {
        while self.records.len() > self.capacity {
            self.evict_lowest();
        }
    }

    /// Removes the lowest-keyed non-head record if over capacity, returning its old index.
    fn evict_lowest(&mut self) -> Option<usize> {
        if self.records.len() <= self.capacity {
            return None;
        }
        // the last of equal minimums goes first, so older rows outlive newer ones
        let index = self
            .records
            .iter()
            .enumerate()
            .skip(1)
            .min_by(|(ia, a), (ib, b)| a.key().total_cmp(&b.key()).then(ib.cmp(ia)))
            .map(|(i, _)| i)?;
        self.records.remove(index);
        Some(index)
    }
}

impl<R> Default for Ledger<R>
where
    R: LedgerRecord,
{
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faction(count: u64) -> FactionRecord {
        FactionRecord {
            count,
            settings: FactionSettings::UNIT,
        }
    }

    fn counts(ledger: &Ledger<FactionRecord>) -> Vec<u64> {
        ledger.records().iter().map(|r| r.count).collect()
    }

    #[test]
    fn test_faction_row() {
        let record = FactionRecord {
            count: 412,
            settings: FactionSettings::new(3.0, 1.0, 2.5),
        };
        assert_eq!(record.to_row(), "412,3,1,2.5");
        assert_eq!(FactionRecord::parse_row("412, 3, 1, 2.5").unwrap(), record);
        assert!(matches!(
            FactionRecord::parse_row("1,2,3"),
            Err(LedgerRowError::FieldCount {
                expected: 4,
                actual: 3
            })
        ));
        assert!(matches!(
            FactionRecord::parse_row("1,x,3,4"),
            Err(LedgerRowError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_params_row() {
        let params = GlobalParams::fallback();
        let record = ParamsRecord(params.clone());
        assert_eq!(
            record.to_row(),
            "1,5486,3474,120,0.1,3,17,20,20,2550,1,1,1,1"
        );
        assert_eq!(ParamsRecord::parse_row(&record.to_row()).unwrap(), record);
        assert!(matches!(
            ParamsRecord::parse_row("1,2,3,4,5"),
            Err(LedgerRowError::Params(_))
        ));
    }

    #[test]
    fn test_offer_is_head_or_nothing() {
        let mut ledger = Ledger::new(8);
        assert!(ledger.offer(faction(10)));
        assert!(!ledger.offer(faction(10)));
        assert!(!ledger.offer(faction(3)));
        assert!(ledger.offer(faction(11)));
        assert_eq!(counts(&ledger), [11, 10]);
    }

    #[test]
    fn test_record_keeps_history() {
        let mut ledger = Ledger::new(8);
        assert_eq!(ledger.record(faction(10)), Placement::Head);
        assert_eq!(ledger.record(faction(4)), Placement::Kept);
        assert_eq!(ledger.record(faction(12)), Placement::Head);
        assert_eq!(ledger.record(faction(12)), Placement::Kept);
        assert_eq!(counts(&ledger), [12, 10, 4, 12]);
    }

    #[test]
    fn test_capacity_drops_lowest_non_head() {
        let mut ledger = Ledger::new(3);
        ledger.record(faction(5));
        ledger.record(faction(1));
        ledger.record(faction(3));
        assert_eq!(ledger.record(faction(2)), Placement::Kept);
        assert_eq!(counts(&ledger), [5, 3, 2]);
        assert_eq!(ledger.record(faction(0)), Placement::Dropped);
        assert_eq!(counts(&ledger), [5, 3, 2]);

        // a new head pushes out the weakest tail entry, never the old head
        assert!(ledger.offer(faction(9)));
        assert_eq!(counts(&ledger), [9, 5, 3]);
    }

    #[test]
    fn test_head_survives_capacity_of_one() {
        let mut ledger = Ledger::new(0);
        assert_eq!(ledger.capacity(), 1);
        ledger.record(faction(7));
        assert_eq!(ledger.record(faction(100)), Placement::Head);
        assert_eq!(ledger.record(faction(1)), Placement::Dropped);
        assert_eq!(counts(&ledger), [100]);
    }

    #[test]
    fn test_parse_skips_bad_rows() {
        let text = "12,1,1,1\n\nnot,a,row,!\n7,2,2,2\n1,2\n";
        let ledger = Ledger::<FactionRecord>::parse(text, 16);
        assert_eq!(counts(&ledger), [12, 7]);
        assert_eq!(ledger.to_text(), "12,1,1,1\n7,2,2,2\n");
    }

    #[test]
    fn test_parse_respects_capacity() {
        let text = "9,1,1,1\n1,1,1,1\n5,1,1,1\n";
        let ledger = Ledger::<FactionRecord>::parse(text, 2);
        assert_eq!(counts(&ledger), [9, 5]);
    }
}
