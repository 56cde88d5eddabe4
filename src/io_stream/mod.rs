//! Streaming account scanner — fixed-width block reader and report writer.
//!
//! # Reader
//! [`AccountScanner::scan`] pulls consecutive 4-line blocks from any
//! [`BufRead`], shape-checks each through [`GlyphBlock`], and produces one
//! [`AccountRecord`] per block.  Trailing blank lines after the final
//! block are ignored; a malformed block aborts the scan naming the record
//! index.
//!
//! # Writer
//! One block in, one line out:
//!
//! ```text
//! 457508000
//! 664371495 ERR
//! 86110??36 ILL
//! ```
//!
//! With repair enabled, a unique valid candidate prints as the corrected
//! number alone, and several candidates print the raw rendering followed
//! by an `AMB [...]` list.  [`AccountScanner::write_json`] emits the same
//! records as JSON for machine consumption.
//!
//! # Parallelism
//! With the `parallel` feature, blocks are assessed concurrently via
//! Rayon — the core is pure, so records need no coordination and keep
//! input order.  Without the feature the scan is sequential.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use thiserror::Error;

use crate::digit::DEFAULT_PLACEHOLDER;
use crate::glyph::{DecodeError, GlyphBlock, BLOCK_HEIGHT};
use crate::repair::{assess, ScanVerdict};

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// A block that fails shape validation is fatal to the scan; the
    /// index lets the caller locate the offending record.
    #[error("record {record}: {source}")]
    Malformed { record: usize, source: DecodeError },
}

// ── Records ──────────────────────────────────────────────────────────────────

/// Status tag attached to a result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Decoded cleanly, checksum valid.
    Ok,
    /// Legible but checksum-invalid, and no unique repair emerged.
    Err,
    /// Contains illegible digits, and no unique repair emerged.
    Ill,
    /// Repair produced exactly one valid candidate.
    Fixed,
    /// Repair produced several valid candidates.
    Amb,
}

/// One processed account record.
#[derive(Debug, Clone, Serialize)]
pub struct AccountRecord {
    /// 0-based position of the block in the input stream.
    pub index: usize,
    /// The raw decode, illegible positions rendered with the placeholder.
    pub number: String,
    pub status: RecordStatus,
    /// Valid repair candidates in generation order; empty unless the
    /// record needed repair and repair was enabled.
    pub candidates: Vec<String>,
}

impl AccountRecord {
    /// Render the record as its report line.
    pub fn report_line(&self) -> String {
        match self.status {
            RecordStatus::Ok => self.number.clone(),
            RecordStatus::Err => format!("{} ERR", self.number),
            RecordStatus::Ill => format!("{} ILL", self.number),
            RecordStatus::Fixed => self.candidates[0].clone(),
            RecordStatus::Amb => {
                format!("{} AMB [{}]", self.number, self.candidates.join(", "))
            }
        }
    }
}

// ── Scanner ──────────────────────────────────────────────────────────────────

/// Configuration for one scan pass.
#[derive(Debug, Clone)]
pub struct AccountScanner {
    /// Attempt repair of checksum failures and illegible digits.
    pub repair: bool,
    /// Character substituted for illegible digits in renderings.
    pub placeholder: char,
}

impl Default for AccountScanner {
    fn default() -> Self {
        AccountScanner {
            repair: false,
            placeholder: DEFAULT_PLACEHOLDER,
        }
    }
}

impl AccountScanner {
    /// Read every block from `reader` and assess it.
    pub fn scan<R: BufRead>(&self, reader: R) -> Result<Vec<AccountRecord>, ScanError> {
        let blocks = read_blocks(reader)?;
        Ok(self.assess_blocks(&blocks))
    }

    /// One block in, one line out; returns the record count.
    pub fn process<R: BufRead, W: Write>(
        &self,
        reader: R,
        mut writer: W,
    ) -> Result<usize, ScanError> {
        let records = self.scan(reader)?;
        self.write_report(&records, &mut writer)?;
        Ok(records.len())
    }

    pub fn write_report<W: Write>(
        &self,
        records: &[AccountRecord],
        writer: &mut W,
    ) -> io::Result<()> {
        for record in records {
            writeln!(writer, "{}", record.report_line())?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(
        &self,
        records: &[AccountRecord],
        writer: &mut W,
    ) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, records)?;
        writeln!(writer)
    }

    #[cfg(feature = "parallel")]
    fn assess_blocks(&self, blocks: &[GlyphBlock]) -> Vec<AccountRecord> {
        use rayon::prelude::*;
        blocks
            .par_iter()
            .enumerate()
            .map(|(index, block)| self.record(index, block))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn assess_blocks(&self, blocks: &[GlyphBlock]) -> Vec<AccountRecord> {
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| self.record(index, block))
            .collect()
    }

    fn record(&self, index: usize, block: &GlyphBlock) -> AccountRecord {
        let decoded = block.decode();
        let number = decoded.render(self.placeholder);

        if decoded.is_legible() && decoded.is_valid() {
            return AccountRecord {
                index,
                number,
                status: RecordStatus::Ok,
                candidates: Vec::new(),
            };
        }

        let failure = if decoded.is_legible() {
            RecordStatus::Err
        } else {
            RecordStatus::Ill
        };
        if !self.repair {
            return AccountRecord {
                index,
                number,
                status: failure,
                candidates: Vec::new(),
            };
        }

        let report = assess(block);
        let status = match report.verdict {
            ScanVerdict::Valid => RecordStatus::Ok,
            ScanVerdict::Repaired => RecordStatus::Fixed,
            ScanVerdict::Ambiguous => RecordStatus::Amb,
            ScanVerdict::Unreadable => failure,
        };
        AccountRecord {
            index,
            number,
            status,
            candidates: report
                .candidates
                .iter()
                .map(|c| c.render(self.placeholder))
                .collect(),
        }
    }
}

/// Split the stream into consecutive 4-line blocks.  Trailing blank lines
/// after the last complete block are tolerated.
fn read_blocks<R: BufRead>(reader: R) -> Result<Vec<GlyphBlock>, ScanError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }
    while lines.len() % BLOCK_HEIGHT != 0
        && lines.last().map_or(false, |l| l.trim().is_empty())
    {
        lines.pop();
    }

    let mut blocks = Vec::with_capacity(lines.len() / BLOCK_HEIGHT);
    for (record, chunk) in lines.chunks(BLOCK_HEIGHT).enumerate() {
        let rows: Vec<&str> = chunk.iter().map(String::as_str).collect();
        let block = GlyphBlock::from_rows(&rows)
            .map_err(|source| ScanError::Malformed { record, source })?;
        blocks.push(block);
    }
    Ok(blocks)
}
