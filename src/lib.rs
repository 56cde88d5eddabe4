pub mod digit;
pub mod glyph;
pub mod checksum;
pub mod repair;
pub mod io_stream;

pub use digit::{AccountNumber, Digit, ACCOUNT_LEN, DEFAULT_PLACEHOLDER};
pub use glyph::{DecodeError, GlyphBlock};
pub use checksum::{checksum, is_valid, ChecksumError};
pub use repair::{assess, repair_decoded, repair_illegible, RepairReport, ScanVerdict};
pub use io_stream::{AccountRecord, AccountScanner, RecordStatus, ScanError};
