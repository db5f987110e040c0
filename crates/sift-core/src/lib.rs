//! Sift Core Library
//!
//! Statement ingestion parser for the sift personal finance tool:
//! - Source readers: workbooks, delimited text, document text fragments
//! - Header detection with alias-based column-role mapping
//! - Date and amount normalization
//! - Field/amount-type resolution (dual-column, typed, bare strategies)
//! - Document line reconstruction and balance-based type inference
//! - Cleanup and validation of the final transaction list
//!
//! Parsing is a pure, synchronous transformation: statement in,
//! transaction list (or typed failure) out. Nothing is persisted and no
//! state is shared across invocations, so statements can be parsed in
//! parallel without coordination.

pub mod amounts;
pub mod balance;
pub mod config;
pub mod dates;
pub mod document;
pub mod error;
pub mod header;
pub mod matrix;
pub mod models;
pub mod pipeline;
pub mod resolve;

pub use amounts::{is_negative_text, normalize_amount, normalize_signed};
pub use balance::infer_kinds;
pub use config::{ParserConfig, RoleAliases};
pub use dates::normalize_date;
pub use document::{
    extract_statement, pages_from_json, reconstruct_lines, reconstruct_text, DocumentPatterns,
    DocumentStatement, StatementLine,
};
pub use error::{Error, Result};
pub use header::{detect_header, HeaderDetection};
pub use matrix::RawMatrix;
pub use models::{
    ColumnMap, ColumnRole, NormalizedTransaction, Page, TextFragment, TransactionKind,
};
pub use pipeline::{parse_document, parse_matrix, parse_with_mapping};
pub use resolve::{resolve_amount, AmountStrategy, ResolvedAmount};
