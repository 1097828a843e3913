//! phasegate-interchange: stored record types and deserialization.
//!
//! Rule records are persisted by the pipeline application as JSON with
//! camelCase keys. This crate parses those documents (and field registry
//! documents) into plain record structs. Record fields keep their stored
//! string form; the evaluator converts them to typed values and decides
//! what a malformed value means.

pub mod deserialize;
pub mod types;

pub use deserialize::{parse_condition, parse_fields, parse_rule, parse_rules, InterchangeError};
pub use types::*;
