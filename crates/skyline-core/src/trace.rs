//! Runtime call traces.
//!
//! Only the span hash codes feed into the layout; timing and parent links are
//! carried so that trace documents round-trip unchanged.

use serde::{Deserialize, Serialize};

/// A recorded trace: the spans observed for one request through the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    #[serde(default)]
    pub span_list: Vec<Span>,
}

impl Trace {
    pub fn new(span_list: Vec<Span>) -> Self {
        Self { span_list }
    }

    /// Iterates over the method hash codes of all spans in this trace.
    pub fn hash_codes(&self) -> impl Iterator<Item = &str> {
        self.span_list.iter().map(|span| span.hash_code.as_str())
    }
}

/// A single method invocation within a trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    /// Span id of the caller; empty for the root span.
    #[serde(default)]
    pub parent_span_id: String,
    /// Hash code of the invoked method.
    pub hash_code: String,
    #[serde(default)]
    pub span_id: String,
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub end_time: u64,
}

impl Span {
    /// Creates a span for the given method hash code with empty ids and zero timing.
    pub fn for_method(hash_code: impl Into<String>) -> Self {
        Self {
            hash_code: hash_code.into(),
            ..Self::default()
        }
    }
}
