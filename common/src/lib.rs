//! Descriptor types for a map-reduce analysis pipeline. Users describe a
//! unit of work as a pair of function handles (one map, one reduce) under
//! a unique identifier, and ship it around as a plain key-value record.
//! The machinery that schedules the work and resolves handles into
//! callables lives elsewhere.

pub mod function_handle;
pub mod job;

pub use function_handle::{FunctionHandle, ScriptHandle};
pub use job::{Job, JobGuid};

/////////////////////////////////////////////////////////////////////////////
// Plain key-value representation
/////////////////////////////////////////////////////////////////////////////

/// The plain key-value form that descriptors encode to and decode from.
///
/// A JSON object under the hood, so anything that speaks [`serde_json`]
/// can carry a descriptor.
pub type Dict = serde_json::Map<String, serde_json::Value>;
