use std::fmt;
use std::fmt::Formatter;
use std::str::FromStr;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Dict;

/// A reference to an analysis function that the pipeline can serialize
/// and ship around.
///
/// A [`crate::Job`] only ever delegates to these two operations. What a
/// handle holds inside, and how it eventually resolves into something
/// callable, is none of the job's business. That keeps handle kinds free
/// to evolve on their own (script-based today, built-ins tomorrow).
pub trait FunctionHandle: Sized {
    /// Encode this handle into its plain key-value form.
    fn as_dict(&self) -> Dict;

    /// Decode a handle from its plain key-value form.
    ///
    /// Fails on malformed input; the error propagates to the caller.
    fn from_dict(dict: &Dict) -> anyhow::Result<Self>;
}

/// A handle pointing at a named function inside an analysis script,
/// written `mapper.py:Map` on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptHandle {
    /// Path of the script defining the function.
    pub filename: String,

    /// Name of the entry point inside the script.
    pub function_name: String,
}

impl ScriptHandle {
    /// Construct a new handle from the given script path and entry point.
    pub fn new(filename: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            function_name: function_name.into(),
        }
    }
}

impl fmt::Display for ScriptHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.filename, self.function_name)
    }
}

impl FromStr for ScriptHandle {
    type Err = anyhow::Error;

    /// Parse the `<script>:<function>` command line form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((filename, function_name)) = s.rsplit_once(':') else {
            bail!("expected `<script>:<function>`, got `{s}`");
        };

        if filename.is_empty() || function_name.is_empty() {
            bail!("expected `<script>:<function>`, got `{s}`");
        }

        Ok(Self::new(filename, function_name))
    }
}

impl FunctionHandle for ScriptHandle {
    fn as_dict(&self) -> Dict {
        let mut dict = Dict::new();
        dict.insert("filename".to_owned(), Value::String(self.filename.clone()));
        dict.insert(
            "function_name".to_owned(),
            Value::String(self.function_name.clone()),
        );
        dict
    }

    fn from_dict(dict: &Dict) -> anyhow::Result<Self> {
        serde_json::from_value(Value::Object(dict.clone()))
            .context("malformed script handle dict")
    }
}
