use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;

use anyhow::{anyhow, bail};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::function_handle::FunctionHandle;
use crate::Dict;

const MAP_HANDLE_KEY: &str = "map_function_handle";
const REDUCE_HANDLE_KEY: &str = "reduce_function_handle";
const GUID_KEY: &str = "guid";

/// Identifier distinguishing one job from all others.
///
/// Minted identifiers are v4 UUIDs; identifiers supplied by the caller are
/// carried verbatim, whatever their shape. Keeping them unique across a
/// registry is the caller's concern, the job only carries the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobGuid(String);

impl JobGuid {
    /// Mint a fresh globally-unique identifier.
    ///
    /// A new value is generated on every call, so two jobs constructed
    /// without explicit identifiers never collide.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobGuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobGuid {
    fn from(guid: String) -> Self {
        Self(guid)
    }
}

impl From<&str> for JobGuid {
    fn from(guid: &str) -> Self {
        Self(guid.to_owned())
    }
}

/// A unit of analysis work: a map function and a reduce function paired
/// under a unique identifier.
///
/// Jobs are read-only once constructed. They hold shared references to
/// their handles; ownership of the handles stays with the caller.
#[derive(Debug, Clone)]
pub struct Job<H> {
    /// Handle of the map function.
    map_function_handle: Arc<H>,

    /// Handle of the reduce function.
    reduce_function_handle: Arc<H>,

    /// Unique identifier of this job.
    guid: JobGuid,
}

impl<H: FunctionHandle> Job<H> {
    /// Construct a job under a freshly minted identifier.
    ///
    /// The identifier is generated inside this call, never shared between
    /// constructions.
    pub fn new(map_function_handle: Arc<H>, reduce_function_handle: Arc<H>) -> Self {
        Self::with_guid(map_function_handle, reduce_function_handle, JobGuid::new())
    }

    /// Construct a job under a caller-supplied identifier.
    pub fn with_guid(
        map_function_handle: Arc<H>,
        reduce_function_handle: Arc<H>,
        guid: JobGuid,
    ) -> Self {
        Self {
            map_function_handle,
            reduce_function_handle,
            guid,
        }
    }

    /// Get the identifier of this job.
    pub fn guid(&self) -> &JobGuid {
        &self.guid
    }

    /// Get the handle of the map function.
    ///
    /// This method is cheap, the handle sits behind an [`Arc`].
    #[inline]
    pub fn map_function_handle(&self) -> Arc<H> {
        Arc::clone(&self.map_function_handle)
    }

    /// Get the handle of the reduce function.
    ///
    /// This method is cheap, the handle sits behind an [`Arc`].
    #[inline]
    pub fn reduce_function_handle(&self) -> Arc<H> {
        Arc::clone(&self.reduce_function_handle)
    }

    /// Encode this job into its plain key-value form.
    ///
    /// The result carries exactly three keys: the two encoded handles and
    /// the identifier rendered as a string.
    pub fn as_dict(&self) -> Dict {
        let mut dict = Dict::new();
        dict.insert(
            MAP_HANDLE_KEY.to_owned(),
            Value::Object(self.map_function_handle.as_dict()),
        );
        dict.insert(
            REDUCE_HANDLE_KEY.to_owned(),
            Value::Object(self.reduce_function_handle.as_dict()),
        );
        dict.insert(GUID_KEY.to_owned(), Value::String(self.guid.to_string()));
        dict
    }

    /// Decode a job from its plain key-value form.
    ///
    /// Both handle entries must be present and decodable, otherwise the
    /// whole decode fails and the error propagates to the caller. A job
    /// encoded by [`Job::as_dict`] decodes back to an equivalent job,
    /// identifier included; a dict without a `guid` entry gets a fresh one.
    pub fn from_dict(dict: &Dict) -> anyhow::Result<Self> {
        let map_function_handle = decode_handle(dict, MAP_HANDLE_KEY)?;
        let reduce_function_handle = decode_handle(dict, REDUCE_HANDLE_KEY)?;

        let guid = match dict.get(GUID_KEY) {
            Some(Value::String(guid)) => JobGuid::from(guid.as_str()),
            Some(_) => bail!("job `{GUID_KEY}` must be a string"),
            None => {
                let guid = JobGuid::new();
                debug!("job dict carries no guid, minted {guid}");
                guid
            }
        };

        Ok(Self::with_guid(
            Arc::new(map_function_handle),
            Arc::new(reduce_function_handle),
            guid,
        ))
    }
}

/// Look up a handle entry in a job dict and decode it.
fn decode_handle<H: FunctionHandle>(dict: &Dict, key: &str) -> anyhow::Result<H> {
    let value = dict
        .get(key)
        .ok_or_else(|| anyhow!("job dict is missing `{key}`"))?;

    let handle_dict = value
        .as_object()
        .ok_or_else(|| anyhow!("job `{key}` must be an object"))?;

    H::from_dict(handle_dict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function_handle::ScriptHandle;

    fn map_handle() -> Arc<ScriptHandle> {
        Arc::new(ScriptHandle::new("mapper.py", "Map"))
    }

    fn reduce_handle() -> Arc<ScriptHandle> {
        Arc::new(ScriptHandle::new("reducer.py", "Reduce"))
    }

    #[test]
    fn accessors_return_the_construction_handles() {
        let (m, r) = (map_handle(), reduce_handle());
        let job = Job::new(Arc::clone(&m), Arc::clone(&r));

        assert_eq!(job.map_function_handle(), m);
        assert_eq!(job.reduce_function_handle(), r);
    }

    #[test]
    fn default_guids_are_unique() {
        let first = Job::new(map_handle(), reduce_handle());
        let second = Job::new(map_handle(), reduce_handle());

        assert_ne!(first.guid(), second.guid());
    }

    #[test]
    fn explicit_guid_is_kept() {
        let guid = JobGuid::from("1234-uuid");
        let job = Job::with_guid(map_handle(), reduce_handle(), guid.clone());

        assert_eq!(job.guid(), &guid);
    }

    #[test]
    fn as_dict_has_exactly_the_wire_keys() {
        let job = Job::with_guid(map_handle(), reduce_handle(), JobGuid::from("1234-uuid"));
        let dict = job.as_dict();

        assert_eq!(dict.len(), 3);
        assert_eq!(
            dict["map_function_handle"],
            Value::Object(map_handle().as_dict())
        );
        assert_eq!(
            dict["reduce_function_handle"],
            Value::Object(reduce_handle().as_dict())
        );
        assert_eq!(dict["guid"], Value::String("1234-uuid".to_owned()));
    }

    #[test]
    fn encode_decode_round_trips() {
        let job = Job::with_guid(map_handle(), reduce_handle(), JobGuid::from("1234-uuid"));
        let decoded = Job::<ScriptHandle>::from_dict(&job.as_dict()).unwrap();

        assert_eq!(decoded.map_function_handle(), map_handle());
        assert_eq!(decoded.reduce_function_handle(), reduce_handle());
        assert_eq!(decoded.guid(), job.guid());
    }

    #[test]
    fn re_encoding_a_decoded_job_is_lossless() {
        let dict =
            Job::with_guid(map_handle(), reduce_handle(), JobGuid::from("1234-uuid")).as_dict();
        let re_encoded = Job::<ScriptHandle>::from_dict(&dict).unwrap().as_dict();

        assert_eq!(re_encoded, dict);
    }

    #[test]
    fn decode_without_guid_mints_a_fresh_one() {
        let mut dict = Job::new(map_handle(), reduce_handle()).as_dict();
        dict.remove("guid");

        let first = Job::<ScriptHandle>::from_dict(&dict).unwrap();
        let second = Job::<ScriptHandle>::from_dict(&dict).unwrap();

        assert_ne!(first.guid(), second.guid());
    }

    #[test]
    fn decode_rejects_missing_map_handle() {
        let mut dict = Job::new(map_handle(), reduce_handle()).as_dict();
        dict.remove("map_function_handle");

        assert!(Job::<ScriptHandle>::from_dict(&dict).is_err());
    }

    #[test]
    fn decode_rejects_missing_reduce_handle() {
        let mut dict = Job::new(map_handle(), reduce_handle()).as_dict();
        dict.remove("reduce_function_handle");

        assert!(Job::<ScriptHandle>::from_dict(&dict).is_err());
    }

    #[test]
    fn decode_rejects_non_object_handle() {
        let mut dict = Job::new(map_handle(), reduce_handle()).as_dict();
        dict.insert(
            "map_function_handle".to_owned(),
            Value::String("mapper.py:Map".to_owned()),
        );

        assert!(Job::<ScriptHandle>::from_dict(&dict).is_err());
    }

    #[test]
    fn decode_rejects_non_string_guid() {
        let mut dict = Job::new(map_handle(), reduce_handle()).as_dict();
        dict.insert("guid".to_owned(), Value::Number(1234.into()));

        assert!(Job::<ScriptHandle>::from_dict(&dict).is_err());
    }

    #[test]
    fn nested_handle_errors_propagate() {
        let mut dict = Job::new(map_handle(), reduce_handle()).as_dict();
        let mut bad_handle = Dict::new();
        bad_handle.insert("filename".to_owned(), Value::String("mapper.py".to_owned()));
        dict.insert("map_function_handle".to_owned(), Value::Object(bad_handle));

        assert!(Job::<ScriptHandle>::from_dict(&dict).is_err());
    }
}
