use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use serde_json::Value;
use tracing::info;

use common::function_handle::ScriptHandle;
use common::job::{Job, JobGuid};

/// Build a descriptor from the given functions and write it out.
pub fn create(
    map: String,
    reduce: String,
    guid: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let map: ScriptHandle = map.parse().context("bad --map argument")?;
    let reduce: ScriptHandle = reduce.parse().context("bad --reduce argument")?;

    let job = match guid {
        Some(guid) => Job::with_guid(Arc::new(map), Arc::new(reduce), JobGuid::from(guid)),
        None => Job::new(Arc::new(map), Arc::new(reduce)),
    };

    let rendered = serde_json::to_string_pretty(&job.as_dict())?;

    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("could not write {}", path.display()))?;
            info!("wrote job {} to {}", job.guid(), path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Print a descriptor file in human readable form.
pub fn inspect(file: &Path) -> anyhow::Result<()> {
    let job = load(file)?;

    println!("[Job {}]", job.guid());
    println!("map:    {}", job.map_function_handle());
    println!("reduce: {}", job.reduce_function_handle());

    Ok(())
}

/// Decode a descriptor file, failing loudly when it is malformed.
pub fn validate(file: &Path) -> anyhow::Result<()> {
    let job = load(file)?;
    println!("ok: job {} decodes cleanly", job.guid());

    Ok(())
}

/// Read and decode a job descriptor file.
fn load(file: &Path) -> anyhow::Result<Job<ScriptHandle>> {
    let raw = fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;

    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;

    let dict = value
        .as_object()
        .ok_or_else(|| anyhow!("{} does not hold a JSON object", file.display()))?;

    Job::from_dict(dict)
}
