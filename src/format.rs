//! The canonicalization pipeline.
//!
//! [`format_str`] drives the whole pass: decode every document in the input
//! stream, apply the canonicalization rules in a fixed order, and re-encode
//! with fixed output settings. One malformed document aborts the whole
//! invocation, so multi-document output is all-or-nothing.
//!
//! The rule sequence per document:
//!
//! 1. recursive baseline sort (every mapping alphabetical)
//! 2. rank-sort `metadata`
//! 3. rank-sort `spec`
//! 4. name-sort `spec.params`, `spec.results`, `spec.volumes`,
//!    `spec.workspaces`, `spec.sidecars`, each with its own field table
//! 5. rank-sort `spec.stepTemplate`, name-sort its `env`, drop it when its
//!    `computeResources` is empty
//! 6. per step: rank-sort, canonicalize `script`, drop empty
//!    `computeResources`
//! 7. drop a null `metadata.creationTimestamp`
//! 8. strip scalar quoting tree-wide

use tracing::debug;

use crate::cleanup::{delete_if, unquote};
use crate::emit;
use crate::error::Result;
use crate::node::Node;
use crate::parse;
use crate::rank_table;
use crate::script;
use crate::sort::{ranked_key_sort, sort_by_name, sort_everything, RankTable};

/// Formats a stream of zero or more YAML documents into canonical form.
///
/// # Errors
///
/// Returns [`Error::Decode`](crate::Error::Decode) when any document in the
/// stream is malformed and [`Error::Encode`](crate::Error::Encode) when a
/// canonicalized tree cannot be serialized. No output is produced in either
/// case.
pub fn format_str(input: &str) -> Result<String> {
    let mut documents = parse::parse_documents(input)?;
    for (index, doc) in documents.iter_mut().enumerate() {
        canonicalize(doc);
        debug!(document = index, "document canonicalized");
    }
    let mut out = String::new();
    emit::emit_documents(&documents, &mut out)?;
    Ok(out)
}

/// Applies the full rule sequence to one decoded document, in place.
///
/// Missing structural blocks (`metadata`, `spec`, `spec.steps`, ...) are
/// skipped, so non-Tekton documents pass through with only the baseline
/// sort and quote stripping applied.
pub fn canonicalize(doc: &mut Node) {
    sort_everything(doc);

    if let Some(metadata) = doc.find_mut("metadata") {
        ranked_key_sort(metadata, &metadata_rank());
    }

    if let Some(spec) = doc.find_mut("spec") {
        ranked_key_sort(spec, &spec_rank());

        sort_by_name(spec, "params", &param_rank());
        sort_by_name(spec, "results", &result_rank());
        sort_by_name(spec, "volumes", &volume_rank());
        sort_by_name(spec, "workspaces", &workspace_rank());
        sort_by_name(spec, "sidecars", &sidecar_rank());

        if let Some(step_template) = spec.find_mut("stepTemplate") {
            ranked_key_sort(step_template, &step_template_rank());
            sort_by_name(step_template, "env", &env_rank());
            delete_if(step_template, "computeResources", |n| !n.has_children());
        }

        if let Some(items) = spec.find_mut("steps").and_then(Node::items_mut) {
            for step in items {
                canonicalize_step(step);
            }
        }
    }

    if let Some(metadata) = doc.find_mut("metadata") {
        delete_if(metadata, "creationTimestamp", Node::is_null);
    }

    unquote(doc);
}

fn canonicalize_step(step: &mut Node) {
    ranked_key_sort(step, &step_rank());

    if let Some(scalar) = step.find_mut("script").and_then(Node::as_scalar_mut) {
        if let Some(rendered) = script::canonicalize(&scalar.value) {
            scalar.value = rendered;
            scalar.known_string = true;
        }
    }

    delete_if(step, "computeResources", |n| !n.has_children());
}

fn metadata_rank() -> RankTable {
    rank_table! {
        "name" => 1,
        "annotations" => 2,
        "labels" => 3,
        "creationTimestamp" => 4,
    }
}

fn spec_rank() -> RankTable {
    rank_table! {
        "displayName" => 1,
        "description" => 2,
        "params" => 3,
        "results" => 4,
        "volumes" => 5,
        "workspaces" => 6,
        "sidecars" => 7,
        "stepTemplate" => 8,
        "steps" => 9,
    }
}

fn param_rank() -> RankTable {
    rank_table! {
        "name" => 1,
        "description" => 2,
        "type" => 3,
        "default" => 4,
        "properties" => 5,
        "enum" => 6,
    }
}

fn result_rank() -> RankTable {
    rank_table! {
        "name" => 1,
        "description" => 2,
        "value" => 3,
        "type" => 4,
        "properties" => 5,
    }
}

fn volume_rank() -> RankTable {
    rank_table! {
        "name" => 1,
    }
}

fn workspace_rank() -> RankTable {
    rank_table! {
        "name" => 1,
        "description" => 2,
        "mountPath" => 3,
        "readOnly" => 4,
        "optional" => 5,
    }
}

fn sidecar_rank() -> RankTable {
    rank_table! {
        "name" => 1,
        "image" => 2,
        "command" => 3,
        "args" => 4,
        "workingDir" => 5,
        "ports" => 6,
        "env" => 7,
        "envFrom" => 8,
        "computeResources" => 9,
        "volumeMounts" => 10,
        "volumeDevices" => 11,
        "workspaces" => 12,
        "livenessProbe" => 13,
        "readinessProbe" => 14,
        "startupProbe" => 15,
        "lifecycle" => 16,
        "terminationMessagePath" => 17,
        "terminationMessagePolicy" => 18,
        "imagePullPolicy" => 19,
        "securityContext" => 20,
        "stdin" => 21,
        "stdinOnce" => 22,
        "omitempty" => 23,
        "script" => 24,
    }
}

fn step_template_rank() -> RankTable {
    rank_table! {
        "image" => 1,
        "command" => 2,
        "args" => 3,
        "workingDir" => 4,
        "env" => 5,
        "envFrom" => 6,
        "computeResources" => 7,
        "volumeMounts" => 8,
        "volumeDevices" => 9,
        "imagePullPolicy" => 10,
        "securityContext" => 11,
    }
}

fn env_rank() -> RankTable {
    rank_table! {
        "name" => 1,
        "value" => 2,
        "valueFrom" => 3,
    }
}

fn step_rank() -> RankTable {
    rank_table! {
        "name" => 1,
        "image" => 2,
        "imagePullPolicy" => 3,
        "command" => 4,
        "args" => 5,
        "params" => 6,
        "results" => 7,
        "workingDir" => 8,
        "volumeMounts" => 9,
        "volumeDevices" => 10,
        "workspaces" => 11,
        "envFrom" => 12,
        "env" => 13,
        "script" => 14,
        "computeResources" => 15,
        "securityContext" => 16,
        "timeout" => 17,
        "onError" => 18,
        "stdoutConfig" => 19,
        "stderrConfig" => 20,
        "ref" => 21,
    }
}
