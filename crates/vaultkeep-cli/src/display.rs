//! Rendering of restore jobs and restorable records for the terminal.
//!
//! `json` emits one object per line for piping back into `--parent` or
//! `--recovery-point`; `card` is a grouped, human-readable block.

use clap::ValueEnum;
use vaultkeep_core::{Advisory, Job, RestorableResource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Card,
}

const LABEL_WIDTH: usize = 18;

fn line(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("  {label:<width$} {value}\n", width = LABEL_WIDTH));
}

pub fn render_resource(
    resource: &RestorableResource,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string(resource),
        OutputFormat::Card => {
            let mut out = format!("── {} ──\n", resource.name);
            line(&mut out, "id", &resource.id);
            line(&mut out, "type", &resource.resource_type);
            line(&mut out, "owner", &resource.owner_id);
            line(&mut out, "owner resource id", &resource.owner_resource_id);
            for (label, value) in [
                ("rid", &resource.rid),
                ("operation", &resource.operation_type),
                ("event time", &resource.event_timestamp),
            ] {
                if let Some(value) = value {
                    line(&mut out, label, value);
                }
            }
            Ok(out)
        }
    }
}

pub fn render_job(
    job: &Job,
    advisories: &[Advisory],
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => {
            let warnings: Vec<String> = advisories.iter().map(ToString::to_string).collect();
            serde_json::to_string(&serde_json::json!({ "job": job, "warnings": warnings }))
        }
        OutputFormat::Card => {
            let mut out = String::from("── restore job ──\n");
            line(&mut out, "status", &job.status.to_string());
            let none = String::from("-");
            line(&mut out, "location", job.location.as_ref().unwrap_or(&none));
            line(
                &mut out,
                "async operation",
                job.async_operation.as_ref().unwrap_or(&none),
            );
            line(&mut out, "request id", job.request_id.as_ref().unwrap_or(&none));
            for advisory in advisories {
                line(&mut out, "warning", &advisory.to_string());
            }
            Ok(out)
        }
    }
}
