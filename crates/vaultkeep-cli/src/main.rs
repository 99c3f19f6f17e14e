mod config;
mod display;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use vaultkeep_core::{RecoveryPoint, RecoveryPointPath, RestorableResource, RestoreOptions};
use vaultkeep_plane::{ContainerQuery, Enumerator, HttpPlane, Restorables, RestoreService};

use crate::config::{ACCESS_TOKEN_ENV, FileConfig, Overrides, Settings};
use crate::display::{OutputFormat, render_job, render_resource};

#[derive(Parser)]
#[command(name = "vaultkeep", version, about = "Restore VM disks and list restorable resources")]
struct Cli {
    /// JSON config file; defaults to ./vaultkeep.json when present.
    #[arg(long, env = "VAULTKEEP_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[arg(long, env = "VAULTKEEP_ENDPOINT", global = true)]
    endpoint: Option<String>,

    #[arg(long, env = "VAULTKEEP_SUBSCRIPTION_ID", global = true)]
    subscription_id: Option<String>,

    /// Abandon management-plane calls after this many seconds.
    #[arg(long, env = "VAULTKEEP_TIMEOUT_SECS", global = true)]
    timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Restore the disks of a VM recovery point into a storage account.
    RestoreDisks(RestoreDisksArgs),
    /// List restorable SQL databases of a database account.
    RestorableDatabases {
        #[arg(long)]
        location: String,
        #[arg(long)]
        instance_id: String,
    },
    /// List restorable SQL containers of a database.
    RestorableContainers(RestorableContainersArgs),
}

#[derive(Args)]
struct RestoreDisksArgs {
    /// JSON file holding the recovery point.
    #[arg(long)]
    recovery_point: PathBuf,
    #[arg(long)]
    storage_account_id: String,
    #[arg(long)]
    storage_account_location: String,
    #[arg(long, default_value = "Microsoft.Storage/storageAccounts")]
    storage_account_type: String,
    #[arg(long)]
    target_resource_group: Option<String>,
    #[arg(long)]
    use_original_storage_account: bool,
    #[arg(long, env = "VAULTKEEP_VAULT_NAME")]
    vault_name: Option<String>,
    #[arg(long, env = "VAULTKEEP_RESOURCE_GROUP")]
    resource_group: Option<String>,
    #[arg(long, env = "VAULTKEEP_VAULT_LOCATION")]
    vault_location: Option<String>,
}

#[derive(Args)]
struct RestorableContainersArgs {
    /// JSON file holding a restorable database record.
    #[arg(long, conflicts_with_all = ["location", "instance_id", "database_rid"])]
    parent: Option<PathBuf>,
    #[arg(long, required_unless_present = "parent")]
    location: Option<String>,
    #[arg(long, required_unless_present = "parent")]
    instance_id: Option<String>,
    #[arg(long, required_unless_present = "parent")]
    database_rid: Option<String>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Token that fires on Ctrl-C so in-flight calls report cancellation.
fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            trigger.cancel();
        }
    });
    token
}

fn print_all(records: Restorables, format: OutputFormat) -> anyhow::Result<usize> {
    let mut count = 0;
    for record in records {
        println!("{}", render_resource(&record, format)?);
        count += 1;
    }
    Ok(count)
}

async fn restore_disks(
    settings: &Settings,
    args: RestoreDisksArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let rp: RecoveryPoint = read_json(&args.recovery_point)?;
    let path = RecoveryPointPath::parse(&rp.id).context("recovery point id")?;
    let context = settings.vault_context(&path, args.vault_location.as_deref())?;

    let plane = HttpPlane::new(settings.plane.clone()).context("building HTTP client")?;
    let mut service = RestoreService::new(plane, context);
    if let Some(timeout) = settings.timeout() {
        service = service.with_timeout(timeout);
    }

    let opts = RestoreOptions {
        storage_account_id: args.storage_account_id,
        storage_account_location: args.storage_account_location,
        storage_account_type: args.storage_account_type,
        target_resource_group_name: args.target_resource_group,
        use_original_storage_account: args.use_original_storage_account,
        vault_name: args.vault_name,
        resource_group_name: args.resource_group,
        vault_location: args.vault_location,
    };
    let outcome = service
        .restore_disks(&rp, &opts, &ctrl_c_token())
        .await
        .context("restore failed")?;
    println!("{}", render_job(&outcome.job, &outcome.advisories, format)?);
    Ok(())
}

fn enumerator(settings: &Settings) -> anyhow::Result<Enumerator<HttpPlane>> {
    let plane = HttpPlane::new(settings.plane.clone()).context("building HTTP client")?;
    let enumerator = Enumerator::new(plane);
    Ok(match settings.timeout() {
        Some(timeout) => enumerator.with_timeout(timeout),
        None => enumerator,
    })
}

async fn restorable_containers(
    settings: &Settings,
    args: RestorableContainersArgs,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let enumerator = enumerator(settings)?;
    let cancel = ctrl_c_token();
    let records = match (args.parent, args.location, args.instance_id, args.database_rid) {
        (Some(parent), ..) => {
            let parent: RestorableResource = read_json(&parent)?;
            enumerator.restorable_containers_of(&parent, &cancel).await
        }
        (None, Some(location), Some(instance_id), Some(database_rid)) => {
            let query = ContainerQuery::new(location, instance_id, database_rid);
            enumerator.restorable_containers(&query, &cancel).await
        }
        _ => anyhow::bail!("pass --parent or all of --location, --instance-id, --database-rid"),
    }
    .context("listing restorable containers")?;
    let count = print_all(records, format)?;
    tracing::info!(count, "done");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("vaultkeep v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let file = FileConfig::discover(cli.config.as_deref())?;
    let settings = Settings::resolve(
        file,
        Overrides {
            endpoint: cli.endpoint,
            subscription_id: cli.subscription_id,
            timeout_secs: cli.timeout_secs,
            access_token: std::env::var(ACCESS_TOKEN_ENV).ok(),
        },
    )?;

    match cli.command {
        Command::RestoreDisks(args) => restore_disks(&settings, args, cli.format).await,
        Command::RestorableDatabases {
            location,
            instance_id,
        } => {
            let records = enumerator(&settings)?
                .restorable_databases(&location, &instance_id, &ctrl_c_token())
                .await
                .context("listing restorable databases")?;
            let count = print_all(records, cli.format)?;
            tracing::info!(count, "done");
            Ok(())
        }
        Command::RestorableContainers(args) => {
            restorable_containers(&settings, args, cli.format).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn containers_accept_parent_alone() {
        let cli = Cli::try_parse_from([
            "vaultkeep",
            "restorable-containers",
            "--parent",
            "db.json",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::RestorableContainers(RestorableContainersArgs { parent: Some(_), .. })
        ));
    }

    #[test]
    fn containers_reject_partial_identifiers() {
        let res = Cli::try_parse_from([
            "vaultkeep",
            "restorable-containers",
            "--location",
            "westus",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn containers_reject_parent_with_identifiers() {
        let res = Cli::try_parse_from([
            "vaultkeep",
            "restorable-containers",
            "--parent",
            "db.json",
            "--location",
            "westus",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn restore_defaults_storage_type() {
        let cli = Cli::try_parse_from([
            "vaultkeep",
            "restore-disks",
            "--recovery-point",
            "rp.json",
            "--storage-account-id",
            "/sa",
            "--storage-account-location",
            "westus",
        ])
        .unwrap();
        match cli.command {
            Command::RestoreDisks(args) => {
                assert_eq!(args.storage_account_type, "Microsoft.Storage/storageAccounts");
                assert!(!args.use_original_storage_account);
            }
            _ => panic!("expected restore-disks"),
        }
    }
}
