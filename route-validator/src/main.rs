use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_validator::osm::{OsmClient, OsmConfig};
use route_validator::routes::RoutesFile;
use route_validator::validation::{
    GroupReport, Outcome, RelationReport, ValidateError, Validation, ValidationConfig, Validator,
};

#[derive(Parser, Debug)]
#[command(name = "route-validator")]
#[command(about = "Validate OpenStreetMap bus route relations")]
#[command(group(clap::ArgGroup::new("target").required(true).args(["relation", "file"])))]
struct Args {
    /// Relation ID of a route or route master
    #[arg(short, long)]
    relation: Option<i64>,

    /// Require NaPTAN tags on platforms (single relation only)
    #[arg(long)]
    npt: bool,

    /// Routes file; its config replaces the command-line options
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// List the relations that contain the relation instead of validating it
    #[arg(long, requires = "relation")]
    parents: bool,

    /// Maximum concurrent requests to the OSM API
    #[arg(long, default_value_t = route_validator::osm::DEFAULT_PARALLEL_REQUESTS)]
    parallel: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut osm_config = OsmConfig::default().with_parallel_requests(args.parallel);
    if let Ok(user_agent) = std::env::var("OSM_USER_AGENT") {
        osm_config.user_agent = user_agent;
    }
    let client = match OsmClient::new(osm_config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create OSM client");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    let all_valid = match (args.relation, args.file) {
        (Some(id), _) if args.parents => {
            let validator = Validator::new(&client, ValidationConfig::new()).with_cancellation(cancel);
            return match validator.parent_relations(id).await {
                Ok(parents) => {
                    for parent in parents {
                        println!(
                            "{} ({}) - {}",
                            parent.name().unwrap_or("unnamed"),
                            parent.relation_type().unwrap_or("untyped"),
                            parent.element_url()
                        );
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(relation_id = id, error = %e, "failed to fetch parent relations");
                    ExitCode::FAILURE
                }
            };
        }
        (Some(id), _) => {
            let config = ValidationConfig::new().with_naptan_platform_tags(args.npt);
            let validator = Validator::new(&client, config)
                .with_parallel_requests(client.parallel_requests())
                .with_cancellation(cancel);
            validate_and_print(&validator, id).await
        }
        (None, Some(path)) => {
            let file = match RoutesFile::load(&path) {
                Ok(file) => file,
                Err(e) => {
                    error!(error = %e, "failed to load routes file");
                    return ExitCode::FAILURE;
                }
            };
            let validator = Validator::new(&client, file.config.clone())
                .with_parallel_requests(client.parallel_requests())
                .with_cancellation(cancel);

            let mut all_valid = true;
            for (group, entry) in file.checkable() {
                info!(group, route = %entry.name, "checking route");
                all_valid &= validate_and_print(&validator, entry.relation_id).await;
                println!();
            }
            all_valid
        }
        (None, None) => {
            error!("a relation ID (-r) or routes file (-f) is required");
            return ExitCode::FAILURE;
        }
    };

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Validate one relation and print its findings. Returns whether it was clean.
async fn validate_and_print(validator: &Validator<'_, OsmClient>, id: i64) -> bool {
    match validator.validate_relation(id).await {
        Ok(Validation::Route(report)) => print_report(&report),
        Ok(Validation::RouteMaster(group)) => print_group(&group),
        Ok(Validation::Gone { relation_id }) => print_gone(relation_id),
        Err(e) => print_failure(id, &e),
    }
}

fn print_report(report: &RelationReport) -> bool {
    println!("validating relation: {}", report.url());
    if report.is_valid() {
        println!("relation is valid");
    }
    for finding in &report.findings {
        println!("{finding}");
    }
    report.is_valid()
}

fn print_group(group: &GroupReport) -> bool {
    let mut valid = print_outcome(&group.group);
    for (id, result) in &group.variants {
        println!();
        valid &= match result {
            Ok(outcome) => print_outcome(outcome),
            Err(e) => print_failure(*id, e),
        };
    }
    valid
}

fn print_outcome(outcome: &Outcome) -> bool {
    match outcome {
        Outcome::Checked(report) => print_report(report),
        Outcome::Gone { relation_id } => print_gone(*relation_id),
    }
}

fn print_gone(relation_id: i64) -> bool {
    println!("relation {relation_id} no longer exists");
    false
}

fn print_failure(relation_id: i64, e: &ValidateError) -> bool {
    error!(relation_id, error = %e, "failed to validate relation");
    false
}
