use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{HttpResourceRequestApi, PrincipalDashboard, StatusCounts};
use shared::{catalog, domain::SchoolId, protocol::ResourceRequest};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "dashboard", about = "Principal's dashboard for school resource requests")]
struct Args {
    /// Config file; defaults to ./dashboard.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_base_url: Option<String>,
    /// UDISE code of the school.
    #[arg(long)]
    school_id: Option<String>,
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List requestable resource types.
    Types,
    /// Show the school's requests and status counts.
    List,
    /// File a new resource request.
    Submit {
        #[arg(long = "type")]
        resource_type: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        description: String,
    },
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(id) = &self.school_id {
            settings.school_id = Some(id.clone()).filter(|id| !id.trim().is_empty());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);
    settings.validate()?;

    match args.command {
        Command::Types => print_types(args.json),
        Command::List => {
            let dashboard = mount(&settings).await?;
            print_dashboard(&dashboard, args.json)
        }
        Command::Submit {
            resource_type,
            quantity,
            description,
        } => {
            let mut dashboard = mount(&settings).await?;
            let form = dashboard.form();
            form.set_type(resource_type);
            form.set_quantity(quantity);
            form.set_description(description);
            let record = form.submit().await.context("submission rejected")?;
            dashboard.drain_events();
            println!("Created request {} ({})", record.id, record.status);
            print_dashboard(&dashboard, args.json)
        }
    }
}

async fn mount(settings: &Settings) -> Result<PrincipalDashboard> {
    let api =
        HttpResourceRequestApi::with_timeout(&settings.api_base_url, settings.http_timeout())?;
    info!(api_base_url = %api.base_url(), "mounting dashboard");
    let school_id = settings.school_id.clone().map(SchoolId::new);
    Ok(PrincipalDashboard::mount(Arc::new(api), school_id, settings.form_settings()).await)
}

fn print_types(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(catalog::resource_types())?);
        return Ok(());
    }
    for resource in catalog::resource_types() {
        println!(
            "{:<18} {:>5}..{:<6} {}",
            resource.label, resource.min_quantity, resource.max_quantity, resource.unit
        );
    }
    Ok(())
}

fn print_dashboard(dashboard: &PrincipalDashboard, json: bool) -> Result<()> {
    if dashboard.session().school_id().is_none() {
        warn!("no school id configured; pass --school-id or set APP__SCHOOL_ID");
    }
    println!("{}", render_dashboard(dashboard, json)?);
    Ok(())
}

fn render_dashboard(dashboard: &PrincipalDashboard, json: bool) -> Result<String> {
    let counts = dashboard.status_counts();
    if json {
        let body = serde_json::json!({
            "school_name": dashboard.session().school_name(),
            "counts": counts,
            "requests": dashboard.requests(),
        });
        return Ok(serde_json::to_string_pretty(&body)?);
    }

    let heading = match dashboard.session().school_name() {
        Some(name) => name.to_string(),
        None if dashboard.session().school_id().is_none() => "(no school id configured)".into(),
        None => "(school name unavailable)".into(),
    };
    let mut lines = vec![heading, format_counts(&counts)];
    lines.extend(dashboard.requests().iter().map(format_request));
    Ok(lines.join("\n"))
}

fn format_counts(counts: &StatusCounts) -> String {
    format!(
        "Pending: {}  In Progress: {}  Allocated: {}",
        counts.pending, counts.moved, counts.allocated
    )
}

fn format_request(request: &ResourceRequest) -> String {
    let proof = if request.proof.is_some() { " [proof]" } else { "" };
    format!(
        "{}  {:<10} {:<18} {:>6} {}  {}{}",
        request.request_date,
        request.status,
        request.resource_type,
        request.quantity,
        catalog::unit_for(&request.resource_type),
        request.description,
        proof
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
