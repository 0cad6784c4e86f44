//! hubd - Project hub CLI
//!
//! Serves the hub, or prints the discovered project registry.
//!
//! Embedded ("express") projects need a handler factory registered by the
//! embedding binary; `hubd` itself registers none, so a tree containing
//! embedded projects is served by a host binary that links `project_hub`
//! and fills an `AppRegistry` before startup. With unmatched embedded
//! projects, `serve` refuses to start rather than mounting a partial hub.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use project_hub::{build_registry, AppRegistry, HubConfig, HubServer, Project};

#[derive(Parser)]
#[command(name = "hubd")]
#[command(version = project_hub::VERSION)]
#[command(about = "Personal project hub server", long_about = None)]
struct Cli {
    /// Hub repo root (contains Projects/ and the hub assets)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the hub server
    Serve {
        /// Port to listen on
        #[arg(long, short, default_value_t = project_hub::config::DEFAULT_PORT)]
        port: u16,
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
    /// List discovered projects
    Projects {
        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let root = cli
        .root
        .canonicalize()
        .with_context(|| format!("invalid root: {}", cli.root.display()))?;

    match cli.command {
        Commands::Serve { port, bind } => {
            let mut config = HubConfig::new(root);
            config.port = port;
            config.bind_addr = bind;

            let projects = build_registry(&config.projects_dir)
                .context("failed to build project registry")?;
            let hub = HubServer::new(config, &projects, &AppRegistry::new())
                .context("failed to mount projects")?;

            let shutdown = Arc::new(AtomicBool::new(false));
            let flag = Arc::clone(&shutdown);
            ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
                .context("failed to install Ctrl+C handler")?;

            hub.run(shutdown)?;
        }

        Commands::Projects { format } => {
            let config = HubConfig::new(root);
            let projects = build_registry(&config.projects_dir)
                .context("failed to build project registry")?;

            if format == "json" {
                let summaries: Vec<_> = projects.iter().map(Project::summary).collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                print_table(&projects);
            }
        }
    }

    Ok(())
}

fn print_table(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects found.");
        return;
    }

    println!("{:<20} {:<10} {:<30} HREF", "SLUG", "TYPE", "TITLE");
    for p in projects {
        println!(
            "{:<20} {:<10} {:<30} {}",
            p.slug,
            p.kind.type_tag(),
            p.title,
            p.href
        );
    }
}
