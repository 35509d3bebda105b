use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use common::config::{self, CoordinatorConfig};
use coordinator::Coordinator;
use glob::glob;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mr-coordinator")]
#[command(about = "Coordinator de MapReduce: reparte tareas map/reduce a los workers")]
struct Args {
    /// Splits de entrada (rutas o patrones glob), una tarea map por archivo
    #[arg(value_name = "SPLITS", required = true)]
    splits: Vec<String>,

    /// Cantidad de particiones reduce
    #[arg(long, env = "MR_N_REDUCE", default_value_t = config::DEFAULT_N_REDUCE)]
    n_reduce: usize,

    /// Socket Unix del coordinator (por defecto depende del uid)
    #[arg(long, env = "MR_SOCKET")]
    socket: Option<PathBuf>,

    /// Plazo de una tarea en curso antes de reasignarla
    #[arg(long, env = "MR_TASK_TIMEOUT_MS", default_value_t = 10_000)]
    task_timeout_ms: u64,

    #[arg(
        long,
        env = "MR_WATCHDOG_INTERVAL_MS",
        default_value_t = 1_000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    watchdog_interval_ms: u64,
}

/// Expande los patrones glob; lo que no es patrón se deja tal cual.
fn expand_splits(patterns: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        for entry in glob(pattern).with_context(|| format!("patrón inválido: {}", pattern))? {
            let path = entry?;
            if path.is_file() {
                out.push(path.to_string_lossy().to_string());
                matched = true;
            }
        }
        if !matched {
            out.push(pattern.clone());
        }
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coordinator=info,mr_coordinator=info,tower_http=warn")),
        )
        .init();

    let args = Args::parse();
    let splits = expand_splits(&args.splits)?;
    if splits.is_empty() {
        bail!("no hay splits de entrada");
    }

    let mut cfg = CoordinatorConfig {
        n_reduce: args.n_reduce,
        task_timeout: Duration::from_millis(args.task_timeout_ms),
        watchdog_interval: Duration::from_millis(args.watchdog_interval_ms),
        ..CoordinatorConfig::default()
    };
    if let Some(socket) = args.socket {
        cfg.socket_path = socket;
    }

    let coord = Coordinator::start(cfg, splits).await?;

    while !coord.done() {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    info!("job terminado");

    // margen para que los workers reciban Terminate
    tokio::time::sleep(Duration::from_secs(1)).await;
    coord.shutdown().await
}
