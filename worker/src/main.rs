use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::Parser;
use common::{apps, config::WorkerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use worker::Worker;

#[derive(Parser)]
#[command(name = "mr-worker")]
#[command(about = "Worker de MapReduce: pide tareas al coordinator y las ejecuta")]
struct Args {
    /// Aplicación map/reduce (wordcount, indexer)
    #[arg(long, env = "MR_APP", default_value = common::config::DEFAULT_APP)]
    app: String,

    /// Directorio de intermedios y salidas
    #[arg(long, env = "MR_WORK_DIR", default_value = ".")]
    work_dir: PathBuf,

    #[arg(long, env = "MR_SOCKET")]
    socket: Option<PathBuf>,

    /// Pausa tras un Wait
    #[arg(long, env = "MR_WAIT_PAUSE_MS", default_value_t = 1_000)]
    wait_pause_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("worker=info,mr_worker=info")),
        )
        .init();

    let args = Args::parse();
    let app: Arc<dyn apps::MapReduceApp> = Arc::from(apps::by_name(&args.app)?);

    let mut config = WorkerConfig {
        work_dir: args.work_dir,
        wait_pause: Duration::from_millis(args.wait_pause_ms),
        ..WorkerConfig::default()
    };
    if let Some(socket) = args.socket {
        config.socket_path = socket;
    }

    // Nombre de host (solo para info)
    let hostname = hostname::get()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let worker = Worker::new(config, app)?;
    info!("worker {} en {}", worker.id(), hostname);

    if let Err(e) = worker.run().await {
        error!("worker {} abortado: {:#}", worker.id(), e);
        return Err(e);
    }
    Ok(())
}
