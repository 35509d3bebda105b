use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use common::{apps, sequential, JobStatusReport, StatusCounts};
use std::path::PathBuf;
use worker::CoordinatorClient;

#[derive(Parser)]
#[command(name = "mrctl")]
#[command(about = "CLI simple para hablar con el coordinator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consulta el estado del job en curso
    Status {
        /// Socket Unix del coordinator (por defecto depende del uid)
        #[arg(long, env = "MR_SOCKET")]
        socket: Option<PathBuf>,

        /// Imprime el reporte como JSON
        #[arg(long)]
        json: bool,
    },

    /// Corre el job completo en este proceso, sin coordinator ni workers
    Sequential {
        #[arg(long, env = "MR_APP", default_value = common::config::DEFAULT_APP)]
        app: String,

        /// Archivo de salida
        #[arg(long, default_value = "mr-out-0")]
        out: PathBuf,

        #[arg(value_name = "SPLITS", required = true)]
        splits: Vec<PathBuf>,
    },
}

fn print_counts(label: &str, total: usize, c: &StatusCounts) {
    println!(
        "  {:<7}: total={}, done={}, en curso={}, listas={}, no disponibles={}",
        label, total, c.done, c.in_progress, c.ready, c.unavailable
    );
}

fn print_report(report: &JobStatusReport) {
    println!("Job:");
    println!("  iniciado: {}", report.started_at);
    print_counts("map", report.n_map, &report.map);
    print_counts("reduce", report.n_reduce, &report.reduce);

    let total = report.n_map + report.n_reduce;
    let done = report.map.done + report.reduce.done;
    if total > 0 {
        let pct = (done as f64 / total as f64) * 100.0;
        println!("  progreso: {:.1}%", pct);
    }
    println!("  terminado: {}", report.done);
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status { socket, json } => {
            let socket = socket.unwrap_or_else(common::socket::default_socket_path);
            let client = CoordinatorClient::new(&socket)?;
            let report = client
                .status()
                .await
                .with_context(|| format!("consultando {}", socket.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Commands::Sequential { app, out, splits } => {
            let app = apps::by_name(&app)?;
            let keys = sequential::run_sequential(app.as_ref(), &splits[..], &out)?;
            println!("{} claves en {}", keys, out.display());
        }
    }

    Ok(())
}
