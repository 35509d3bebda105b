pub mod handlers;
pub mod state;
pub mod watchdog;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use common::{config::CoordinatorConfig, Error, JobStatusReport};
use tokio::{net::UnixListener, sync::oneshot, task::JoinHandle};
use tracing::{info, warn};

use crate::state::{AppState, TaskTable};
use crate::watchdog::Watchdog;

/// Coordinator en marcha: servidor RPC sobre el socket Unix + watchdog.
pub struct Coordinator {
    state: AppState,
    socket_path: PathBuf,
    watchdog: Watchdog,
    stop_server: oneshot::Sender<()>,
    server: JoinHandle<io::Result<()>>,
}

impl Coordinator {
    /// Crea el job (una tarea map por split, `n_reduce` reduces) y empieza a
    /// atender workers.
    pub async fn start(config: CoordinatorConfig, splits: Vec<String>) -> Result<Self> {
        if config.watchdog_interval.is_zero() {
            return Err(Error::InvalidJob("watchdog_interval debe ser > 0".to_string()).into());
        }
        let table = TaskTable::new(splits, config.n_reduce)?;
        info!(
            "job creado: {} maps, {} reduces",
            table.n_map(),
            table.n_reduce()
        );
        let state = AppState::new(table);

        // socket de una corrida anterior
        match std::fs::remove_file(&config.socket_path) {
            Ok(()) => warn!("borrando socket viejo {}", config.socket_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("no se pudo borrar {}", config.socket_path.display())
                })
            }
        }

        let listener = UnixListener::bind(&config.socket_path)
            .with_context(|| format!("listen en {}", config.socket_path.display()))?;
        info!("coordinator escuchando en {}", config.socket_path.display());

        let app = handlers::build_router(state.clone());
        let (stop_server, stopped) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = stopped.await;
                })
                .await
        });

        let watchdog = Watchdog::spawn(
            state.clone(),
            config.watchdog_interval,
            config.task_timeout,
        );

        Ok(Self {
            state,
            socket_path: config.socket_path,
            watchdog,
            stop_server,
            server,
        })
    }

    /// true cuando todas las tareas map y reduce están Done.
    pub fn done(&self) -> bool {
        self.state.lock().is_done()
    }

    pub fn status(&self) -> JobStatusReport {
        self.state.report()
    }

    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Detiene watchdog y servidor y borra el socket.
    pub async fn shutdown(self) -> Result<()> {
        self.watchdog.shutdown().await;

        let _ = self.stop_server.send(());
        self.server
            .await
            .context("servidor RPC terminó con panic")?
            .context("servidor RPC terminó con error")?;

        if let Err(e) = std::fs::remove_file(&self.socket_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("no se pudo borrar {}: {}", self.socket_path.display(), e);
            }
        }

        info!("coordinator detenido");
        Ok(())
    }
}
