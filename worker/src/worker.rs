use std::sync::Arc;

use anyhow::{bail, Context, Result};
use common::{apps::MapReduceApp, config::WorkerConfig, Assignment, Directive, TaskKind, WorkerId};
use tokio::time::sleep;
use tracing::{debug, info};

use crate::client::CoordinatorClient;
use crate::{identity, map, reduce};

/// Resultado de una vuelta del loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

pub struct Worker {
    id: WorkerId,
    client: CoordinatorClient,
    app: Arc<dyn MapReduceApp>,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(config: WorkerConfig, app: Arc<dyn MapReduceApp>) -> Result<Self> {
        Self::with_id(identity::worker_id(), config, app)
    }

    pub fn with_id(id: WorkerId, config: WorkerConfig, app: Arc<dyn MapReduceApp>) -> Result<Self> {
        let client = CoordinatorClient::new(&config.socket_path)?;
        Ok(Self {
            id,
            client,
            app,
            config,
        })
    }

    pub fn id(&self) -> WorkerId {
        self.id
    }

    /// Loop principal del worker:
    /// - pide tarea
    /// - la ejecuta y reporta
    /// - termina con Terminate
    ///
    /// Cualquier error corta el loop. No se reintenta localmente: el
    /// watchdog del coordinator reasigna la tarea a otro worker.
    pub async fn run(&self) -> Result<()> {
        info!(
            "worker {} ({}) contra {}",
            self.id,
            self.app.name(),
            self.config.socket_path.display()
        );

        loop {
            match self.step().await? {
                Step::Continue => {}
                Step::Exit => break,
            }
        }

        info!("worker {} terminado", self.id);
        Ok(())
    }

    /// Una vuelta: GetTask, ejecutar, CompletedTask.
    pub async fn step(&self) -> Result<Step> {
        let assignment = self.client.get_task(self.id).await?;

        match assignment {
            Assignment::Wait => {
                debug!("nada que hacer, esperando {:?}", self.config.wait_pause);
                sleep(self.config.wait_pause).await;
                Ok(Step::Continue)
            }
            Assignment::Terminate => Ok(Step::Exit),
            Assignment::Map {
                task_id,
                split,
                n_reduce,
            } => {
                info!("map {} sobre {} (n_reduce={})", task_id, split, n_reduce);
                let app = self.app.clone();
                let work_dir = self.config.work_dir.clone();
                tokio::task::spawn_blocking(move || {
                    map::run_map(app.as_ref(), task_id, &split, n_reduce, &work_dir)
                })
                .await
                .context("panic en tarea map")??;

                match self.client.completed_task(TaskKind::Map, task_id, self.id).await? {
                    Directive::Wait => Ok(Step::Continue),
                    other => bail!("respuesta inesperada a map {} completado: {:?}", task_id, other),
                }
            }
            Assignment::Reduce {
                task_id,
                pattern,
                n_map,
            } => {
                info!("reduce {} sobre {} (n_map={})", task_id, pattern, n_map);
                let app = self.app.clone();
                let work_dir = self.config.work_dir.clone();
                tokio::task::spawn_blocking(move || {
                    reduce::run_reduce(app.as_ref(), task_id, &pattern, n_map, &work_dir)
                })
                .await
                .context("panic en tarea reduce")??;

                match self
                    .client
                    .completed_task(TaskKind::Reduce, task_id, self.id)
                    .await?
                {
                    Directive::Wait => Ok(Step::Continue),
                    Directive::Terminate => Ok(Step::Exit),
                }
            }
        }
    }
}
