use std::path::Path;

use anyhow::{Context, Result};
use common::{
    Assignment, CompletedTaskRequest, CompletedTaskResponse, Directive, GetTaskRequest,
    JobStatusReport, TaskId, TaskKind, WorkerId,
};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

// El host no importa: todo va por el socket Unix.
const BASE_URL: &str = "http://coordinator";

/// Cliente RPC del coordinator. Un error de conexión o un status HTTP no
/// exitoso se devuelve como error; no hay reintentos.
#[derive(Clone)]
pub struct CoordinatorClient {
    http: Client,
}

impl CoordinatorClient {
    pub fn new(socket_path: &Path) -> Result<Self> {
        let http = Client::builder()
            .unix_socket(socket_path.to_path_buf())
            .build()
            .context("no se pudo construir el cliente HTTP")?;
        Ok(Self { http })
    }

    pub async fn get_task(&self, worker_id: WorkerId) -> Result<Assignment> {
        self.post("/rpc/get-task", &GetTaskRequest { worker_id }).await
    }

    pub async fn completed_task(
        &self,
        task_kind: TaskKind,
        task_id: TaskId,
        worker_id: WorkerId,
    ) -> Result<Directive> {
        let resp: CompletedTaskResponse = self
            .post(
                "/rpc/completed-task",
                &CompletedTaskRequest {
                    task_kind,
                    task_id,
                    worker_id,
                },
            )
            .await?;
        Ok(resp.directive)
    }

    pub async fn status(&self) -> Result<JobStatusReport> {
        let url = format!("{}/api/v1/status", BASE_URL);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("coordinator inalcanzable")?
            .error_for_status()?;
        Ok(resp.json().await?)
    }

    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", BASE_URL, path);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("coordinator inalcanzable ({})", path))?
            .error_for_status()
            .with_context(|| format!("coordinator rechazó {}", path))?;

        resp.json()
            .await
            .with_context(|| format!("respuesta inválida de {}", path))
    }
}
