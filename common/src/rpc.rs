use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{TaskId, TaskKind, WorkerId};

/* --------- GetTask --------- */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaskRequest {
    pub worker_id: WorkerId,
}

/// Respuesta de GetTask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task_type", rename_all = "snake_case")]
pub enum Assignment {
    Map {
        task_id: TaskId,
        /// Split de entrada (ruta del archivo)
        split: String,
        n_reduce: usize,
    },
    Reduce {
        task_id: TaskId,
        /// Patrón de los intermedios de esta partición, ej: "mr-*-3"
        pattern: String,
        n_map: usize,
    },
    /// Nada asignable por ahora, reintentar más tarde
    Wait,
    /// No habrá más trabajo
    Terminate,
}

/* --------- CompletedTask --------- */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTaskRequest {
    pub task_kind: TaskKind,
    pub task_id: TaskId,
    pub worker_id: WorkerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Wait,
    Terminate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedTaskResponse {
    pub directive: Directive,
}

/* --------- Estado del job --------- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub unavailable: usize,
    pub ready: usize,
    pub in_progress: usize,
    pub done: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub started_at: DateTime<Utc>,
    pub n_map: usize,
    pub n_reduce: usize,
    pub map: StatusCounts,
    pub reduce: StatusCounts,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn assignment_usa_task_type_como_tag() {
        let a = Assignment::Map {
            task_id: 3,
            split: "pg-grimm.txt".to_string(),
            n_reduce: 10,
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(
            v,
            json!({"task_type": "map", "task_id": 3, "split": "pg-grimm.txt", "n_reduce": 10})
        );

        let wait: Assignment = serde_json::from_value(json!({"task_type": "wait"})).unwrap();
        assert_eq!(wait, Assignment::Wait);
    }

    #[test]
    fn completed_request_rejects_unknown_task_kind() {
        let res: Result<CompletedTaskRequest, _> = serde_json::from_value(json!({
            "task_kind": "wait",
            "task_id": 0,
            "worker_id": 7
        }));
        assert!(res.is_err());
    }
}
