use serde::{Deserialize, Serialize};

/// Índice estable de una tarea dentro de su tipo (map o reduce).
pub type TaskId = usize;

/// Identidad de un proceso worker.
pub type WorkerId = u64;

/// Tipos de tarea que existen de verdad. `Wait`/`Terminate` no son tareas,
/// viven en `rpc::Assignment` y `rpc::Directive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Map,
    Reduce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Reduce todavía no asignable (o reclamada por el watchdog).
    Unavailable,
    Ready,
    InProgress,
    Done,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Map => f.write_str("map"),
            TaskKind::Reduce => f.write_str("reduce"),
        }
    }
}
