// coordinator/src/state.rs

use chrono::{DateTime, Utc};
use common::{
    layout, Assignment, Directive, Error, JobStatusReport, Result, StatusCounts, TaskId,
    TaskKind, TaskStatus, WorkerId,
};
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::time::Instant;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    // única tabla de tareas; todo cambio pasa por este lock
    pub table: Arc<Mutex<TaskTable>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(table: TaskTable) -> Self {
        Self {
            table: Arc::new(Mutex::new(table)),
            started_at: Utc::now(),
        }
    }

    /// Un panic con el lock tomado no invalida la tabla: cada operación
    /// deja las tareas en un estado válido antes de soltarlo.
    pub fn lock(&self) -> MutexGuard<'_, TaskTable> {
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn report(&self) -> JobStatusReport {
        self.lock().report(self.started_at)
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    /// map: split de entrada; reduce: patrón de intermedios
    pub key: String,
    pub worker: Option<WorkerId>,
    pub status: TaskStatus,
    pub started_at: Option<Instant>,
}

impl Task {
    fn new(id: TaskId, key: String, status: TaskStatus) -> Self {
        Self {
            id,
            key,
            worker: None,
            status,
            started_at: None,
        }
    }

    fn start(&mut self, worker: WorkerId, now: Instant) {
        self.status = TaskStatus::InProgress;
        self.worker = Some(worker);
        self.started_at = Some(now);
    }

    fn expired(&self, now: Instant, timeout: Duration) -> bool {
        match (self.status, self.started_at) {
            (TaskStatus::InProgress, Some(t)) => now.saturating_duration_since(t) > timeout,
            _ => false,
        }
    }
}

/// Tarea devuelta a la cola por el watchdog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reclaimed {
    pub kind: TaskKind,
    pub task_id: TaskId,
    pub worker: Option<WorkerId>,
}

/// Tabla de tareas del job. M y nReduce quedan fijos al construirla.
#[derive(Debug)]
pub struct TaskTable {
    map_tasks: Vec<Task>,
    reduce_tasks: Vec<Task>,
}

impl TaskTable {
    pub fn new(splits: Vec<String>, n_reduce: usize) -> Result<Self> {
        if n_reduce == 0 {
            return Err(Error::InvalidJob("n_reduce debe ser > 0".to_string()));
        }

        let map_tasks = splits
            .into_iter()
            .enumerate()
            .map(|(id, split)| Task::new(id, split, TaskStatus::Ready))
            .collect();

        let reduce_tasks = (0..n_reduce)
            .map(|id| Task::new(id, layout::reduce_pattern(id), TaskStatus::Unavailable))
            .collect();

        Ok(Self {
            map_tasks,
            reduce_tasks,
        })
    }

    pub fn n_map(&self) -> usize {
        self.map_tasks.len()
    }

    pub fn n_reduce(&self) -> usize {
        self.reduce_tasks.len()
    }

    pub fn tasks(&self, kind: TaskKind) -> &[Task] {
        match kind {
            TaskKind::Map => &self.map_tasks,
            TaskKind::Reduce => &self.reduce_tasks,
        }
    }

    fn tasks_mut(&mut self, kind: TaskKind) -> &mut [Task] {
        match kind {
            TaskKind::Map => &mut self.map_tasks,
            TaskKind::Reduce => &mut self.reduce_tasks,
        }
    }

    pub fn all_maps_done(&self) -> bool {
        self.map_tasks.iter().all(|t| t.status == TaskStatus::Done)
    }

    pub fn all_reduces_done(&self) -> bool {
        self.reduce_tasks.iter().all(|t| t.status == TaskStatus::Done)
    }

    /// El job termina cuando todas las tareas, map y reduce, están Done.
    pub fn is_done(&self) -> bool {
        self.all_maps_done() && self.all_reduces_done()
    }

    /// GetTask: primero maps Ready, después (solo si todos los maps están
    /// Done) reduces Unavailable.
    pub fn assign(&mut self, worker: WorkerId, now: Instant) -> Assignment {
        let n_reduce = self.n_reduce();
        if let Some(task) = self
            .map_tasks
            .iter_mut()
            .find(|t| t.status == TaskStatus::Ready)
        {
            task.start(worker, now);
            return Assignment::Map {
                task_id: task.id,
                split: task.key.clone(),
                n_reduce,
            };
        }

        if !self.all_maps_done() {
            return Assignment::Wait;
        }

        let n_map = self.n_map();
        if let Some(task) = self
            .reduce_tasks
            .iter_mut()
            .find(|t| t.status == TaskStatus::Unavailable)
        {
            task.start(worker, now);
            return Assignment::Reduce {
                task_id: task.id,
                pattern: task.key.clone(),
                n_map,
            };
        }

        if !self.all_reduces_done() {
            return Assignment::Wait;
        }

        Assignment::Terminate
    }

    /// CompletedTask. Se acepta aunque la tarea ya esté Done o la tenga otro
    /// worker: quien reporta ya renombró su salida a su lugar.
    pub fn complete(&mut self, kind: TaskKind, task_id: TaskId, worker: WorkerId) -> Directive {
        match self.tasks_mut(kind).get_mut(task_id) {
            Some(task) => {
                if task.status == TaskStatus::Done {
                    info!("reporte repetido de {} {} (worker {})", kind, task_id, worker);
                } else if task.worker != Some(worker) {
                    warn!(
                        "worker {} reporta {} {} que tenía {:?}, se acepta igual",
                        worker, kind, task_id, task.worker
                    );
                }
                task.status = TaskStatus::Done;
                task.worker = None;
                task.started_at = None;
            }
            None => {
                warn!(
                    "worker {} reporta {} {} inexistente, se ignora",
                    worker, kind, task_id
                );
            }
        }

        match kind {
            TaskKind::Map => Directive::Wait,
            TaskKind::Reduce if self.all_reduces_done() => Directive::Terminate,
            TaskKind::Reduce => Directive::Wait,
        }
    }

    /// Devuelve a la cola toda tarea InProgress más vieja que `timeout`.
    /// Un map vuelve a Ready, un reduce a Unavailable.
    pub fn reclaim_expired(&mut self, now: Instant, timeout: Duration) -> Vec<Reclaimed> {
        let mut reclaimed = Vec::new();

        for (kind, back_to) in [
            (TaskKind::Map, TaskStatus::Ready),
            (TaskKind::Reduce, TaskStatus::Unavailable),
        ] {
            for task in self.tasks_mut(kind).iter_mut() {
                if task.expired(now, timeout) {
                    reclaimed.push(Reclaimed {
                        kind,
                        task_id: task.id,
                        worker: task.worker,
                    });
                    task.status = back_to;
                    task.worker = None;
                    task.started_at = None;
                }
            }
        }

        reclaimed
    }

    pub fn report(&self, started_at: DateTime<Utc>) -> JobStatusReport {
        JobStatusReport {
            started_at,
            n_map: self.n_map(),
            n_reduce: self.n_reduce(),
            map: count(&self.map_tasks),
            reduce: count(&self.reduce_tasks),
            done: self.is_done(),
        }
    }
}

fn count(tasks: &[Task]) -> StatusCounts {
    let mut c = StatusCounts::default();
    for t in tasks {
        match t.status {
            TaskStatus::Unavailable => c.unavailable += 1,
            TaskStatus::Ready => c.ready += 1,
            TaskStatus::InProgress => c.in_progress += 1,
            TaskStatus::Done => c.done += 1,
        }
    }
    c
}
