use std::path::PathBuf;
use std::time::Duration;

use crate::socket;

/// Cada cuánto corre el watchdog.
pub const DEFAULT_WATCHDOG_INTERVAL: Duration = Duration::from_secs(1);
/// Plazo máximo de una tarea InProgress antes de reclamarla.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(10);
/// Pausa del worker tras recibir Wait.
pub const DEFAULT_WAIT_PAUSE: Duration = Duration::from_secs(1);
pub const DEFAULT_N_REDUCE: usize = 10;
pub const DEFAULT_APP: &str = "wordcount";

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub socket_path: PathBuf,
    pub n_reduce: usize,
    pub watchdog_interval: Duration,
    pub task_timeout: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            socket_path: socket::default_socket_path(),
            n_reduce: DEFAULT_N_REDUCE,
            watchdog_interval: DEFAULT_WATCHDOG_INTERVAL,
            task_timeout: DEFAULT_TASK_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub socket_path: PathBuf,
    /// Directorio donde viven los intermedios y las salidas
    pub work_dir: PathBuf,
    pub wait_pause: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            socket_path: socket::default_socket_path(),
            work_dir: PathBuf::from("."),
            wait_pause: DEFAULT_WAIT_PAUSE,
        }
    }
}
