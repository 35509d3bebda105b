use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::state::{AppState, Reclaimed};

/// Watchdog en segundo plano. Soltar el handle no lo detiene: hay que
/// llamar a `shutdown`.
pub struct Watchdog {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Watchdog {
    /// Arranca el loop:
    /// - cada `every` revisa la tabla
    /// - reclama las tareas InProgress con más de `timeout`
    pub fn spawn(state: AppState, every: Duration, timeout: Duration) -> Self {
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        sweep_once(&state, Instant::now(), timeout);
                    }
                    res = stopped.changed() => {
                        if res.is_err() || *stopped.borrow() {
                            debug!("watchdog detenido");
                            break;
                        }
                    }
                }
            }
        });

        Self { stop, handle }
    }

    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.handle.await {
            warn!("watchdog terminó con error: {:?}", e);
        }
    }
}

/// Una pasada, con el mismo lock que usan los handlers RPC.
pub fn sweep_once(state: &AppState, now: Instant, timeout: Duration) -> Vec<Reclaimed> {
    let reclaimed = state.lock().reclaim_expired(now, timeout);

    for r in &reclaimed {
        info!(
            "reclamando {} {} del worker {:?} (sin reporte en {:?})",
            r.kind, r.task_id, r.worker, timeout
        );
    }

    reclaimed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TaskTable;
    use common::{Assignment, TaskKind, TaskStatus};

    fn state_with_one_map() -> AppState {
        AppState::new(TaskTable::new(vec!["a.txt".to_string()], 1).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn watchdog_reclama_despues_del_plazo() {
        let state = state_with_one_map();
        let wd = Watchdog::spawn(state.clone(), Duration::from_secs(1), Duration::from_secs(10));

        let a = state.lock().assign(1, Instant::now());
        assert!(matches!(a, Assignment::Map { task_id: 0, .. }));

        // antes del plazo sigue en curso
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(
            state.lock().tasks(TaskKind::Map)[0].status,
            TaskStatus::InProgress
        );

        tokio::time::sleep(Duration::from_secs(7)).await;
        {
            let table = state.lock();
            let task = &table.tasks(TaskKind::Map)[0];
            assert_eq!(task.status, TaskStatus::Ready);
            assert_eq!(task.worker, None);
            assert_eq!(task.started_at, None);
        }

        wd.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_detiene_el_watchdog() {
        let state = state_with_one_map();
        let wd = Watchdog::spawn(state.clone(), Duration::from_secs(1), Duration::from_secs(10));
        wd.shutdown().await;

        state.lock().assign(1, Instant::now());
        tokio::time::sleep(Duration::from_secs(30)).await;

        // nadie reclamó la tarea
        assert_eq!(
            state.lock().tasks(TaskKind::Map)[0].status,
            TaskStatus::InProgress
        );
    }

    #[test]
    fn sweep_once_devuelve_lo_reclamado() {
        let state = state_with_one_map();
        let t0 = Instant::now();
        state.lock().assign(9, t0);

        let reclaimed = sweep_once(&state, t0 + Duration::from_secs(11), Duration::from_secs(10));
        assert_eq!(reclaimed.len(), 1);
        assert_eq!(reclaimed[0].worker, Some(9));
        assert!(sweep_once(&state, t0 + Duration::from_secs(12), Duration::from_secs(10)).is_empty());
    }
}
