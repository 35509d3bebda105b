use common::WorkerId;

/// Identidad del worker: pid en la parte alta y 32 bits al azar en la baja.
/// Dos workers vivos al mismo tiempo en la misma máquina no comparten pid,
/// y la parte aleatoria cubre pids reciclados o máquinas distintas.
pub fn worker_id() -> WorkerId {
    compose(std::process::id(), rand::random::<u32>())
}

fn compose(pid: u32, salt: u32) -> WorkerId {
    ((pid as u64) << 32) | salt as u64
}
