use std::{fs, path::Path};

use anyhow::{Context, Result};
use common::{apps::MapReduceApp, kv, layout, partition::partition_for, KeyValue, TaskId};
use tracing::debug;

/// Ejecuta una tarea map:
/// 1. lee el split completo
/// 2. aplica la función map
/// 3. reparte los registros en `n_reduce` buckets por hash de la clave
/// 4. escribe cada bucket a un temporal y lo renombra a `mr-<task>-<r>`
///
/// Se escriben los `n_reduce` archivos aunque un bucket quede vacío, así el
/// reduce siempre encuentra su entrada.
pub fn run_map(
    app: &dyn MapReduceApp,
    task_id: TaskId,
    split: &str,
    n_reduce: usize,
    work_dir: &Path,
) -> Result<()> {
    if n_reduce == 0 {
        anyhow::bail!("map {} recibió n_reduce = 0", task_id);
    }

    // bytes crudos: un split que no es UTF-8 igual se mapea
    let bytes = fs::read(split).with_context(|| format!("no se pudo leer el split {}", split))?;
    let contents = String::from_utf8_lossy(&bytes);

    let records = app.map(split, &contents);
    let buckets = partition_records(records, n_reduce);

    for (partition, bucket) in buckets.iter().enumerate() {
        let name = layout::intermediate_name(task_id, partition);
        layout::commit_atomically(work_dir, &name, |w| kv::write_records(w, bucket))
            .with_context(|| format!("no se pudo escribir {}", name))?;
        debug!("map {}: {} registros en {}", task_id, bucket.len(), name);
    }

    Ok(())
}

pub fn partition_records(records: Vec<KeyValue>, n_reduce: usize) -> Vec<Vec<KeyValue>> {
    let mut buckets: Vec<Vec<KeyValue>> = vec![Vec::new(); n_reduce];
    for kv in records {
        let r = partition_for(&kv.key, n_reduce);
        buckets[r].push(kv);
    }
    buckets
}
