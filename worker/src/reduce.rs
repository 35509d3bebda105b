use std::path::Path;

use anyhow::{Context, Result};
use common::{apps, apps::MapReduceApp, kv, layout, KeyValue, TaskId};
use tracing::debug;

/// Ejecuta una tarea reduce: junta los intermedios de la partición de los
/// `n_map` maps, ordena, agrupa por clave, reduce y publica `mr-out-<task>`.
pub fn run_reduce(
    app: &dyn MapReduceApp,
    task_id: TaskId,
    pattern: &str,
    n_map: usize,
    work_dir: &Path,
) -> Result<()> {
    let mut records: Vec<KeyValue> = Vec::new();
    for map_id in 0..n_map {
        let name = layout::expand_pattern(pattern, map_id);
        let path = work_dir.join(&name);
        let recs = kv::read_records(&path)
            .with_context(|| format!("reduce {}: intermedio ilegible {}", task_id, name))?;
        records.extend(recs);
    }

    let total = records.len();
    let out = layout::output_name(task_id);
    let mut distinct = 0;
    layout::commit_atomically(work_dir, &out, |w| {
        distinct = apps::reduce_all(app, records, w)?;
        Ok(())
    })
    .with_context(|| format!("no se pudo escribir {}", out))?;

    debug!(
        "reduce {}: {} registros, {} claves en {}",
        task_id, total, distinct, out
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::apps::WordCount;
    use std::fs;
    use tempfile::TempDir;

    fn write_intermediate(dir: &Path, name: &str, records: &[KeyValue]) {
        let mut f = fs::File::create(dir.join(name)).unwrap();
        kv::write_records(&mut f, records).unwrap();
    }

    #[test]
    fn run_reduce_junta_todos_los_maps() {
        let tmp = TempDir::new().unwrap();
        write_intermediate(
            tmp.path(),
            "mr-0-1",
            &[KeyValue::new("mundo", "1"), KeyValue::new("hola", "1")],
        );
        write_intermediate(tmp.path(), "mr-1-1", &[KeyValue::new("mundo", "1")]);

        run_reduce(&WordCount, 1, "mr-*-1", 2, tmp.path()).unwrap();

        let out = fs::read_to_string(tmp.path().join("mr-out-1")).unwrap();
        assert_eq!(out, "hola 1\nmundo 2\n");
    }

    #[test]
    fn run_reduce_con_intermedios_vacios_crea_salida_vacia() {
        let tmp = TempDir::new().unwrap();
        write_intermediate(tmp.path(), "mr-0-0", &[]);

        run_reduce(&WordCount, 0, "mr-*-0", 1, tmp.path()).unwrap();

        let out = fs::read_to_string(tmp.path().join("mr-out-0")).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn run_reduce_falla_si_falta_un_intermedio() {
        let tmp = TempDir::new().unwrap();
        write_intermediate(tmp.path(), "mr-0-0", &[KeyValue::new("a", "1")]);

        let res = run_reduce(&WordCount, 0, "mr-*-0", 2, tmp.path());
        assert!(res.is_err());
        assert!(!tmp.path().join("mr-out-0").exists());
    }
}
