use std::{fs, path::Path};

use tracing::info;

use crate::apps::{self, MapReduceApp};
use crate::error::{Error, Result};
use crate::kv::KeyValue;
use crate::layout;

/// MapReduce en un solo proceso, sin particionar. Sirve como referencia
/// para comparar contra la salida distribuida.
pub fn run_sequential<P: AsRef<Path>>(
    app: &dyn MapReduceApp,
    splits: &[P],
    out_path: &Path,
) -> Result<usize> {
    let mut intermediate: Vec<KeyValue> = Vec::new();

    for split in splits {
        let split = split.as_ref();
        let bytes = fs::read(split).map_err(|e| Error::file(split, e))?;
        let contents = String::from_utf8_lossy(&bytes);
        let name = split.to_string_lossy();
        intermediate.extend(app.map(&name, &contents));
    }

    let dir = out_path.parent().unwrap_or_else(|| Path::new(""));
    let name = out_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| Error::InvalidJob(format!("ruta de salida inválida: {}", out_path.display())))?;

    let mut distinct = 0;
    layout::commit_atomically(dir, &name, |w| {
        distinct = apps::reduce_all(app, intermediate, w)?;
        Ok(())
    })?;

    info!(
        "secuencial {}: {} splits -> {} claves en {}",
        app.name(),
        splits.len(),
        distinct,
        out_path.display()
    );
    Ok(distinct)
}
