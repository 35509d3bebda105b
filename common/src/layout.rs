use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Nombre del intermedio que produce la tarea map `map_id` para `partition`.
pub fn intermediate_name(map_id: usize, partition: usize) -> String {
    format!("mr-{}-{}", map_id, partition)
}

/// Patrón que identifica los intermedios de una partición en todos los maps.
pub fn reduce_pattern(partition: usize) -> String {
    format!("mr-*-{}", partition)
}

pub fn expand_pattern(pattern: &str, map_id: usize) -> String {
    pattern.replace('*', &map_id.to_string())
}

/// Salida final de la partición `partition`.
pub fn output_name(partition: usize) -> String {
    format!("mr-out-{}", partition)
}

/// Escribe `name` dentro de `dir` a través de un temporal en el mismo
/// directorio y lo renombra al final. Nunca queda un archivo a medias bajo
/// el nombre definitivo.
pub fn commit_atomically<F>(dir: &Path, name: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir
    };
    fs::create_dir_all(dir).map_err(|e| Error::file(dir, e))?;

    let final_path = dir.join(name);
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}-", name))
        .tempfile_in(dir)
        .map_err(|e| Error::file(dir, e))?;

    {
        let mut writer = BufWriter::new(&mut tmp);
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(&final_path)
        .map_err(|e| Error::file(&final_path, e.error))?;

    // el rename vive en el directorio: sin esto puede perderse tras un crash
    fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| Error::file(dir, e))?;

    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn nombres_de_archivos() {
        assert_eq!(intermediate_name(3, 7), "mr-3-7");
        assert_eq!(reduce_pattern(7), "mr-*-7");
        assert_eq!(expand_pattern(&reduce_pattern(7), 3), intermediate_name(3, 7));
        assert_eq!(output_name(2), "mr-out-2");
    }

    #[test]
    fn commit_atomically_deja_solo_el_archivo_final() {
        let tmp = TempDir::new().unwrap();

        let path = commit_atomically(tmp.path(), "mr-out-0", |w| {
            writeln!(w, "hola 2")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(path, tmp.path().join("mr-out-0"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hola 2\n");

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["mr-out-0".to_string()]);
    }

    #[test]
    fn commit_atomically_reemplaza_salida_previa() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("mr-0-0"), "viejo\n").unwrap();

        commit_atomically(tmp.path(), "mr-0-0", |w| {
            w.write_all(b"nuevo\n")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("mr-0-0")).unwrap(),
            "nuevo\n"
        );
    }

    #[test]
    fn commit_atomically_crea_el_directorio_destino() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("work").join("out");

        let path = commit_atomically(&dir, "mr-out-3", |w| {
            w.write_all(b"x 1\n")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "x 1\n");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    }

    /// Si el escritor falla no debe aparecer nada bajo el nombre final.
    #[test]
    fn commit_atomically_no_publica_si_falla_la_escritura() {
        let tmp = TempDir::new().unwrap();

        let res = commit_atomically(tmp.path(), "mr-out-1", |w| {
            w.write_all(b"parcial")?;
            Err(Error::InvalidJob("falla a propósito".to_string()))
        });

        assert!(res.is_err());
        assert!(!tmp.path().join("mr-out-1").exists());
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
