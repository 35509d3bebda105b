mod indexer;
mod wordcount;

use std::io::Write;

use crate::error::{Error, Result};
use crate::kv::KeyValue;

pub use indexer::Indexer;
pub use wordcount::WordCount;

/// Par de funciones map/reduce de un job. Deben ser puras: una tarea puede
/// ejecutarse más de una vez y el resultado tiene que ser el mismo.
pub trait MapReduceApp: Send + Sync {
    fn name(&self) -> &'static str;

    fn map(&self, split: &str, contents: &str) -> Vec<KeyValue>;

    fn reduce(&self, key: &str, values: &[String]) -> String;
}

pub fn by_name(name: &str) -> Result<Box<dyn MapReduceApp>> {
    match name {
        "wordcount" | "wc" => Ok(Box::new(WordCount)),
        "indexer" => Ok(Box::new(Indexer)),
        other => Err(Error::UnknownApp(other.to_string())),
    }
}

/// Ordena por clave, agrupa las corridas de claves iguales y escribe una
/// línea `clave salida` por clave distinta.
pub fn reduce_all<W: Write>(
    app: &dyn MapReduceApp,
    mut records: Vec<KeyValue>,
    writer: &mut W,
) -> Result<usize> {
    records.sort_by(|a, b| a.key.cmp(&b.key));

    let mut distinct = 0;
    let mut i = 0;
    while i < records.len() {
        let mut j = i + 1;
        while j < records.len() && records[j].key == records[i].key {
            j += 1;
        }
        let values: Vec<String> = records[i..j].iter().map(|kv| kv.value.clone()).collect();
        let output = app.reduce(&records[i].key, &values);
        writeln!(writer, "{} {}", records[i].key, output)?;

        distinct += 1;
        i = j;
    }

    Ok(distinct)
}

/// Tokens normalizados: solo alfanumérico y '_', en minúscula.
pub(crate) fn tokens(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents.split_whitespace().filter_map(|raw| {
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase();
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_name_resuelve_apps_conocidas() {
        assert_eq!(by_name("wordcount").unwrap().name(), "wordcount");
        assert_eq!(by_name("wc").unwrap().name(), "wordcount");
        assert_eq!(by_name("indexer").unwrap().name(), "indexer");
        assert!(matches!(by_name("grep"), Err(Error::UnknownApp(_))));
    }

    #[test]
    fn reduce_all_agrupa_claves_iguales_en_orden() {
        let records = vec![
            KeyValue::new("mundo", "1"),
            KeyValue::new("hola", "1"),
            KeyValue::new("mundo", "1"),
            KeyValue::new("adios", "1"),
        ];
        let mut out = Vec::new();
        let n = reduce_all(&WordCount, records, &mut out).unwrap();

        assert_eq!(n, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "adios 1\nhola 1\nmundo 2\n"
        );
    }

    #[test]
    fn reduce_all_sin_registros_no_escribe_nada() {
        let mut out = Vec::new();
        assert_eq!(reduce_all(&WordCount, Vec::new(), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn tokens_normaliza_y_descarta_vacios() {
        let toks: Vec<String> = tokens("Hola hola, mundo!! -- mundo_prueba").collect();
        assert_eq!(toks, vec!["hola", "hola", "mundo", "mundo_prueba"]);
    }
}
