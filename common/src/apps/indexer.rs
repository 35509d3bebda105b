use std::collections::BTreeSet;

use crate::kv::KeyValue;

use super::{tokens, MapReduceApp};

/// Índice invertido: palabra -> splits donde aparece.
pub struct Indexer;

impl MapReduceApp for Indexer {
    fn name(&self) -> &'static str {
        "indexer"
    }

    fn map(&self, split: &str, contents: &str) -> Vec<KeyValue> {
        let words: BTreeSet<String> = tokens(contents).collect();
        words
            .into_iter()
            .map(|w| KeyValue::new(w, split))
            .collect()
    }

    fn reduce(&self, _key: &str, values: &[String]) -> String {
        let docs: BTreeSet<&str> = values.iter().map(String::as_str).collect();
        let joined = docs.iter().copied().collect::<Vec<_>>().join(",");
        format!("{} {}", docs.len(), joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexer_map_emite_cada_palabra_una_vez_por_split() {
        let kvs = Indexer.map("a.txt", "uno dos uno");
        assert_eq!(
            kvs,
            vec![KeyValue::new("dos", "a.txt"), KeyValue::new("uno", "a.txt")]
        );
    }

    #[test]
    fn indexer_reduce_ordena_y_deduplica() {
        let values = vec![
            "b.txt".to_string(),
            "a.txt".to_string(),
            "b.txt".to_string(),
        ];
        assert_eq!(Indexer.reduce("uno", &values), "2 a.txt,b.txt");
    }
}
