use crate::kv::KeyValue;

use super::{tokens, MapReduceApp};

/// Conteo de palabras: cada token emite "1", reduce cuenta los valores.
pub struct WordCount;

impl MapReduceApp for WordCount {
    fn name(&self) -> &'static str {
        "wordcount"
    }

    fn map(&self, _split: &str, contents: &str) -> Vec<KeyValue> {
        tokens(contents).map(|t| KeyValue::new(t, "1")).collect()
    }

    fn reduce(&self, _key: &str, values: &[String]) -> String {
        values.len().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wordcount_map_emite_un_registro_por_token() {
        let kvs = WordCount.map("in.txt", "Hola hola, mundo!!\nmundo   mundo_prueba");
        let keys: Vec<&str> = kvs.iter().map(|kv| kv.key.as_str()).collect();
        assert_eq!(keys, vec!["hola", "hola", "mundo", "mundo", "mundo_prueba"]);
        assert!(kvs.iter().all(|kv| kv.value == "1"));
    }

    #[test]
    fn wordcount_on_empty_input_emits_nothing() {
        assert!(WordCount.map("vacio.txt", "").is_empty());
    }

    #[test]
    fn wordcount_reduce_cuenta_valores() {
        let values = vec!["1".to_string(); 3];
        assert_eq!(WordCount.reduce("mundo", &values), "3");
    }
}
