use std::path::PathBuf;

use thiserror::Error;

/// Startup-only failures.
///
/// The pipeline itself is total over user input: missing fields degrade,
/// lookup misses surface as warnings or missing prices. Only reference-data
/// loading can fail, and it fails before any request is served.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read reference file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse reference file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("reference table `{0}` is empty")]
    EmptyTable(&'static str),
    #[error("duplicate key in reference table `{table}`: {key}")]
    DuplicateKey { table: &'static str, key: String },
    #[error("defaults document is missing `{0}`")]
    MissingDefault(&'static str),
}

#[cfg(test)]
mod tests {
    use super::CatalogError;

    #[test]
    fn duplicate_key_message_names_table_and_key() {
        let error =
            CatalogError::DuplicateKey { table: "span_table", key: "isodec/eps/100".to_string() };
        let message = error.to_string();
        assert!(message.contains("span_table"));
        assert!(message.contains("isodec/eps/100"));
    }
}
