use std::fs::File;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::Path;

use crate::dataset::model::Dataset;
use crate::foundation::error::{InkError, InkResult};
use crate::stroke::model::Variant;

impl Dataset {
    /// Serialize as pretty-printed schema v1 JSON.
    pub fn to_json_string(&self) -> InkResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InkError::serde(format!("encode dataset JSON: {e}")))
    }

    /// Parse and validate a dataset from JSON text.
    pub fn from_json_str(s: &str) -> InkResult<Self> {
        let ds: Dataset = serde_json::from_str(s)
            .map_err(|e| InkError::serde(format!("parse dataset JSON: {e}")))?;
        ds.validate()?;
        Ok(ds)
    }

    /// Parse and validate a dataset from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> InkResult<Self> {
        let ds: Dataset = serde_json::from_reader(r)
            .map_err(|e| InkError::serde(format!("parse dataset JSON: {e}")))?;
        ds.validate()?;
        Ok(ds)
    }

    /// Load a dataset file.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> InkResult<Self> {
        let f = File::open(path)
            .map_err(|e| InkError::io(format!("open dataset '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Write the dataset to `path`, creating parent directories.
    ///
    /// The file is written next to its destination and renamed into place, so readers never
    /// observe a truncated dataset.
    #[tracing::instrument(skip(self), fields(variants = self.variant_count()))]
    pub fn write_to_path(&self, path: &Path) -> InkResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                InkError::io(format!("create dataset dir '{}': {e}", parent.display()))
            })?;
        }
        let json = self.to_json_string()?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = Path::new(&tmp_name);
        let f = File::create(tmp)
            .map_err(|e| InkError::io(format!("create '{}': {e}", tmp.display())))?;
        let mut w = BufWriter::new(f);
        let written = w
            .write_all(json.as_bytes())
            .and_then(|()| w.flush())
            .map_err(|e| InkError::io(format!("write '{}': {e}", tmp.display())));
        drop(w);
        let result = written.and_then(|()| {
            std::fs::rename(tmp, path)
                .map_err(|e| InkError::io(format!("replace '{}': {e}", path.display())))
        });
        if result.is_err() {
            let _ = std::fs::remove_file(tmp);
        }
        result
    }
}

/// Serialize one variant in its persisted shape.
pub fn variant_to_json(v: &Variant) -> InkResult<String> {
    serde_json::to_string(v).map_err(|e| InkError::serde(format!("encode variant JSON: {e}")))
}

/// Parse one variant in its persisted shape.
pub fn variant_from_json(s: &str) -> InkResult<Variant> {
    serde_json::from_str(s).map_err(|e| InkError::serde(format!("parse variant JSON: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/io.rs"]
mod tests;
