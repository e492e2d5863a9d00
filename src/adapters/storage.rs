use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// Serializes the drift payload as `{"response": ...}` and writes it once.
pub async fn write_summary<S: Storage>(storage: &S, path: &str, payload: &str) -> Result<()> {
    let body = serde_json::to_vec(&crate::core::reporter::summary_json(payload))?;
    storage.write_file(path, &body).await?;
    tracing::info!("📁 Summary written to {}", path);
    Ok(())
}
