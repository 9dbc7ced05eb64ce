use std::collections::BTreeMap;
use std::path::PathBuf;

use rusty_quota::config::AppConfig;
use rusty_quota::data::{DatasetStore, LoadError, PathFile, Table, UploadedFile, load, load_batch};

// ---------------------------------------------------------------------------
// Upload slots
// ---------------------------------------------------------------------------

/// A named upload slot on the data page.
pub struct Slot {
    /// Dataset name used as the store key.
    pub key: &'static str,
    /// Label shown next to the upload button.
    pub label: &'static str,
}

/// Sales history first, then the catalogs.
pub const SLOTS: [Slot; 7] = [
    Slot { key: "ventas", label: "Sales history" },
    Slot { key: "productos", label: "Product catalog" },
    Slot { key: "rutas", label: "Route catalog" },
    Slot { key: "transporte", label: "Transport catalog" },
    Slot { key: "precios", label: "Price catalog" },
    Slot { key: "promos", label: "Promotions catalog" },
    Slot { key: "tiempo", label: "Time catalog" },
];

/// Outcome of the last upload into a slot.
pub enum SlotStatus {
    Loaded { filename: String },
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Tables loaded so far, keyed by dataset name.
    pub datasets: DatasetStore,

    /// Last upload outcome per dataset name.
    pub status: BTreeMap<String, SlotStatus>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            datasets: DatasetStore::new(),
            status: BTreeMap::new(),
        }
    }

    /// Load one file into the named dataset.
    pub fn load_into(&mut self, key: &str, path: PathBuf) {
        let mut file = PathFile::new(path);
        let result = load(&mut file, &self.config.load);
        self.record(key.to_string(), file.name().to_string(), result);
    }

    /// Load several files at once. Each goes to the dataset named by its file
    /// stem (`ventas.csv` → `ventas`).
    pub fn load_many(&mut self, paths: Vec<PathBuf>) {
        let files: Vec<(String, Box<dyn UploadedFile + Send>)> = paths
            .into_iter()
            .map(|path| {
                let key = dataset_key(&path);
                let file: Box<dyn UploadedFile + Send> = Box::new(PathFile::new(path));
                (key, file)
            })
            .collect();
        let names: Vec<String> = files.iter().map(|(_, f)| f.name().to_string()).collect();

        let results = load_batch(files, &self.config.load);
        for ((key, result), filename) in results.into_iter().zip(names) {
            self.record(key, filename, result);
        }
    }

    fn record(&mut self, key: String, filename: String, result: Result<Table, LoadError>) {
        match result {
            Ok(table) => {
                log::info!(
                    "Dataset '{key}' <- {filename} ({} rows, {} columns)",
                    table.num_rows(),
                    table.num_columns()
                );
                self.datasets.insert(key.clone(), table);
                self.status.insert(key, SlotStatus::Loaded { filename });
            }
            Err(e) => {
                log::error!("Failed to load {filename} into '{key}': {e}");
                // A stale table must not stay behind the error line.
                self.datasets.remove(&key);
                self.status.insert(
                    key,
                    SlotStatus::Failed {
                        message: e.to_string(),
                    },
                );
            }
        }
    }

    /// Datasets loaded from files that match no predefined slot.
    pub fn extra_keys(&self) -> Vec<String> {
        self.status
            .keys()
            .filter(|k| !SLOTS.iter().any(|s| s.key == k.as_str()))
            .cloned()
            .collect()
    }
}

/// Lower-cased file stem, or `dataset` for paths without one.
pub fn dataset_key(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "dataset".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_into_stores_table_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "historia.csv", "cliente,cuota\n1,100\n2,250\n");

        let mut state = AppState::new(AppConfig::default());
        state.load_into("ventas", path);

        assert_eq!(state.datasets.summary("ventas").map(|s| s.rows), Some(2));
        assert!(matches!(
            state.status.get("ventas"),
            Some(SlotStatus::Loaded { filename }) if filename == "historia.csv"
        ));
    }

    #[test]
    fn failed_load_drops_previous_table() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "ok.csv", "a\n1\n");
        let bad = write(dir.path(), "bad.csv", "a,b\n1,2\n3\n");

        let mut state = AppState::new(AppConfig::default());
        state.load_into("precios", good);
        state.load_into("precios", bad);

        assert!(!state.datasets.contains("precios"));
        assert!(state.datasets.is_empty());
        match state.status.get("precios") {
            Some(SlotStatus::Failed { message }) => assert!(message.contains("bad.csv")),
            _ => panic!("expected a failed status"),
        }
    }

    #[test]
    fn load_many_keys_by_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write(dir.path(), "Rutas.csv", "ruta\nR1\n"),
            write(dir.path(), "extra.csv", "x\n1\n"),
            write(dir.path(), "notes.txt", "hola"),
        ];

        let mut state = AppState::new(AppConfig::default());
        state.load_many(paths);

        assert!(state.datasets.contains("rutas"));
        assert!(state.datasets.contains("extra"));
        assert!(matches!(state.status.get("notes"), Some(SlotStatus::Failed { .. })));
        assert_eq!(state.extra_keys(), vec!["extra".to_string(), "notes".to_string()]);
    }
}
