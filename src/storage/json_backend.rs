use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::{
    core::{errors::StorageError, utils::ensure_dir},
    domain::PersistedRecipe,
};

use super::{RecipeStore, Result};

const RECORD_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores each record as a pretty-printed JSON file under
/// `<root>/<collection>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonRecipeStore {
    root: PathBuf,
}

impl JsonRecipeStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(canonical_name(collection))
    }

    pub fn record_path(&self, collection: &str, id: Uuid) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{}.{}", id, RECORD_EXTENSION))
    }
}

impl RecipeStore for JsonRecipeStore {
    fn put(&self, collection: &str, record: &PersistedRecipe) -> Result<Uuid> {
        let id = record.id.unwrap_or_else(Uuid::new_v4);
        let stored = PersistedRecipe {
            id: Some(id),
            ..record.clone()
        };
        let path = self.record_path(collection, id);
        let json = serde_json::to_string_pretty(&stored)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(collection, %id, "stored record");
        Ok(id)
    }

    fn get(&self, collection: &str, id: Uuid) -> Result<Option<PersistedRecipe>> {
        let path = self.record_path(collection, id);
        if !path.exists() {
            return Ok(None);
        }
        load_record_from_path(&path).map(Some)
    }

    fn list(&self, collection: &str) -> Result<Vec<PersistedRecipe>> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut records = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            records.push(load_record_from_path(&path)?);
        }
        records.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        Ok(records)
    }

    fn delete(&self, collection: &str, id: Uuid) -> Result<()> {
        let path = self.record_path(collection, id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

pub fn load_record_from_path(path: &Path) -> Result<PersistedRecipe> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "records".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecipeMetadata, RECIPES_COLLECTION};
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonRecipeStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonRecipeStore::new(temp.path().join("store")).expect("json store");
        (store, temp)
    }

    fn sample_record(name: &str) -> PersistedRecipe {
        PersistedRecipe {
            id: None,
            metadata: RecipeMetadata {
                name: Some(name.into()),
                ..RecipeMetadata::default()
            },
            categories: Default::default(),
            items: Vec::new(),
            archived: false,
            date_time: Utc::now(),
            nutrition: None,
        }
    }

    #[test]
    fn put_without_id_inserts_new_record() {
        let (store, _guard) = store_with_temp_dir();
        let id = store
            .put(RECIPES_COLLECTION, &sample_record("Pancakes"))
            .expect("put record");

        let loaded = store
            .get(RECIPES_COLLECTION, id)
            .expect("get record")
            .expect("record exists");
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.metadata.name.as_deref(), Some("Pancakes"));
    }

    #[test]
    fn put_with_id_overwrites() {
        let (store, _guard) = store_with_temp_dir();
        let id = store
            .put(RECIPES_COLLECTION, &sample_record("Draft"))
            .unwrap();
        let mut renamed = sample_record("Final");
        renamed.id = Some(id);
        let same = store.put(RECIPES_COLLECTION, &renamed).unwrap();

        assert_eq!(same, id);
        let all = store.list(RECIPES_COLLECTION).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].metadata.name.as_deref(), Some("Final"));
    }

    #[test]
    fn list_returns_newest_first() {
        let (store, _guard) = store_with_temp_dir();
        let mut older = sample_record("Older");
        older.date_time = Utc::now() - Duration::days(1);
        store.put(RECIPES_COLLECTION, &older).unwrap();
        store
            .put(RECIPES_COLLECTION, &sample_record("Newer"))
            .unwrap();

        let names: Vec<_> = store
            .list(RECIPES_COLLECTION)
            .unwrap()
            .into_iter()
            .filter_map(|record| record.metadata.name)
            .collect();
        assert_eq!(names, vec!["Newer".to_string(), "Older".to_string()]);
    }

    #[test]
    fn missing_records_are_reported() {
        let (store, _guard) = store_with_temp_dir();
        let id = Uuid::new_v4();
        assert!(store.get(RECIPES_COLLECTION, id).unwrap().is_none());
        assert!(matches!(
            store.delete(RECIPES_COLLECTION, id),
            Err(StorageError::NotFound(_))
        ));
    }
}
