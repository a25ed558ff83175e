//! JSON files holding the nested-array form of a tree

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::{Tree, TreeRecord};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::FileSystem;
use crate::util::path::PathExt;

/// Parse a nested array. Blank input is an empty tree.
pub fn parse_records<T: DeserializeOwned>(content: &str) -> Result<Vec<TreeRecord<T>>, serde_json::Error> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(content)
}

pub fn to_json<T: Serialize>(records: &[TreeRecord<T>], pretty: bool) -> InfraResult<String> {
    let result = if pretty {
        serde_json::to_string_pretty(records)
    } else {
        serde_json::to_string(records)
    };
    result.map_err(|e| InfraError::json("serialize tree", e))
}

#[derive(Clone)]
pub struct TreeStore {
    fs: Arc<dyn FileSystem>,
}

impl TreeStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a tree; duplicate ids in the file abort the load.
    #[instrument(level = "debug", skip(self))]
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> InfraResult<Tree<T>> {
        if !path.is_json_file() {
            warn!("{} has no .json extension", path.display());
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        let records = parse_records::<T>(&content)
            .map_err(|e| InfraError::json(format!("parse {}", path.display()), e))?;
        let tree = Tree::from_records(records)?;
        debug!("loaded {} nodes from {}", tree.len(), path.display());
        Ok(tree)
    }

    /// Like `load`, but a missing file yields an empty tree.
    pub fn load_or_new<T: DeserializeOwned>(&self, path: &Path) -> InfraResult<Tree<T>> {
        if self.fs.exists(path) {
            self.load(path)
        } else {
            debug!("{} does not exist, starting empty", path.display());
            Ok(Tree::new())
        }
    }

    #[instrument(level = "debug", skip(self, records))]
    pub fn save<T: Serialize>(&self, path: &Path, records: &[TreeRecord<T>], pretty: bool) -> InfraResult<()> {
        let mut content = to_json(records, pretty)?;
        content.push('\n');
        self.fs
            .write(path, &content)
            .map_err(|e| InfraError::io(format!("write {}", path.display()), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::{DomainError, NodeId, Payload};
    use crate::infrastructure::traits::RealFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn store() -> TreeStore {
        TreeStore::new(Arc::new(RealFileSystem))
    }

    #[test]
    fn given_tree_file_when_load_then_builds_tree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, r#"[{"id":1,"name":"beds","children":[{"id":4,"name":"pelechy","children":[]}]}]"#)
            .unwrap();

        let tree: Tree<Payload> = store().load(&path).unwrap();

        assert_eq!(tree.len(), 2);
        assert!(tree.contains_id(&NodeId::from(4)));
    }

    #[test]
    fn given_duplicate_ids_when_load_then_domain_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, r#"[{"id":1,"children":[]},{"id":1,"children":[]}]"#).unwrap();

        let err = store().load::<Payload>(&path).unwrap_err();

        match err {
            InfraError::Application(ApplicationError::Domain(e)) => {
                assert_eq!(e, DomainError::DuplicateIdentifier(NodeId::from(1)))
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn given_invalid_json_when_load_then_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, "[{").unwrap();

        let err = store().load::<Payload>(&path).unwrap_err();
        assert!(matches!(err, InfraError::Json { .. }));
    }

    #[test]
    fn given_missing_file_when_load_or_new_then_empty() {
        let dir = TempDir::new().unwrap();
        let tree: Tree<Payload> = store().load_or_new(&dir.path().join("none.json")).unwrap();
        assert!(tree.is_empty());

        let err = store().load::<Payload>(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, InfraError::Io { .. }));
    }

    #[test]
    fn given_typed_payload_without_default_when_load_then_builds_tree() {
        #[derive(Debug, serde::Deserialize)]
        struct Category {
            name: String,
        }

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, r#"[{"id":1,"name":"beds","children":[{"id":4,"name":"pelechy"}]}]"#).unwrap();

        let tree: Tree<Category> = store().load(&path).unwrap();

        let pelechy = tree.find(&NodeId::from(4)).unwrap();
        assert_eq!(tree.node(pelechy).unwrap().data().unwrap().name, "pelechy");
    }

    #[test]
    fn given_blank_file_when_load_then_empty_tree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, "\n").unwrap();

        let tree: Tree<Payload> = store().load(&path).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn given_tree_when_save_then_file_reloads_equal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.json");
        let records: Vec<TreeRecord> =
            serde_json::from_str(r#"[{"id":"a","children":[{"id":0,"label":"zero"}]}]"#).unwrap();
        let tree = Tree::from_records(records).unwrap();

        store().save(&path, &tree.to_array(), false).unwrap();
        let reloaded: Tree<Payload> = store().load(&path).unwrap();

        assert_eq!(reloaded.to_array(), tree.to_array());
    }
}
