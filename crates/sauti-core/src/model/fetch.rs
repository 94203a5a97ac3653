//! Weight snapshot fetching from the HuggingFace Hub

use hf_hub::api::sync::ApiBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Downloads a model's weight snapshot into a local cache directory.
///
/// Fetching is idempotent: files already present in the cache are reused
/// rather than re-downloaded, and a fully cached snapshot keeps working when
/// the hub is unreachable.
pub struct SnapshotFetcher {
    cache_dir: PathBuf,
    token: Option<String>,
}

impl SnapshotFetcher {
    pub fn new(cache_dir: PathBuf, token: Option<String>) -> Self {
        Self { cache_dir, token }
    }

    /// Fetch every file of `model_id` and return the local snapshot directory.
    pub fn fetch(&self, model_id: &str) -> Result<PathBuf> {
        match self.fetch_remote(model_id) {
            Ok(snapshot_dir) => Ok(snapshot_dir),
            Err(err) => {
                // The hub may be unreachable; a previously fetched snapshot
                // is still good.
                if let Some(cached) = self.cached_snapshot(model_id) {
                    warn!(
                        "Hub fetch for {} failed ({}), reusing cached snapshot {:?}",
                        model_id, err, cached
                    );
                    return Ok(cached);
                }
                Err(err)
            }
        }
    }

    fn fetch_remote(&self, model_id: &str) -> Result<PathBuf> {
        let api = ApiBuilder::new()
            .with_cache_dir(self.cache_dir.clone())
            .with_token(self.token.clone())
            .build()?;
        let repo = api.model(model_id.to_string());

        let repo_info = repo.info()?;
        if repo_info.siblings.is_empty() {
            return Err(Error::ModelFetchError(format!(
                "model {} has no files",
                model_id
            )));
        }

        info!(
            "Fetching {} files for {} into {:?}",
            repo_info.siblings.len(),
            model_id,
            self.cache_dir
        );

        let mut snapshot_dir = None;
        for sibling in &repo_info.siblings {
            let local_path = repo.get(&sibling.rfilename)?;
            debug!("Fetched {} -> {:?}", sibling.rfilename, local_path);
            if snapshot_dir.is_none() {
                snapshot_dir = Some(snapshot_root(&local_path, &sibling.rfilename));
            }
        }

        snapshot_dir.ok_or_else(|| {
            Error::ModelFetchError(format!("no snapshot directory resolved for {}", model_id))
        })
    }

    /// Locate an already-downloaded snapshot for `model_id`, if any.
    ///
    /// Resolves the commit through `refs/main` when present, otherwise falls
    /// back to the last entry under `snapshots/`.
    pub fn cached_snapshot(&self, model_id: &str) -> Option<PathBuf> {
        let repo_dir = self.cache_dir.join(repo_dir_name(model_id));
        let snapshots = repo_dir.join("snapshots");

        if let Ok(commit) = std::fs::read_to_string(repo_dir.join("refs").join("main")) {
            let snapshot = snapshots.join(commit.trim());
            if snapshot.is_dir() {
                return Some(snapshot);
            }
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(&snapshots)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        entries.sort();
        entries.pop()
    }
}

/// Strip the repo-relative filename back off a fetched file path to get the
/// snapshot directory. Handles nested rfilenames like `vocab/merges.txt`.
fn snapshot_root(local_path: &Path, rfilename: &str) -> PathBuf {
    let depth = Path::new(rfilename).components().count();
    let mut root = local_path.to_path_buf();
    for _ in 0..depth {
        root.pop();
    }
    root
}

/// Cache directory name for a repo id, e.g. `coqui/XTTS-v2` ->
/// `models--coqui--XTTS-v2`.
fn repo_dir_name(model_id: &str) -> String {
    format!("models--{}", model_id.replace('/', "--"))
}
