//! Statistics persistence
//!
//! The collaborator between the pure aggregation core and the filesystem:
//! collects statistics for a CoNLL-U source into a JSON record next to it,
//! reads them back, and joins per-source records into corpus-level ones.
//! Directories come from an explicit [`StoreConfig`]; nothing here is
//! process-global.
//!
//! Collection is idempotent at this boundary: an existing record
//! short-circuits the scan. Missing prerequisites and name conflicts are
//! loud errors raised before anything is written.

use crate::conllu::FileSentenceReader;
use crate::government::Government;
use crate::stats::{CancelFlag, ScanReport, Statistics};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error at the persistence boundary
#[derive(Debug, Error)]
pub enum StoreError {
    /// Statistics requested for a source that has not been collected yet
    #[error("statistics for `{0}` not found; collect the source first")]
    MissingStatistics(String),

    /// Refusing to overwrite an existing statistics record
    #[error("statistics name `{0}` already exists; choose another name")]
    NameTaken(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Where source corpora live and where statistics records go
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub conllu_dir: PathBuf,
    pub stats_dir: PathBuf,
}

/// Derive a statistics record name from a source file name
/// (`news.conllu` and `news.conllu.gz` both map to `news`)
pub fn stats_name(source: &str) -> &str {
    let name = source.strip_suffix(".gz").unwrap_or(source);
    name.strip_suffix(".conllu").unwrap_or(name)
}

/// Filesystem store for per-source and joined statistics
#[derive(Debug, Clone)]
pub struct StatsStore {
    config: StoreConfig,
}

impl StatsStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Path of the statistics record for a source file
    pub fn stats_path(&self, source: &str) -> PathBuf {
        self.record_path(stats_name(source))
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.config.stats_dir.join(format!("{name}.json"))
    }

    /// Whether a source already has a statistics record
    pub fn is_collected(&self, source: &str) -> bool {
        self.stats_path(source).exists()
    }

    /// Scan one source corpus and persist its statistics
    ///
    /// Returns `None` without scanning when the record already exists.
    /// A cancelled scan persists nothing and reports the cancellation.
    pub fn collect(
        &self,
        source: &str,
        government: &Government,
        cancel: Option<&CancelFlag>,
    ) -> Result<Option<ScanReport>, StoreError> {
        if self.is_collected(source) {
            info!("statistics for `{source}` already collected, skipping");
            return Ok(None);
        }

        info!("collecting statistics from `{source}`");
        let reader = FileSentenceReader::from_path(&self.config.conllu_dir.join(source))?;
        let mut stats = Statistics::new();
        let report = stats.scan(reader, government, cancel);

        if report.cancelled {
            info!("collection of `{source}` cancelled, nothing persisted");
            return Ok(Some(report));
        }

        self.write_record(&self.stats_path(source), &stats)?;
        Ok(Some(report))
    }

    /// Read the persisted statistics for a source
    pub fn read(&self, source: &str) -> Result<Statistics, StoreError> {
        let path = self.stats_path(source);
        if !path.exists() {
            return Err(StoreError::MissingStatistics(source.to_string()));
        }
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Join the statistics of several sources into one record
    ///
    /// Every source must already be collected and `save_to` (when given)
    /// must not collide with an existing record; both checks run before
    /// any read or write. Merge-order effects on equal-count ordering are
    /// accepted, see [`Statistics::merge`].
    pub fn join(
        &self,
        sources: &[&str],
        save_to: Option<&str>,
    ) -> Result<Statistics, StoreError> {
        for source in sources {
            if !self.is_collected(source) {
                return Err(StoreError::MissingStatistics(source.to_string()));
            }
        }
        if let Some(name) = save_to {
            if self.record_path(name).exists() {
                return Err(StoreError::NameTaken(name.to_string()));
            }
        }

        let mut total = Statistics::new();
        for source in sources {
            total.merge(&self.read(source)?);
        }

        if let Some(name) = save_to {
            self.write_record(&self.record_path(name), &total)?;
            info!("joined statistics of {} sources into `{name}`", sources.len());
        }
        Ok(total)
    }

    fn write_record(&self, path: &Path, stats: &Statistics) -> Result<(), StoreError> {
        fs::write(path, serde_json::to_string(stats)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::government::Government;
    use tempfile::TempDir;

    const CORPUS: &str = "\
# text = Он вошёл в дом.
1\tОн\tон\tPRON\t_\t_\t2\tnsubj\t_\t_
2\tвошёл\tвойти\tVERB\t_\t_\t0\troot\t_\t_
3\tв\tв\tADP\t_\t_\t4\tcase\t_\t_
4\tдом\tдом\tNOUN\t_\tCase=Acc|Number=Sing|Animacy=Inan\t2\tobl\t_\t_
5\t.\t.\tPUNCT\t_\t_\t2\tpunct\t_\t_
";

    fn government() -> Government {
        Government::from_entries([(
            "в".to_string(),
            vec!["Acc".to_string(), "Loc".to_string()],
        )])
    }

    fn store(dir: &TempDir) -> StatsStore {
        StatsStore::new(StoreConfig {
            conllu_dir: dir.path().to_path_buf(),
            stats_dir: dir.path().to_path_buf(),
        })
    }

    fn write_corpus(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), CORPUS).unwrap();
    }

    #[test]
    fn test_stats_name_derivation() {
        assert_eq!(stats_name("news.conllu"), "news");
        assert_eq!(stats_name("news.conllu.gz"), "news");
        assert_eq!(stats_name("joined"), "joined");
    }

    #[test]
    fn test_collect_then_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        write_corpus(&dir, "news.conllu");
        let store = store(&dir);

        let report = store.collect("news.conllu", &government(), None).unwrap();
        assert!(report.is_some());

        let stats = store.read("news.conllu").unwrap();
        assert_eq!(stats.sentences, 1);
        assert_eq!(stats.combinations.get("войти__в__дом__Acc__Sing__Inan__obl"), 1);
    }

    #[test]
    fn test_collect_is_idempotent_at_boundary() {
        let dir = TempDir::new().unwrap();
        write_corpus(&dir, "news.conllu");
        let store = store(&dir);

        store.collect("news.conllu", &government(), None).unwrap();
        let second = store.collect("news.conllu", &government(), None).unwrap();
        assert!(second.is_none());

        // And nothing double-counted
        let stats = store.read("news.conllu").unwrap();
        assert_eq!(stats.sentences, 1);
    }

    #[test]
    fn test_cancelled_collect_persists_nothing() {
        let dir = TempDir::new().unwrap();
        write_corpus(&dir, "news.conllu");
        let store = store(&dir);

        let cancel = CancelFlag::new();
        cancel.cancel();
        let report = store
            .collect("news.conllu", &government(), Some(&cancel))
            .unwrap()
            .unwrap();
        assert!(report.cancelled);
        assert!(!store.is_collected("news.conllu"));
    }

    #[test]
    fn test_join_requires_all_prerequisites() {
        let dir = TempDir::new().unwrap();
        write_corpus(&dir, "news.conllu");
        let store = store(&dir);
        store.collect("news.conllu", &government(), None).unwrap();

        let err = store.join(&["news.conllu", "wiki.conllu"], None).unwrap_err();
        assert!(matches!(err, StoreError::MissingStatistics(ref s) if s == "wiki.conllu"));
    }

    #[test]
    fn test_join_refuses_name_conflict() {
        let dir = TempDir::new().unwrap();
        write_corpus(&dir, "news.conllu");
        let store = store(&dir);
        store.collect("news.conllu", &government(), None).unwrap();

        // "news" is taken by the per-source record
        let err = store.join(&["news.conllu"], Some("news")).unwrap_err();
        assert!(matches!(err, StoreError::NameTaken(ref s) if s == "news"));
    }

    #[test]
    fn test_join_merges_and_saves() {
        let dir = TempDir::new().unwrap();
        write_corpus(&dir, "news.conllu");
        write_corpus(&dir, "wiki.conllu");
        let store = store(&dir);
        let gov = government();
        store.collect("news.conllu", &gov, None).unwrap();
        store.collect("wiki.conllu", &gov, None).unwrap();

        let total = store
            .join(&["news.conllu", "wiki.conllu"], Some("all"))
            .unwrap();
        assert_eq!(total.sentences, 2);
        assert_eq!(total.verbs.get("войти"), 2);

        let reloaded = store.read("all").unwrap();
        assert_eq!(reloaded.sentences, 2);
    }
}
