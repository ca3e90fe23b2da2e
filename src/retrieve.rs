//! Example retrieval
//!
//! Extraction in reverse: given combination keys, re-scan raw CoNLL-U
//! sources and collect the literal text of every sentence whose tree
//! realizes a key. Matching goes through [`extract::realizes`], the same
//! rules extraction applies, so every returned sentence would reproduce
//! its key if re-extracted.
//!
//! This is a full re-scan of the raw sources per call: an offline batch
//! operation, not a low-latency lookup.

use crate::combination::Combination;
use crate::conllu::{FileSentenceReader, ParseError};
use crate::counter::Counter;
use crate::extract;
use crate::tree::Sentence;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Encoded combination key → literal example sentence texts
pub type Examples = FxHashMap<String, Vec<String>>;

/// Error opening a source file for retrieval
#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("cannot open source `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Collect example sentences for every key of a frequency table
///
/// `table` is typically the output of a query filter. Keys that do not
/// parse as combinations are dropped; sentences that fail to parse, or
/// carry no literal text, are skipped. Unopenable files are loud errors.
pub fn find_examples(table: &Counter, files: &[PathBuf]) -> Result<Examples, RetrieveError> {
    let keys: Vec<Combination> = table
        .keys()
        .filter_map(|key| match Combination::parse(key) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                debug!("dropping unparsable key: {e}");
                None
            }
        })
        .collect();

    let mut examples = Examples::default();
    for path in files {
        info!("scanning `{}` for examples", path.display());
        let reader = FileSentenceReader::from_path(path).map_err(|source| RetrieveError::Io {
            path: path.clone(),
            source,
        })?;
        scan_sentences(&keys, reader, &mut examples);
    }
    Ok(examples)
}

/// Match keys against one stream of parsed sentences
///
/// Separated from the file handling so in-memory corpora can be scanned
/// directly.
pub fn scan_sentences<I>(keys: &[Combination], sentences: I, examples: &mut Examples)
where
    I: IntoIterator<Item = Result<Sentence, ParseError>>,
{
    for result in sentences {
        let sentence = match result {
            Ok(sentence) => sentence,
            Err(e) => {
                warn!("skipping unparsable sentence: {e}");
                continue;
            }
        };
        let Some(text) = sentence.text.as_deref() else {
            continue;
        };
        for key in keys {
            if extract::realizes(&sentence, key) {
                examples
                    .entry(key.encode())
                    .or_default()
                    .push(text.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conllu::SentenceReader;

    const CORPUS: &str = "\
# text = Он не читал книгу.
1\tОн\tон\tPRON\t_\t_\t2\tnsubj\t_\t_
2\tне\tне\tPART\t_\t_\t3\tadvmod\t_\t_
3\tчитал\tчитать\tVERB\t_\t_\t0\troot\t_\t_
4\tкнигу\tкнига\tNOUN\t_\tCase=Acc|Number=Sing|Animacy=Inan\t3\tobj\t_\t_
5\t.\t.\tPUNCT\t_\t_\t3\tpunct\t_\t_

# text = Он читал книгу.
1\tОн\tон\tPRON\t_\t_\t2\tnsubj\t_\t_
2\tчитал\tчитать\tVERB\t_\t_\t0\troot\t_\t_
3\tкнигу\tкнига\tNOUN\t_\tCase=Acc|Number=Sing|Animacy=Inan\t2\tobj\t_\t_

# text = Он читал три книги.
1\tОн\tон\tPRON\t_\t_\t2\tnsubj\t_\t_
2\tчитал\tчитать\tVERB\t_\t_\t0\troot\t_\t_
3\tтри\tтри\tNUM\t_\t_\t4\tnummod\t_\t_
4\tкниги\tкнига\tNOUN\t_\tCase=Acc|Number=Sing|Animacy=Inan\t2\tobj\t_\t_
";

    fn keys(raw: &[&str]) -> Vec<Combination> {
        raw.iter().map(|k| Combination::parse(k).unwrap()).collect()
    }

    #[test]
    fn test_negated_key_matches_only_negated_sentence() {
        let keys = keys(&["не_читать__NO__книга__Acc__Sing__Inan__obj"]);
        let mut examples = Examples::default();
        scan_sentences(&keys, SentenceReader::from_str(CORPUS), &mut examples);

        let texts = &examples["не_читать__NO__книга__Acc__Sing__Inan__obj"];
        assert_eq!(texts, &vec!["Он не читал книгу.".to_string()]);
    }

    #[test]
    fn test_numeral_sentence_never_matches() {
        // "Он читал три книги." realizes no key: its noun has a NUM child
        let keys = keys(&["читать__NO__книга__Acc__Sing__Inan__obj"]);
        let mut examples = Examples::default();
        scan_sentences(&keys, SentenceReader::from_str(CORPUS), &mut examples);

        let texts = &examples["читать__NO__книга__Acc__Sing__Inan__obj"];
        assert_eq!(texts, &vec!["Он читал книгу.".to_string()]);
    }

    #[test]
    fn test_unmatched_key_yields_no_entry() {
        let keys = keys(&["писать__NO__письмо__Acc__Sing__Inan__obj"]);
        let mut examples = Examples::default();
        scan_sentences(&keys, SentenceReader::from_str(CORPUS), &mut examples);
        assert!(examples.is_empty());
    }

    #[test]
    fn test_sentence_without_text_skipped() {
        let no_text = "\
1\tчитал\tчитать\tVERB\t_\t_\t0\troot\t_\t_
2\tкнигу\tкнига\tNOUN\t_\tCase=Acc|Number=Sing|Animacy=Inan\t1\tobj\t_\t_
";
        let keys = keys(&["читать__NO__книга__Acc__Sing__Inan__obj"]);
        let mut examples = Examples::default();
        scan_sentences(&keys, SentenceReader::from_str(no_text), &mut examples);
        assert!(examples.is_empty());
    }

    #[test]
    fn test_retrieved_sentences_reproduce_their_key() {
        use crate::government::Government;
        use crate::stats::Statistics;

        // Extract everything, then retrieve for every extracted key:
        // each returned sentence's own extraction must contain the key.
        let gov = Government::default();
        let mut stats = Statistics::new();
        stats.scan(SentenceReader::from_str(CORPUS), &gov, None);

        let all_keys: Vec<Combination> = stats
            .combinations
            .keys()
            .map(|k| Combination::parse(k).unwrap())
            .collect();
        let mut examples = Examples::default();
        scan_sentences(&all_keys, SentenceReader::from_str(CORPUS), &mut examples);

        for key in &all_keys {
            let texts = &examples[&key.encode()];
            assert!(!texts.is_empty());
            for sentence in SentenceReader::from_str(CORPUS).map(Result::unwrap) {
                if texts.contains(sentence.text.as_ref().unwrap()) {
                    let out = extract::combinations(&sentence, &gov);
                    assert!(out.correct.contains(key));
                }
            }
        }
    }

    #[test]
    fn test_find_examples_over_files() {
        use std::fs;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.conllu");
        fs::write(&path, CORPUS).unwrap();

        let mut table = Counter::new();
        table.add("не_читать__NO__книга__Acc__Sing__Inan__obj");
        let examples = find_examples(&table, &[path]).unwrap();
        assert_eq!(
            examples["не_читать__NO__книга__Acc__Sing__Inan__obj"],
            vec!["Он не читал книгу.".to_string()]
        );

        let missing = find_examples(&table, &[dir.path().join("absent.conllu")]);
        assert!(missing.is_err());
    }
}
