//! CoNLL-U file parsing
//!
//! Reads CoNLL-U files (plain or gzipped) into [`Sentence`] structures.
//! Sentences are separated by blank lines; `# text = ...` comments are
//! captured as the literal sentence text. A malformed token line fails
//! only its own sentence: the reader yields a per-sentence `Result` and
//! keeps going, so noisy corpora never abort a whole file.
//!
//! CoNLL-U format: https://universaldependencies.org/format.html

use crate::tree::{Features, Sentence, Token, TokenId};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;
use thiserror::Error;

/// Error for one unparsable sentence (or an I/O failure mid-file)
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parse error at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("I/O error at line {line}: {source}")]
    Io {
        line: usize,
        source: std::io::Error,
    },
}

impl ParseError {
    fn malformed(line: usize, message: impl Into<String>) -> Self {
        ParseError::Malformed {
            line,
            message: message.into(),
        }
    }
}

/// Iterator over the sentences of a CoNLL-U source
pub struct SentenceReader<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
}

/// Reader over a file, transparently gunzipping `.gz` paths
pub type FileSentenceReader = SentenceReader<BufReader<Box<dyn Read + Send>>>;

impl FileSentenceReader {
    /// Open a CoNLL-U file; `.gz` paths are decompressed on the fly
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let raw: Box<dyn Read + Send> = if path.extension().is_some_and(|e| e == "gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Self {
            lines: BufReader::new(raw).lines(),
            line_num: 0,
        })
    }
}

impl SentenceReader<BufReader<std::io::Cursor<String>>> {
    /// Read sentences from an in-memory CoNLL-U string
    pub fn from_str(text: &str) -> Self {
        let cursor = std::io::Cursor::new(text.to_string());
        Self {
            lines: BufReader::new(cursor).lines(),
            line_num: 0,
        }
    }
}

impl<R: BufRead> Iterator for SentenceReader<R> {
    type Item = Result<Sentence, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut token_lines = Vec::new();
        let mut text = None;

        loop {
            self.line_num += 1;
            match self.lines.next() {
                None => {
                    if token_lines.is_empty() {
                        return None;
                    }
                    break;
                }
                Some(Err(e)) => {
                    return Some(Err(ParseError::Io {
                        line: self.line_num,
                        source: e,
                    }));
                }
                Some(Ok(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        if token_lines.is_empty() {
                            continue;
                        }
                        break;
                    }
                    if let Some(comment) = line.strip_prefix('#') {
                        parse_comment(comment, &mut text);
                        continue;
                    }
                    token_lines.push((self.line_num, line.to_string()));
                }
            }
        }

        Some(parse_sentence(token_lines, text))
    }
}

/// Capture `text = ...` metadata; other comments are ignored
fn parse_comment(comment: &str, text: &mut Option<String>) {
    if let Some((key, value)) = comment.split_once('=') {
        if key.trim() == "text" {
            *text = Some(value.trim().to_string());
        }
    }
}

fn parse_sentence(
    lines: Vec<(usize, String)>,
    text: Option<String>,
) -> Result<Sentence, ParseError> {
    let mut sentence = Sentence { tokens: Vec::new(), text };
    for (line_num, line) in lines {
        if let Some(token) = parse_token(&line, line_num)? {
            sentence.push(token);
        }
    }
    Ok(sentence)
}

/// Parse one token line; multiword ranges and empty nodes yield `None`
fn parse_token(line: &str, line_num: usize) -> Result<Option<Token>, ParseError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 10 {
        return Err(ParseError::malformed(
            line_num,
            format!("expected 10 fields, found {}", fields.len()),
        ));
    }

    // ID: plain integers only; ranges (1-2) and decimals (2.1) are
    // multiword tokens / empty nodes, which carry no tree edges here
    let id: TokenId = if fields[0].contains('-') || fields[0].contains('.') {
        return Ok(None);
    } else {
        let raw: usize = fields[0]
            .parse()
            .map_err(|_| ParseError::malformed(line_num, format!("invalid ID `{}`", fields[0])))?;
        if raw == 0 {
            return Err(ParseError::malformed(line_num, "token ID must be positive"));
        }
        raw - 1 // CoNLL-U ids are 1-based
    };

    let form = fields[1].to_string();
    let lemma = if fields[2] == "_" {
        form.clone()
    } else {
        fields[2].to_string()
    };
    let upos = fields[3].to_string();
    let feats = parse_features(fields[5]);
    let head = parse_head(fields[6], line_num)?;
    let deprel = fields[7].to_string();

    Ok(Some(Token {
        id,
        form,
        lemma,
        upos,
        deprel,
        head,
        feats,
    }))
}

/// HEAD field: `0` and `_` mean root; otherwise a 1-based token id
fn parse_head(s: &str, line_num: usize) -> Result<Option<TokenId>, ParseError> {
    if s == "0" || s == "_" {
        return Ok(None);
    }
    let head: usize = s
        .parse()
        .map_err(|_| ParseError::malformed(line_num, format!("invalid HEAD `{s}`")))?;
    Ok(head.checked_sub(1))
}

/// FEATS field: `Key=Value|Key=Value`, `_` for none.
/// Malformed pairs are dropped rather than failing the token.
fn parse_features(s: &str) -> Features {
    let mut feats = Features::default();
    if s == "_" {
        return feats;
    }
    for pair in s.split('|') {
        if let Some((key, value)) = pair.split_once('=') {
            feats.insert(key.to_string(), value.to_string());
        }
    }
    feats
}
