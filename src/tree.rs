//! Dependency tree model
//!
//! Represents one parsed sentence as an ordered list of tokens with
//! head/relation links. Extractors walk these structures read-only;
//! the child relation is derived by scanning, never stored.

use rustc_hash::FxHashMap;

/// Identifier of a token within its sentence (ordinal, unique per sentence)
pub type TokenId = usize;

/// Morphological feature map (e.g. Case, Number, Animacy)
pub type Features = FxHashMap<String, String>;

/// An annotated word in a sentence
#[derive(Debug, Clone)]
pub struct Token {
    pub id: TokenId,
    /// Surface form as it appears in the text
    pub form: String,
    /// Normalized base form
    pub lemma: String,
    /// Universal POS tag (VERB, NOUN, PROPN, ADP, NUM, PUNCT, ...)
    pub upos: String,
    /// Dependency relation to the head (e.g. "case", "fixed", "nummod")
    pub deprel: String,
    /// Head token id within the same sentence; `None` for the root
    pub head: Option<TokenId>,
    /// Morphological features; empty when the annotation carries none
    pub feats: Features,
}

impl Token {
    /// Create a token with no head and no features
    pub fn new(id: TokenId, form: &str, lemma: &str, upos: &str, deprel: &str) -> Self {
        Self {
            id,
            form: form.to_string(),
            lemma: lemma.to_string(),
            upos: upos.to_string(),
            deprel: deprel.to_string(),
            head: None,
            feats: Features::default(),
        }
    }

    /// Look up a morphological feature value
    pub fn feat(&self, key: &str) -> Option<&str> {
        self.feats.get(key).map(|v| v.as_str())
    }
}

/// A parsed sentence: ordered tokens plus optional literal source text
#[derive(Debug, Clone, Default)]
pub struct Sentence {
    pub tokens: Vec<Token>,
    /// Literal sentence text from the source, when available
    pub text: Option<String>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sentence from tokens, without source text
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens, text: None }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Iterate over all tokens in order
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// All tokens whose head is `id`, in sentence order
    pub fn children(&self, id: TokenId) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(move |t| t.head == Some(id))
    }

    /// Number of words: all tokens except punctuation
    pub fn word_count(&self) -> usize {
        self.tokens.iter().filter(|t| t.upos != "PUNCT").count()
    }
}
