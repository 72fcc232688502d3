//! N-gram text analysis shared by indexing and querying.

use crate::error::{ExecutorError, Result};
use tantivy::tokenizer::{LowerCaser, NgramTokenizer, TextAnalyzer, TokenStream};

/// Name under which the analyzer is registered on the index.
pub const NGRAM_TOKENIZER: &str = "literal_ngram";

/// Build the shingle analyzer.
///
/// "Paris" with a 3..3 window → ["par", "ari", "ris"]
pub fn build_ngram_analyzer(min_gram: usize, max_gram: usize) -> Result<TextAnalyzer> {
    let tokenizer = NgramTokenizer::new(min_gram, max_gram, false)
        .map_err(|e| ExecutorError::Config(format!("invalid n-gram window: {}", e)))?;
    Ok(TextAnalyzer::builder(tokenizer).filter(LowerCaser).build())
}

/// Distinct shingles of `text`, in first-seen order.
pub fn shingles(analyzer: &mut TextAnalyzer, text: &str) -> Vec<String> {
    let mut stream = analyzer.token_stream(text);
    let mut grams: Vec<String> = Vec::new();
    while stream.advance() {
        let gram = &stream.token().text;
        if !grams.iter().any(|g| g == gram) {
            grams.push(gram.clone());
        }
    }
    grams
}
