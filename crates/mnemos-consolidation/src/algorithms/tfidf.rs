//! TF-IDF weighting over small document sets (the sentences of one text, or
//! the contents of one cluster).

use std::collections::{HashMap, HashSet};

/// Sparse term → weight vector.
pub type TermVector = HashMap<String, f64>;

/// Lowercased alphanumeric words longer than two characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 2)
        .map(str::to_lowercase)
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// One TF-IDF vector per document. IDF is smoothed so a term present in
/// every document still carries weight.
pub fn document_vectors(documents: &[Vec<String>]) -> Vec<TermVector> {
    let df = document_frequencies(documents);
    let n_docs = documents.len() as f64;

    documents
        .iter()
        .map(|tokens| {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for t in tokens {
                *counts.entry(t.as_str()).or_default() += 1;
            }
            let len = tokens.len().max(1) as f64;
            counts
                .into_iter()
                .map(|(term, count)| {
                    let doc_freq = df.get(term).copied().unwrap_or(1) as f64;
                    let idf = ((1.0 + n_docs) / (1.0 + doc_freq)).ln() + 1.0;
                    (term.to_string(), (count as f64 / len) * idf)
                })
                .collect()
        })
        .collect()
}

/// Highest-weighted terms across all documents, ties broken alphabetically.
pub fn extract_key_phrases(documents: &[String], limit: usize) -> Vec<(String, f64)> {
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d)).collect();
    let total_terms: usize = tokenized.iter().map(Vec::len).sum();
    if total_terms == 0 || limit == 0 {
        return Vec::new();
    }

    let df = document_frequencies(&tokenized);
    let n_docs = tokenized.len() as f64;
    let mut tf: HashMap<&str, usize> = HashMap::new();
    for t in tokenized.iter().flatten() {
        *tf.entry(t.as_str()).or_default() += 1;
    }

    let mut scores: Vec<(String, f64)> = tf
        .into_iter()
        .map(|(term, count)| {
            let doc_freq = df.get(term).copied().unwrap_or(1) as f64;
            let idf = (n_docs / doc_freq).ln() + 1.0;
            (term.to_string(), count as f64 / total_terms as f64 * idf)
        })
        .collect();

    scores.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scores.truncate(limit);
    scores
}

/// Cosine similarity of two sparse vectors. Zero when either is empty.
pub fn sparse_cosine(a: &TermVector, b: &TermVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a <= f64::EPSILON || norm_b <= f64::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn document_frequencies(documents: &[Vec<String>]) -> HashMap<&str, usize> {
    let mut df: HashMap<&str, usize> = HashMap::new();
    for tokens in documents {
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term).or_default() += 1;
        }
    }
    df
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and" | "for" | "are" | "but" | "not" | "you" | "all" | "can" | "had"
            | "her" | "his" | "was" | "one" | "our" | "out" | "has" | "have" | "been"
            | "from" | "this" | "that" | "with" | "they" | "will" | "each" | "which"
            | "their" | "said" | "what" | "its" | "into" | "more" | "other" | "about"
            | "there" | "then" | "than" | "them" | "were" | "would" | "could" | "should"
            | "also" | "just" | "some" | "any" | "now" | "per" | "who" | "how" | "why"
            | "when" | "where" | "does" | "did" | "done" | "very"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_drops_short_and_stop_words() {
        assert_eq!(
            tokenize("The launch is on March 14, and Dana owns it."),
            vec!["launch", "march", "dana", "owns"]
        );
    }

    #[test]
    fn shared_terms_rank_first() {
        let docs = vec![
            "Launch date moved to March".to_string(),
            "Dana confirmed the launch".to_string(),
            "Launch checklist owner".to_string(),
        ];
        let phrases = extract_key_phrases(&docs, 3);
        assert_eq!(phrases[0].0, "launch");
        assert!(phrases.len() <= 3);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract_key_phrases(&[], 5).is_empty());
        assert!(extract_key_phrases(&["a an".to_string()], 5).is_empty());
    }

    #[test]
    fn identical_documents_have_cosine_one() {
        let docs = vec![tokenize("database migration sunday"), tokenize("database migration sunday")];
        let v = document_vectors(&docs);
        assert!((sparse_cosine(&v[0], &v[1]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_documents_have_cosine_zero() {
        let docs = vec![tokenize("oat milk coffee"), tokenize("database migration")];
        let v = document_vectors(&docs);
        assert_eq!(sparse_cosine(&v[0], &v[1]), 0.0);
    }
}
