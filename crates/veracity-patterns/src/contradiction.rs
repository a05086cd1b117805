//! Contradiction detection within a cluster
//!
//! Two documents are a candidate pair when their embeddings (or, for a
//! document contesting a claim, their titles) say they are about the same
//! claim. The pair is a contradiction only when their wording says they
//! take opposing positions on it; same-story coverage on its own is not.

use crate::config::ContradictionConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use tracing::debug;
use veracity_domain::keywords::contains_term;
use veracity_domain::{
    cosine_similarity, tokenize, Availability, Document, DocumentId, StopWords,
};

/// Characters of each title kept in a sample line
const SAMPLE_TITLE_CHARS: usize = 50;

/// Sample lines kept in the result
const SAMPLE_COUNT: usize = 3;

/// How two same-topic documents oppose each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContradictionType {
    /// One side debunks what the other asserts
    FactCheckVsClaim,
    /// One side frames the claim as rumor, the other states it
    RumorVsFact,
    /// One side reports an official denial of the other's claim
    DenialVsClaim,
    /// Same topic, opposing terms on each side; possibly an evolving dispute
    ConflictingClaims,
}

/// How much weight a contradiction type carries as evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStrength {
    /// Opposing terms only
    Weak,
    /// Framing or denial signal
    Moderate,
    /// Explicit debunking signal
    Strong,
}

impl ContradictionType {
    /// Evidence strength of this type
    pub fn strength(&self) -> EvidenceStrength {
        match self {
            ContradictionType::FactCheckVsClaim => EvidenceStrength::Strong,
            ContradictionType::RumorVsFact | ContradictionType::DenialVsClaim => {
                EvidenceStrength::Moderate
            }
            ContradictionType::ConflictingClaims => EvidenceStrength::Weak,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ContradictionType::FactCheckVsClaim => "fact_check_vs_claim",
            ContradictionType::RumorVsFact => "rumor_vs_fact",
            ContradictionType::DenialVsClaim => "denial_vs_claim",
            ContradictionType::ConflictingClaims => "conflicting_claims",
        }
    }
}

impl fmt::Display for ContradictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of a contradicting pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairMember {
    /// Document id
    pub id: DocumentId,
    /// Document title
    pub title: String,
    /// Document source
    pub source: String,
}

impl From<&Document> for PairMember {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            source: doc.source_name.clone(),
        }
    }
}

/// What put two documents on the same topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBasis {
    /// Embedding similarity at or above the threshold
    Embedding,
    /// Title word overlap above the threshold
    Title,
}

/// An unordered pair of contradicting documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionPair {
    /// Earlier document in cluster order, or the contesting document for
    /// title matches
    pub first: PairMember,
    /// The other document
    pub second: PairMember,
    /// Cosine similarity of the embeddings, or title word overlap
    pub similarity: f64,
    /// How the pair was matched
    pub basis: MatchBasis,
    /// Kind of opposition
    pub contradiction_type: ContradictionType,
    /// Evidence strength of the kind
    pub strength: EvidenceStrength,
}

/// Contradiction evidence for one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionResult {
    /// At least one contradicting pair was found
    pub has_contradictions: bool,
    /// Unique contradicting pairs
    pub contradiction_count: usize,
    /// The first pairs found, up to the configured limit
    pub contradiction_pairs: Vec<ContradictionPair>,
    /// Short "A vs B" lines for the first pairs
    pub sample_contradictions: Vec<String>,
    /// Documents compared
    pub total_documents: usize,
    /// Risk contribution in [0, 1]
    pub risk_score: f64,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Whether the embedding comparison could run
    pub availability: Availability,
    /// Documents without a usable embedding
    pub skipped_documents: usize,
}

/// Textual signals found in one document's lead
#[derive(Debug, Clone, Default)]
struct Signals {
    tokens: Vec<String>,
    debunks: bool,
    rumor: bool,
    denial: bool,
}

impl Signals {
    fn scan(doc: &Document, config: &ContradictionConfig) -> Self {
        let tokens = tokenize(&doc.lead_text(config.lead_chars));
        let any = |terms: &[String]| terms.iter().any(|t| contains_term(&tokens, t));
        Self {
            debunks: any(&config.debunk_terms),
            rumor: any(&config.rumor_terms),
            denial: any(&config.denial_terms),
            tokens,
        }
    }

    fn assertive(&self) -> bool {
        !self.debunks && !self.rumor
    }

    /// Each side carries one half of an opposing term pair
    fn opposes(&self, other: &Signals, opposing: &[[String; 2]]) -> bool {
        opposing.iter().any(|[x, y]| {
            (contains_term(&self.tokens, x) && contains_term(&other.tokens, y))
                || (contains_term(&self.tokens, y) && contains_term(&other.tokens, x))
        })
    }
}

/// Classify a same-topic pair. `None` when both sides debunk or when
/// nothing in the wording sets them against each other.
fn classify(a: &Signals, b: &Signals, opposing: &[[String; 2]]) -> Option<ContradictionType> {
    if a.debunks != b.debunks {
        return Some(ContradictionType::FactCheckVsClaim);
    }
    if a.debunks && b.debunks {
        return None;
    }
    if (a.rumor && b.assertive()) || (b.rumor && a.assertive()) {
        return Some(ContradictionType::RumorVsFact);
    }
    if a.denial != b.denial {
        return Some(ContradictionType::DenialVsClaim);
    }
    a.opposes(b, opposing)
        .then_some(ContradictionType::ConflictingClaims)
}

/// Title words with stop-words removed
fn title_words(title: &str, stop_words: &StopWords) -> BTreeSet<String> {
    tokenize(title)
        .into_iter()
        .filter(|t| !stop_words.contains(t))
        .collect()
}

/// Jaccard overlap of two word sets, `None` when either is empty
fn overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let shared = a.intersection(b).count();
    let union = a.union(b).count();
    Some(shared as f64 / union as f64)
}

/// Pairs in discovery order, each unordered pair kept once
#[derive(Default)]
struct PairSet {
    pairs: Vec<ContradictionPair>,
    seen: HashSet<(DocumentId, DocumentId)>,
}

impl PairSet {
    fn insert(&mut self, pair: ContradictionPair) {
        let (a, b) = (pair.first.id.clone(), pair.second.id.clone());
        let key = if a <= b { (a, b) } else { (b, a) };
        if self.seen.insert(key) {
            self.pairs.push(pair);
        }
    }
}

fn pair(
    a: &Document,
    b: &Document,
    similarity: f64,
    basis: MatchBasis,
    kind: ContradictionType,
) -> ContradictionPair {
    ContradictionPair {
        first: PairMember::from(a),
        second: PairMember::from(b),
        similarity,
        basis,
        contradiction_type: kind,
        strength: kind.strength(),
    }
}

/// Find same-topic document pairs whose wording takes opposing positions.
///
/// Documents are matched by embedding similarity and, when
/// `title_overlap` is on, a document whose title contests a claim is also
/// matched against every document with an overlapping title, embedded or
/// not. Every unordered pair is reported once, so cost is quadratic in the
/// cluster size.
pub fn detect_contradictions(
    documents: &[Document],
    config: &ContradictionConfig,
) -> ContradictionResult {
    let mut dimension = None;
    let usable: Vec<&Document> = documents
        .iter()
        .filter(|doc| match doc.screen_embedding(dimension) {
            Some(_) => false,
            None => {
                dimension.get_or_insert(doc.embedding.len());
                true
            }
        })
        .collect();
    let skipped = documents.len() - usable.len();
    if skipped > 0 {
        debug!("Contradiction scan skipping {} documents without usable embeddings", skipped);
    }

    let mut found = PairSet::default();

    if usable.len() >= 2 {
        let signals: Vec<Signals> = usable.iter().map(|d| Signals::scan(d, config)).collect();
        for i in 0..usable.len() {
            for j in i + 1..usable.len() {
                let Some(similarity) =
                    cosine_similarity(&usable[i].embedding, &usable[j].embedding)
                else {
                    continue;
                };
                if similarity < config.similarity_threshold {
                    continue;
                }
                if let Some(kind) = classify(&signals[i], &signals[j], &config.opposing_terms) {
                    found.insert(pair(usable[i], usable[j], similarity, MatchBasis::Embedding, kind));
                }
            }
        }
    }

    if config.title_overlap {
        let stop_words = StopWords::default();
        let words: Vec<BTreeSet<String>> = documents
            .iter()
            .map(|d| title_words(&d.title, &stop_words))
            .collect();
        let contests: Vec<bool> = documents
            .iter()
            .map(|d| {
                let tokens = tokenize(&d.title);
                config.title_terms.iter().any(|t| contains_term(&tokens, t))
            })
            .collect();

        for (i, doc) in documents.iter().enumerate().filter(|(i, _)| contests[*i]) {
            for (j, other) in documents.iter().enumerate() {
                if i == j || contests[j] {
                    continue;
                }
                match overlap(&words[i], &words[j]) {
                    Some(shared) if shared > config.title_overlap_threshold => {
                        found.insert(pair(
                            doc,
                            other,
                            shared,
                            MatchBasis::Title,
                            ContradictionType::FactCheckVsClaim,
                        ));
                    }
                    _ => {}
                }
            }
        }
    }

    let mut pairs = found.pairs;
    let count = pairs.len();
    let compared = if config.title_overlap {
        documents.len()
    } else {
        usable.len()
    };
    let sample_contradictions = pairs
        .iter()
        .take(SAMPLE_COUNT)
        .map(|p| {
            format!(
                "{} vs {}",
                truncate(&p.first.title, SAMPLE_TITLE_CHARS),
                truncate(&p.second.title, SAMPLE_TITLE_CHARS)
            )
        })
        .collect();
    pairs.truncate(config.max_reported_pairs);

    let (availability, confidence) = if usable.len() >= 2 {
        (Availability::Available, usable.len() as f64 / documents.len() as f64)
    } else {
        (Availability::Degraded, 0.0)
    };

    ContradictionResult {
        has_contradictions: count > 0,
        contradiction_count: count,
        contradiction_pairs: pairs,
        sample_contradictions,
        total_documents: compared,
        risk_score: config.risk_transform.apply(count, compared),
        confidence,
        availability,
        skipped_documents: skipped,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RiskTransform;

    fn doc(id: &str, title: &str, embedding: Vec<f32>) -> Document {
        Document::new(id, title).with_embedding(embedding)
    }

    /// Unit vectors with cosine similarity 0.8 to `[1, 0]`
    fn pair_at_point_eight() -> (Vec<f32>, Vec<f32>) {
        (vec![1.0, 0.0], vec![0.8, 0.6])
    }

    #[test]
    fn test_debunk_vs_claim() {
        let (a, b) = pair_at_point_eight();
        let docs = vec![
            doc("a", "Viral dam collapse video debunked", a),
            doc("b", "Dam collapses after heavy rain", b),
        ];
        let result = detect_contradictions(&docs, &ContradictionConfig::default());

        assert!(result.contradiction_count >= 1);
        let pair = &result.contradiction_pairs[0];
        assert_eq!(pair.contradiction_type, ContradictionType::FactCheckVsClaim);
        assert_eq!(pair.strength, EvidenceStrength::Strong);
        assert!((pair.similarity - 0.8).abs() < 1e-6);
        assert_eq!(
            result.sample_contradictions[0],
            "Viral dam collapse video debunked vs Dam collapses after heavy rain"
        );
    }

    #[test]
    fn test_classification_precedence() {
        let s = |debunks, rumor, denial| Signals {
            tokens: Vec::new(),
            debunks,
            rumor,
            denial,
        };
        let plain = s(false, false, false);
        let opposing = ContradictionConfig::default().opposing_terms;

        assert_eq!(
            classify(&s(true, false, false), &plain, &opposing),
            Some(ContradictionType::FactCheckVsClaim)
        );
        assert_eq!(classify(&s(true, false, false), &s(true, false, false), &opposing), None);
        assert_eq!(
            classify(&plain, &s(false, true, false), &opposing),
            Some(ContradictionType::RumorVsFact)
        );
        assert_eq!(
            classify(&s(false, false, true), &plain, &opposing),
            Some(ContradictionType::DenialVsClaim)
        );
        // Debunking outranks rumor framing
        assert_eq!(
            classify(&s(true, false, false), &s(false, true, false), &opposing),
            Some(ContradictionType::FactCheckVsClaim)
        );
        // Plain same-topic coverage is not a contradiction
        assert_eq!(classify(&plain, &plain, &opposing), None);
    }

    #[test]
    fn test_opposing_terms_mark_conflicting_claims() {
        let config = ContradictionConfig::default();
        let a = doc("a", "Vaccine trial results verified by regulator", vec![1.0, 0.0]);
        let b = doc("b", "Vaccine trial results unfounded, doctors say", vec![0.9, 0.1]);
        let sa = Signals::scan(&a, &config);
        let mut sb = Signals::scan(&b, &config);
        // Take the debunk reading out so only the opposing pair remains
        sb.debunks = false;

        assert!(sa.opposes(&sb, &config.opposing_terms));
        assert_eq!(
            classify(&sa, &sb, &config.opposing_terms),
            Some(ContradictionType::ConflictingClaims)
        );
        assert_eq!(ContradictionType::ConflictingClaims.strength(), EvidenceStrength::Weak);
    }

    #[test]
    fn test_same_story_coverage_is_not_contradictory() {
        let docs = vec![
            Document::new("r", "Storm floods coastal town")
                .with_source("Reuters")
                .with_embedding(vec![1.0, 0.0, 0.0]),
            Document::new("b", "Coastal town flooded as storm hits")
                .with_source("BBC")
                .with_embedding(vec![0.99, 0.1, 0.0]),
            Document::new("ap", "Storm leaves coastal town under water")
                .with_source("AP News")
                .with_embedding(vec![0.98, 0.0, 0.15]),
            Document::new("g", "Residents evacuated as coastal town floods")
                .with_source("The Guardian")
                .with_embedding(vec![0.97, 0.1, 0.1]),
        ];
        let result = detect_contradictions(&docs, &ContradictionConfig::default());

        assert_eq!(result.contradiction_count, 0);
        assert!(!result.has_contradictions);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.availability, Availability::Available);
    }

    #[test]
    fn test_title_overlap_without_embeddings() {
        let docs = vec![
            Document::new("fc", "Bridge collapse claims debunked"),
            Document::new("claim", "Bridge collapse shocks city"),
            Document::new("other", "Council approves budget"),
        ];
        let result = detect_contradictions(&docs, &ContradictionConfig::default());

        assert_eq!(result.contradiction_count, 1);
        let pair = &result.contradiction_pairs[0];
        assert_eq!(pair.first.id.as_str(), "fc");
        assert_eq!(pair.second.id.as_str(), "claim");
        assert_eq!(pair.basis, MatchBasis::Title);
        assert_eq!(pair.contradiction_type, ContradictionType::FactCheckVsClaim);
        assert_eq!(result.availability, Availability::Degraded);
        assert_eq!(result.skipped_documents, 3);
        assert_eq!(result.total_documents, 3);
        assert!(result.risk_score > 0.0);

        let off = ContradictionConfig {
            title_overlap: false,
            ..ContradictionConfig::default()
        };
        assert_eq!(detect_contradictions(&docs, &off).contradiction_count, 0);
    }

    #[test]
    fn test_embedding_and_title_matches_counted_once() {
        let (a, b) = pair_at_point_eight();
        let docs = vec![
            doc("a", "Dam collapse video debunked", a),
            doc("b", "Dam collapse video spreads", b),
        ];
        let result = detect_contradictions(&docs, &ContradictionConfig::default());

        assert_eq!(result.contradiction_count, 1);
        assert_eq!(result.contradiction_pairs[0].basis, MatchBasis::Embedding);
    }

    #[test]
    fn test_terms_match_on_token_boundaries() {
        let config = ContradictionConfig::default();
        let falsehood = doc("a", "Falsehoods and hoaxes", vec![1.0]);
        assert!(!Signals::scan(&falsehood, &config).debunks);

        let check = doc("b", "Fact-check: claim about bridge", vec![1.0]);
        assert!(Signals::scan(&check, &config).debunks);
    }

    #[test]
    fn test_lead_sentence_is_scanned() {
        let config = ContradictionConfig::default();
        let d = Document::new("a", "Bridge closure")
            .with_content("Officials denied the bridge would close. Later text says false.")
            .with_embedding(vec![1.0]);
        let signals = Signals::scan(&d, &config);
        assert!(signals.denial);
        assert!(!signals.debunks);
    }

    #[test]
    fn test_dissimilar_pairs_ignored() {
        let docs = vec![
            doc("a", "Claim debunked", vec![1.0, 0.0]),
            doc("b", "Claim stands", vec![0.0, 1.0]),
        ];
        let config = ContradictionConfig {
            title_overlap: false,
            ..ContradictionConfig::default()
        };
        let result = detect_contradictions(&docs, &config);
        assert_eq!(result.contradiction_count, 0);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.availability, Availability::Available);
    }

    #[test]
    fn test_too_few_documents_is_degraded() {
        let docs = vec![doc("a", "Lonely", vec![1.0]), Document::new("b", "No embedding")];
        let result = detect_contradictions(&docs, &ContradictionConfig::default());
        assert_eq!(result.availability, Availability::Degraded);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.skipped_documents, 1);
        assert_eq!(result.risk_score, 0.0);
    }

    #[test]
    fn test_reported_pairs_limited_but_all_counted() {
        let docs: Vec<_> = (0..6)
            .map(|i| {
                let title = if i < 3 {
                    format!("Report {} debunked", i)
                } else {
                    format!("Report {}", i)
                };
                doc(&i.to_string(), &title, vec![1.0, 0.0])
            })
            .collect();
        let config = ContradictionConfig {
            max_reported_pairs: 4,
            risk_transform: RiskTransform::Ratio,
            ..ContradictionConfig::default()
        };
        let result = detect_contradictions(&docs, &config);

        // Every debunking report against every plain one
        assert_eq!(result.contradiction_count, 9);
        assert_eq!(result.contradiction_pairs.len(), 4);
        assert_eq!(result.sample_contradictions.len(), 3);
        assert_eq!(result.risk_score, 1.0);
    }

    #[test]
    fn test_sample_titles_truncated() {
        let long = "x".repeat(80);
        assert_eq!(truncate(&long, 50).chars().count(), 53);
        assert_eq!(truncate("short", 50), "short");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn cluster() -> impl Strategy<Value = Vec<(Vec<f32>, bool)>> {
        prop::collection::vec((prop::collection::vec(0.0f32..1.0, 3), any::<bool>()), 0..12)
    }

    fn to_docs(items: &[(Vec<f32>, bool)]) -> Vec<Document> {
        items
            .iter()
            .enumerate()
            .map(|(i, (embedding, debunk))| {
                let title = if *debunk { "Report debunked" } else { "Report confirmed" };
                Document::new(format!("d{}", i), title).with_embedding(embedding.clone())
            })
            .collect()
    }

    proptest! {
        /// Property: adding a debunking document never lowers the count
        #[test]
        fn test_adding_debunk_never_decreases_count(
            items in cluster(),
            extra in prop::collection::vec(0.0f32..1.0, 3),
        ) {
            let config = ContradictionConfig::default();
            let mut docs = to_docs(&items);
            let before = detect_contradictions(&docs, &config).contradiction_count;

            docs.push(Document::new("extra", "Viral report debunked").with_embedding(extra));
            let after = detect_contradictions(&docs, &config).contradiction_count;
            prop_assert!(after >= before, "count fell from {} to {}", before, after);
        }

        /// Property: risk stays within [0, 1]
        #[test]
        fn test_risk_bounds(items in cluster()) {
            let result = detect_contradictions(&to_docs(&items), &ContradictionConfig::default());
            prop_assert!((0.0..=1.0).contains(&result.risk_score));
        }
    }
}
