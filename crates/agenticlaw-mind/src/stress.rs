//! Stress Detector — two-stage classification of a user utterance.
//!
//! Stage 1 is a fixed regex pass (English + Spanish idioms of correction,
//! frustration, "I already told you"). Stage 2 is an optional semantic pass
//! against an injected embedding provider, gated behind a cosine-similarity
//! threshold. The embedding call is the one suspension point in this
//! crate — everything else is synchronous (see spec §5).

use async_trait::async_trait;
use std::sync::{LazyLock, Mutex};

/// Opaque embedding callable, injected by the host. Any failure is treated
/// as "no signal" by the caller — the detector never propagates embedding
/// errors upward.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    Regex,
    Semantic,
    None,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Semantic => "semantic",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressDetection {
    pub detected: bool,
    pub intensity: u8,
    pub method: DetectionMethod,
}

impl StressDetection {
    fn none() -> Self {
        Self {
            detected: false,
            intensity: 0,
            method: DetectionMethod::None,
        }
    }
}

const REFERENCE_PHRASES: [&str; 5] = [
    "no, that's not what I asked for",
    "I already told you this before",
    "this is wrong, please fix it",
    "you're not listening to me",
    "that's incorrect, try again",
];

static REGEX_PATTERNS: LazyLock<Vec<regex::Regex>> = LazyLock::new(|| {
    let sources = [
        r"(?i)\bno,?\s+that'?s\s+(not\s+)?(right|wrong|correct)\b",
        r"(?i)\bi\s+already\s+(told|said|mentioned)\b",
        r"(?i)\bthat'?s\s+(not\s+)?(what\s+i\s+(asked|meant|wanted))\b",
        r"(?i)\byou'?re\s+not\s+listening\b",
        r"(?i)\bstop\s+(doing|saying)\s+that\b",
        r"(?i)\bthis\s+is\s+(wrong|incorrect|frustrating)\b",
        r"(?i)\bno,?\s+that'?s\s+wrong\b",
        // Spanish idioms
        r"(?i)\bno\s+es\s+lo\s+que\s+(pedí|quería|dije)\b",
        r"(?i)\bya\s+te\s+lo\s+(dije|expliqué)\b",
        r"(?i)\beso\s+(está\s+)?mal\b",
        r"(?i)\bno\s+me\s+(estás\s+)?escuchando\b",
    ];
    sources
        .iter()
        .map(|s| regex::Regex::new(s).expect("static stress pattern must compile"))
        .collect()
});

/// Stage 1: regex-only detection.
pub fn detect_stress_regex(utterance: &str) -> bool {
    REGEX_PATTERNS.iter().any(|re| re.is_match(utterance))
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum();
    let denom = (norm_a * norm_b).sqrt().max(1.0);
    dot / denom
}

/// Single-slot, provider-keyed cache of the five reference-phrase embeddings.
/// A provider-key change invalidates and rebuilds the cache.
pub struct StressDetector {
    semantic_threshold: f64,
    reference_cache: Mutex<Option<(String, Vec<Vec<f32>>)>>,
}

impl StressDetector {
    pub fn new(semantic_threshold: f64) -> Self {
        Self {
            semantic_threshold,
            reference_cache: Mutex::new(None),
        }
    }

    /// Run the full two-stage detection. `embedder`/`provider_key` are
    /// optional — without them only the regex stage runs.
    pub async fn detect(
        &self,
        utterance: &str,
        embedder: Option<(&dyn EmbeddingProvider, &str)>,
    ) -> StressDetection {
        if detect_stress_regex(utterance) {
            return StressDetection {
                detected: true,
                intensity: 3,
                method: DetectionMethod::Regex,
            };
        }

        let Some((provider, provider_key)) = embedder else {
            return StressDetection::none();
        };

        match self.detect_semantic(utterance, provider, provider_key).await {
            Some(detection) => detection,
            None => StressDetection::none(),
        }
    }

    async fn detect_semantic(
        &self,
        utterance: &str,
        provider: &dyn EmbeddingProvider,
        provider_key: &str,
    ) -> Option<StressDetection> {
        let references = self.reference_embeddings(provider, provider_key).await?;
        let input_embedding = provider.embed(utterance).await.ok()?;

        let max_similarity = references
            .iter()
            .map(|r| cosine_similarity(&input_embedding, r))
            .fold(f64::MIN, f64::max);

        if max_similarity > self.semantic_threshold {
            Some(StressDetection {
                detected: true,
                intensity: 2,
                method: DetectionMethod::Semantic,
            })
        } else {
            Some(StressDetection::none())
        }
    }

    async fn reference_embeddings(
        &self,
        provider: &dyn EmbeddingProvider,
        provider_key: &str,
    ) -> Option<Vec<Vec<f32>>> {
        {
            let cache = self.reference_cache.lock().unwrap();
            if let Some((cached_key, embeddings)) = cache.as_ref() {
                if cached_key == provider_key {
                    return Some(embeddings.clone());
                }
            }
        }

        let mut embeddings = Vec::with_capacity(REFERENCE_PHRASES.len());
        for phrase in REFERENCE_PHRASES {
            embeddings.push(provider.embed(phrase).await.ok()?);
        }

        let mut cache = self.reference_cache.lock().unwrap();
        *cache = Some((provider_key.to_string(), embeddings.clone()));
        Some(embeddings)
    }
}
