//! Scripted service doubles shared by the pipeline stage tests

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ai::{Embedder, GenerationRequest, LlmError, TextGenerator};
use crate::types::{FailureKind, Result, WeaveError};

/// Replies from a fixed script, then fails with `Other`
pub(crate) struct ScriptedGenerator {
    script: Mutex<VecDeque<std::result::Result<String, LlmError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<std::result::Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, request: &GenerationRequest) -> std::result::Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::new(FailureKind::Other, "script exhausted")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Looks vectors up by exact text; unknown texts get `default`
pub(crate) struct LookupEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    calls: AtomicUsize,
    fail: bool,
}

impl LookupEmbedder {
    pub fn new(pairs: &[(&str, Vec<f32>)], default: Vec<f32>) -> Self {
        Self {
            vectors: pairs
                .iter()
                .map(|(text, v)| (text.to_string(), v.clone()))
                .collect(),
            default,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(&[], vec![1.0])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for LookupEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(WeaveError::Embedding("service unreachable".to_string()));
        }
        Ok(texts
            .iter()
            .map(|t| self.vectors.get(t).cloned().unwrap_or_else(|| self.default.clone()))
            .collect())
    }
}

/// Gives every distinct text its own orthogonal one-hot vector
pub(crate) struct DistinctEmbedder {
    seen: Mutex<HashMap<String, usize>>,
}

impl DistinctEmbedder {
    const DIMENSIONS: usize = 64;

    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Embedder for DistinctEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut seen = self.seen.lock().unwrap();
        Ok(texts
            .iter()
            .map(|t| {
                let next = seen.len();
                let slot = *seen.entry(t.clone()).or_insert(next);
                let mut v = vec![0.0; Self::DIMENSIONS];
                v[slot % Self::DIMENSIONS] = 1.0;
                v
            })
            .collect())
    }
}
