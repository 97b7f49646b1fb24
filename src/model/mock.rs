use parking_lot::Mutex;

use super::SimilarityModel;
use super::error::ModelError;
use crate::preprocess::SignatureTensor;

type ScoreFn = Box<dyn Fn(&SignatureTensor, &SignatureTensor) -> f32 + Send + Sync>;

enum Behavior {
    Constant(f32),
    PixelDistance,
    Custom(ScoreFn),
    Failing(String),
}

/// Deterministic stand-in for the siamese artifact.
///
/// Records the mean intensity of both arguments for every call so tests can
/// check invocation count and argument order.
pub struct MockSimilarityModel {
    behavior: Behavior,
    calls: Mutex<Vec<(f32, f32)>>,
}

impl std::fmt::Debug for MockSimilarityModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let behavior = match &self.behavior {
            Behavior::Constant(score) => format!("constant({score})"),
            Behavior::PixelDistance => "pixel_distance".to_string(),
            Behavior::Custom(_) => "custom".to_string(),
            Behavior::Failing(msg) => format!("failing({msg})"),
        };
        f.debug_struct("MockSimilarityModel")
            .field("behavior", &behavior)
            .field("calls", &self.call_count())
            .finish()
    }
}

impl MockSimilarityModel {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always returns `score`, whatever the inputs.
    pub fn constant(score: f32) -> Self {
        Self::with_behavior(Behavior::Constant(score))
    }

    /// Mean absolute per-value difference: `0.0` for identical inputs.
    pub fn pixel_distance() -> Self {
        Self::with_behavior(Behavior::PixelDistance)
    }

    pub fn from_fn<F>(score: F) -> Self
    where
        F: Fn(&SignatureTensor, &SignatureTensor) -> f32 + Send + Sync + 'static,
    {
        Self::with_behavior(Behavior::Custom(Box::new(score)))
    }

    /// Every call fails with an inference error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Failing(message.into()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// `(mean(first), mean(second))` per call, in call order.
    pub fn calls(&self) -> Vec<(f32, f32)> {
        self.calls.lock().clone()
    }
}

impl SimilarityModel for MockSimilarityModel {
    fn dissimilarity(
        &self,
        first: &SignatureTensor,
        second: &SignatureTensor,
    ) -> Result<f32, ModelError> {
        self.calls.lock().push((first.mean(), second.mean()));

        match &self.behavior {
            Behavior::Constant(score) => Ok(*score),
            Behavior::PixelDistance => {
                let total: f64 = first
                    .values()
                    .iter()
                    .zip(second.values())
                    .map(|(&a, &b)| f64::from((a - b).abs()))
                    .sum();
                Ok((total / first.values().len() as f64) as f32)
            }
            Behavior::Custom(score) => Ok(score(first, second)),
            Behavior::Failing(message) => Err(ModelError::Inference {
                source: candle_core::Error::Msg(message.clone()),
            }),
        }
    }

    fn kind(&self) -> &'static str {
        "mock"
    }
}
