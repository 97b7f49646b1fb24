use std::path::PathBuf;
use std::sync::Arc;

use sigcheck::SimilarityModel;
use sigcheck::verification::SignatureVerifier;

/// Shared handler state. The verifier (and its model) is loaded once at startup.
pub struct HandlerState<M: SimilarityModel + 'static> {
    pub verifier: Arc<SignatureVerifier<M>>,

    /// Directory uploads are staged in while they are verified.
    pub upload_dir: PathBuf,

    pub max_upload_bytes: usize,
}

impl<M: SimilarityModel + 'static> Clone for HandlerState<M> {
    fn clone(&self) -> Self {
        Self {
            verifier: Arc::clone(&self.verifier),
            upload_dir: self.upload_dir.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

impl<M: SimilarityModel + 'static> HandlerState<M> {
    pub fn new(model: M, upload_dir: PathBuf, max_upload_bytes: usize) -> Self {
        Self {
            verifier: Arc::new(SignatureVerifier::new(model)),
            upload_dir,
            max_upload_bytes,
        }
    }

    pub fn model_kind(&self) -> &'static str {
        self.verifier.model().kind()
    }
}
