use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use sigcheck::verification::{Classification, VerificationResult};
use sigcheck::{SIGCHECK_STATUS_HEADER, SimilarityModel};

use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::gateway::upload::{read_signature_uploads, verify_uploads};

/// JSON body returned by `POST /verify-signature/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub result: Classification,
    pub similarity_score: f32,
}

impl From<VerificationResult> for VerifyResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            result: result.classification,
            similarity_score: result.similarity_score,
        }
    }
}

#[instrument(skip(state, multipart), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn verify_signature_handler<M>(
    State(state): State<HandlerState<M>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError>
where
    M: SimilarityModel + 'static,
{
    let multipart = multipart.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let uploads = read_signature_uploads(multipart).await?;

    let verifier = state.verifier.clone();
    let upload_dir = state.upload_dir.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        verify_uploads(&verifier, &upload_dir, &uploads)
    })
    .await
    .map_err(|e| GatewayError::InternalError(format!("verification task failed: {e}")))?;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "Signature verification failed");
            return Err(e);
        }
    };

    info!(
        classification = %result.classification,
        similarity = result.similarity_score,
        "Verification complete"
    );

    Ok(make_response(result))
}

pub(crate) fn make_response(result: VerificationResult) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SIGCHECK_STATUS_HEADER,
        HeaderValue::from_static(result.classification.status()),
    );

    (StatusCode::OK, headers, Json(VerifyResponse::from(result))).into_response()
}
