//! Multipart intake and temporary-file staging for signature uploads.
//!
//! Uploads are buffered in memory (bounded by the router's body limit), then
//! written to [`NamedTempFile`]s for the verifier. The files are closed after
//! verification on every path; if anything unwinds first, `Drop` removes them.

use std::io::Write;
use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use sigcheck::SimilarityModel;
use sigcheck::verification::{SignatureVerifier, VerificationResult};

use super::error::GatewayError;

pub const ORIGINAL_FIELD: &str = "original_signature";
pub const VERIFICATION_FIELD: &str = "verification_signature";

const TEMP_PREFIX: &str = "signature-";

/// The two uploaded files, as received.
#[derive(Debug, Clone)]
pub struct SignatureUploads {
    pub original: Bytes,
    pub verification: Bytes,
}

/// Reads both signature fields. Unknown fields are skipped.
pub async fn read_signature_uploads(
    mut multipart: Multipart,
) -> Result<SignatureUploads, GatewayError> {
    let mut original: Option<Bytes> = None;
    let mut verification: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let slot = match name.as_str() {
            ORIGINAL_FIELD => &mut original,
            VERIFICATION_FIELD => &mut verification,
            _ => {
                debug!(field = %name, "Ignoring unexpected multipart field");
                continue;
            }
        };

        if slot.is_some() {
            return Err(GatewayError::InvalidRequest(format!(
                "multipart field '{name}' was provided more than once"
            )));
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        debug!(field = %name, file_name = ?file_name, size = bytes.len(), "Received upload");
        *slot = Some(bytes);
    }

    let original = original.ok_or_else(|| missing_field(ORIGINAL_FIELD))?;
    let verification = verification.ok_or_else(|| missing_field(VERIFICATION_FIELD))?;

    Ok(SignatureUploads {
        original,
        verification,
    })
}

fn missing_field(name: &str) -> GatewayError {
    GatewayError::InvalidRequest(format!("missing multipart field '{name}'"))
}

/// Stages both uploads in `upload_dir`, verifies them, then deletes them.
///
/// Blocking: run on the blocking pool.
pub fn verify_uploads<M: SimilarityModel>(
    verifier: &SignatureVerifier<M>,
    upload_dir: &Path,
    uploads: &SignatureUploads,
) -> Result<VerificationResult, GatewayError> {
    let original = stage_upload(upload_dir, &uploads.original)?;
    let verification = stage_upload(upload_dir, &uploads.verification)?;

    let outcome = verifier.verify_paths(original.path(), verification.path());

    remove_upload(original);
    remove_upload(verification);

    Ok(outcome?)
}

fn stage_upload(upload_dir: &Path, bytes: &[u8]) -> Result<NamedTempFile, GatewayError> {
    let mut file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(upload_dir)
        .map_err(GatewayError::UploadFailed)?;
    file.write_all(bytes).map_err(GatewayError::UploadFailed)?;
    file.flush().map_err(GatewayError::UploadFailed)?;

    debug!(path = %file.path().display(), size = bytes.len(), "Staged upload");
    Ok(file)
}

fn remove_upload(file: NamedTempFile) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.close() {
        warn!(path = %path.display(), error = %e, "Failed to remove staged upload");
    }
}
