use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{debug, info};

use super::{blob_error_response, ApiError};
use crate::{
    adapters::inbound::http::{
        dto::{ErrorResponseDto, UploadResponseDto},
        router::AppState,
    },
    domain::{
        errors::{BlobError, ValidationError},
        models::ImageFormat,
        value_objects::ObjectKey,
    },
};

/// File received in the multipart body
struct ReceivedFile {
    file_name: String,
    data: Bytes,
}

/// Handle an image upload
///
/// Stores the file under the configured key prefix unless an object already
/// exists there, then answers with a signed URL for it.
pub async fn upload_image(
    State(app_state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponseDto>), ApiError> {
    let settings = &app_state.upload;
    let blob_store = &app_state.blob_store;

    let file = read_file_field(multipart, &settings.field_name)
        .await?
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponseDto::bad_request("No file uploaded")),
            )
        })?;

    let format = ImageFormat::from_file_name(&file.file_name)
        .map_err(|e| blob_error_response(BlobError::from(e)))?;

    if !blob_store.does_bucket_exist(None).await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponseDto::internal_error(&format!(
                "Bucket {} is not available",
                blob_store.bucket()
            ))),
        ));
    }

    let key = upload_key(&settings.key_prefix, base_name(&file.file_name))
        .map_err(|e| blob_error_response(BlobError::from(e)))?;
    let key = key.as_str();

    let message = if blob_store
        .does_object_exist(key)
        .await
        .map_err(blob_error_response)?
    {
        debug!("{} already stored, publishing existing object", key);
        "Image already exists"
    } else {
        let handle = blob_store
            .upload_object(file.data, key)
            .await
            .map_err(blob_error_response)?;
        info!(
            "Stored upload {} as {} ({:?}, {} bytes)",
            file.file_name, handle.key, format, handle.size
        );
        "Image uploaded successfully"
    };

    let signed = blob_store
        .publish(key, None)
        .await
        .map_err(blob_error_response)?;

    Ok((StatusCode::OK, Json(UploadResponseDto::new(message, signed))))
}

/// Pull the first named file field out of the body
async fn read_file_field(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<Option<ReceivedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            e.status(),
            Json(ErrorResponseDto::bad_request(&e.body_text())),
        )
    })? {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };

        let data = field.bytes().await.map_err(|e| {
            (
                e.status(),
                Json(ErrorResponseDto::bad_request(&e.body_text())),
            )
        })?;

        return Ok(Some(ReceivedFile { file_name, data }));
    }

    Ok(None)
}

/// Last path component of a client-supplied file name
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
}

/// Key of an uploaded file: the file name under the configured prefix
fn upload_key(prefix: &str, file_name: &str) -> Result<ObjectKey, ValidationError> {
    if prefix.is_empty() {
        return ObjectKey::try_from(file_name);
    }
    ObjectKey::try_from(prefix)?.join(file_name)
}
