use std::path::Path as StdPath;

use axum::{
    extract::Multipart,
    response::IntoResponse,
};
use bytes::Bytes;
use serde_json::json;
use tokio::fs;

use crate::{
    config::get_config,
    dto::envelope::created,
    error::{Error, Result},
};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Lowercased extension when the name and leading bytes agree on an image type.
pub fn sniff_image(filename: &str, data: &[u8]) -> Result<String> {
    let ext = StdPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(Error::BadRequest(format!("File type .{} is not allowed", ext)));
    }

    let matches = match ext.as_str() {
        "jpg" | "jpeg" => data.starts_with(&[0xFF, 0xD8]),
        "png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        "gif" => data.starts_with(b"GIF8"),
        "webp" => data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP",
        _ => false,
    };
    if !matches {
        return Err(Error::BadRequest(format!("Invalid {} file content", ext.to_uppercase())));
    }
    Ok(ext)
}

async fn save_image(ext: &str, data: &Bytes) -> Result<String> {
    let dir = format!("{}/images", get_config().uploads_dir.trim_end_matches('/'));
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;

    let name = format!("{}.{}", uuid::Uuid::new_v4(), ext);
    fs::write(format!("{}/{}", dir, name), data).await.map_err(|e| {
        tracing::error!(error = %e, "failed to write upload");
        Error::Internal(format!("Failed to save file: {}", e))
    })?;

    Ok(format!("/uploads/images/{}", name))
}

#[axum::debug_handler]
pub async fn upload_image(mut multipart: Multipart) -> Result<impl IntoResponse> {
    let limit = get_config().max_upload_mb * 1024 * 1024;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let data: Bytes = field
            .bytes()
            .await
            .map_err(|_| Error::BadRequest("Failed to read file upload".into()))?;

        if data.is_empty() {
            return Err(Error::BadRequest("Uploaded file is empty".into()));
        }
        if data.len() > limit {
            return Err(Error::BadRequest(format!(
                "File exceeds the {} MB limit",
                get_config().max_upload_mb
            )));
        }

        let ext = sniff_image(&filename, &data)?;
        let url = save_image(&ext, &data).await?;
        tracing::info!(url = %url, bytes = data.len(), "image uploaded");
        return Ok(created(json!({ "url": url })));
    }

    Err(Error::BadRequest("A file field is required".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_magic_bytes() {
        assert_eq!(sniff_image("a.PNG", &[0x89, 0x50, 0x4E, 0x47, 0x0D]).unwrap(), "png");
        assert_eq!(sniff_image("b.jpeg", &[0xFF, 0xD8, 0xFF]).unwrap(), "jpeg");
        assert_eq!(sniff_image("c.gif", b"GIF89a").unwrap(), "gif");
        assert_eq!(sniff_image("d.webp", b"RIFF\0\0\0\0WEBPVP8 ").unwrap(), "webp");
    }

    #[test]
    fn rejects_disguised_or_foreign_files() {
        assert!(sniff_image("cv.pdf", b"%PDF-1.7").is_err());
        assert!(sniff_image("photo.png", b"%PDF-1.7").is_err());
        assert!(sniff_image("noext", &[0xFF, 0xD8]).is_err());
    }
}
