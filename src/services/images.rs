//! # 레시피 이미지 저장 서비스
//!
//! 클라이언트는 이미지를 base64 data URL로 보냅니다.
//!
//! ```text
//! "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAA..."
//! ```
//!
//! 이 모듈의 함수들:
//! - `decode_data_url()`: data URL을 파싱하여 확장자와 바이트로 변환
//! - `save_image()`: 디코딩한 이미지를 media 디렉토리에 저장하고 상대 경로를 반환
//! - `remove_image()`: 저장된 이미지 파일 삭제 (실패해도 무시)
//! - `image_url()`: 상대 경로를 클라이언트가 접근할 URL로 변환

use crate::error::AppError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::PathBuf;
use tokio::fs;

/// media 디렉토리 안에서 레시피 이미지가 저장되는 하위 경로
pub const IMAGE_DIR: &str = "recipes/images";

/// 디코딩된 이미지
#[derive(Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// 파일 확장자 (예: "png")
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

/// base64 data URL을 파싱합니다.
///
/// 허용 형식: PNG, JPEG, GIF, WebP. 그 외에는 `BadRequest`.
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage, AppError> {
    let invalid = || AppError::BadRequest("image must be a base64 data URL".to_string());

    // "data:image/png;base64,AAAA" → ("image/png", "AAAA")
    let (mime, payload) = data_url
        .trim()
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .ok_or_else(invalid)?;

    let extension = match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        other => {
            return Err(AppError::BadRequest(format!(
                "Unsupported image type: {}",
                other
            )))
        }
    };

    let bytes = STANDARD.decode(payload.trim()).map_err(|_| invalid())?;
    if bytes.is_empty() {
        return Err(invalid());
    }

    Ok(DecodedImage { extension, bytes })
}

/// 이미지를 디스크에 저장하고 media 디렉토리 기준 상대 경로를 반환합니다.
///
/// 파일 이름은 UUIDv7이라 겹치지 않습니다.
/// 예: "recipes/images/0190a5c2-....png"
pub async fn save_image(media_path: &str, data_url: &str) -> Result<String, AppError> {
    let image = decode_data_url(data_url)?;
    let relative = format!(
        "{}/{}.{}",
        IMAGE_DIR,
        uuid::Uuid::now_v7(),
        image.extension
    );

    let full_path = PathBuf::from(media_path).join(&relative);
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&full_path, &image.bytes).await?;

    tracing::debug!("Stored recipe image {} ({} bytes)", relative, image.bytes.len());
    Ok(relative)
}

/// 저장된 이미지를 삭제합니다. 파일이 이미 없어도 에러로 보지 않습니다.
pub async fn remove_image(media_path: &str, relative: &str) {
    let full_path = PathBuf::from(media_path).join(relative);
    if let Err(e) = fs::remove_file(&full_path).await {
        tracing::warn!("Could not remove image {}: {}", full_path.display(), e);
    }
}

/// 상대 경로 → URL. 예: ("/media", "recipes/images/a.png") → "/media/recipes/images/a.png"
pub fn image_url(media_url: &str, relative: &str) -> String {
    format!("{}/{}", media_url.trim_end_matches('/'), relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 투명 PNG
    const PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn decodes_png_data_url() {
        let image = decode_data_url(PNG).unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(decode_data_url("https://example.com/cat.png").is_err());
        assert!(decode_data_url("data:image/png;base64,").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
        assert!(decode_data_url("data:text/plain;base64,aGVsbG8=").is_err());
    }

    #[test]
    fn builds_urls() {
        assert_eq!(
            image_url("/media/", "recipes/images/a.png"),
            "/media/recipes/images/a.png"
        );
    }

    #[tokio::test]
    async fn saves_and_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().to_str().unwrap();

        let relative = save_image(media, PNG).await.unwrap();
        assert!(relative.starts_with(IMAGE_DIR));
        assert!(relative.ends_with(".png"));
        let full = dir.path().join(&relative);
        assert!(full.exists());

        remove_image(media, &relative).await;
        assert!(!full.exists());
    }
}
