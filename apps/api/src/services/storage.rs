use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

const RESUME_PREFIX: &str = "resumes";

/// Uploads a resume PDF to object storage and returns its durable URL.
/// Keys are uuid-prefixed so re-uploads of the same filename never collide.
pub async fn upload_resume(
    s3: &S3Client,
    endpoint: &str,
    bucket: &str,
    filename: &str,
    bytes: Bytes,
) -> Result<String, AppError> {
    let key = format!("{RESUME_PREFIX}/{}_{}", Uuid::new_v4(), sanitize(filename));

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .content_type("application/pdf")
        .body(ByteStream::from(bytes))
        .send()
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    tracing::info!("uploaded resume to s3 key {key}");
    Ok(format!(
        "{}/{bucket}/{key}",
        endpoint.trim_end_matches('/')
    ))
}

/// Keeps object keys URL-safe: path separators and whitespace become dashes.
fn sanitize(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => '-',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize("my resume/v2.pdf"), "my-resume-v2.pdf");
        assert_eq!(sanitize("plain.pdf"), "plain.pdf");
    }
}
