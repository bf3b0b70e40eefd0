use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::db::Db;
use crate::services::mailer::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub s3: S3Client,
    pub mailer: Mailer,
    pub config: Config,
}
