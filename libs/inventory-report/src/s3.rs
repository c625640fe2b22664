use std::env;
use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3 as s3;
use chrono::{DateTime, Local};
use s3::primitives::ByteStream;

use crate::{ReportError, ReportUploader};

pub const REPORT_TARGET_BUCKET_NAME: &str = "REPORT_TARGET_BUCKET_NAME";
pub const REPORT_TARGET_BUCKET_PATH: &str = "REPORT_TARGET_BUCKET_PATH";
pub const USE_PATH_STYLE_BUCKETS: &str = "USE_PATH_STYLE_BUCKETS";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTarget {
    pub bucket: String,
    pub path: String,
}

impl ReportTarget {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = lookup(REPORT_TARGET_BUCKET_NAME)
            .filter(|bucket| !bucket.is_empty())
            .ok_or(ReportError::MissingSetting(REPORT_TARGET_BUCKET_NAME))?;
        let path = lookup(REPORT_TARGET_BUCKET_PATH).ok_or(ReportError::MissingSetting(REPORT_TARGET_BUCKET_PATH))?;

        Ok(Self { bucket, path })
    }

    /// `<path>/<file stem>-<timestamp>.<extension>`, timestamped so reports never overwrite each other.
    pub fn object_key(&self, report: &Path, now: DateTime<Local>) -> String {
        let stem = report
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let file_name = match report.extension() {
            Some(extension) => format!("{}-{}.{}", stem, now.format("%Y-%m-%d-%H-%M-%S"), extension.to_string_lossy()),
            None => format!("{}-{}", stem, now.format("%Y-%m-%d-%H-%M-%S")),
        };

        let prefix = self.path.trim_matches('/');
        if prefix.is_empty() {
            file_name
        } else {
            format!("{}/{}", prefix, file_name)
        }
    }
}

/// Path-style addressing is needed for S3 compatible stores such as MinIO.
pub fn use_path_style<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(USE_PATH_STYLE_BUCKETS).is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

pub async fn report_client(force_path_style: bool) -> s3::Client {
    let sdk_config = aws_config::load_from_env().await;
    let config = s3::config::Builder::from(&sdk_config)
        .force_path_style(force_path_style)
        .build();
    s3::Client::from_conf(config)
}

pub struct S3ReportUploader {
    client: s3::Client,
    target: ReportTarget,
}

impl S3ReportUploader {
    pub fn new(client: s3::Client, target: ReportTarget) -> Self {
        Self { client, target }
    }

    pub async fn from_env() -> Result<Self, ReportError> {
        Self::from_lookup(|key| env::var(key).ok()).await
    }

    /// Settings are validated before any AWS configuration is loaded.
    pub async fn from_lookup<F>(lookup: F) -> Result<Self, ReportError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target = ReportTarget::from_lookup(&lookup)?;
        let force_path_style = use_path_style(&lookup);
        if force_path_style {
            tracing::info!("Using path-style buckets");
        }

        Ok(Self::new(report_client(force_path_style).await, target))
    }
}

#[async_trait]
impl ReportUploader for S3ReportUploader {
    async fn upload(&self, report: &Path) -> Result<String, ReportError> {
        let key = self.target.object_key(report, Local::now());
        let bucket = &self.target.bucket;
        let upload_error = |source: Box<dyn std::error::Error + Send + Sync>| ReportError::Upload {
            bucket: bucket.clone(),
            key: key.clone(),
            source,
        };

        tracing::info!("uploading file '{}' to bucket '{}' with key '{}'", report.display(), bucket, key);

        let body = ByteStream::from_path(report)
            .await
            .map_err(|err| upload_error(Box::new(err)))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(body)
            .send()
            .await
            .map_err(|err| upload_error(Box::new(s3::Error::from(err))))?;

        tracing::info!("completed file upload");
        Ok(format!("s3://{}/{}", bucket, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn target(path: &str) -> ReportTarget {
        ReportTarget {
            bucket: "reports".to_string(),
            path: path.to_string(),
        }
    }

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn object_key_is_timestamped_under_prefix() {
        let key = target("inventory/").object_key(Path::new("/tmp/Integrated-Inventory.xlsx"), timestamp());
        assert_eq!(key, "inventory/Integrated-Inventory-2024-03-09-14-05-07.xlsx");
    }

    #[test]
    fn empty_prefix_puts_key_at_bucket_root() {
        let key = target("").object_key(Path::new("inventory"), timestamp());
        assert_eq!(key, "inventory-2024-03-09-14-05-07");
    }

    #[test]
    fn target_requires_bucket_and_path() {
        let err = ReportTarget::from_lookup(|_| None).unwrap_err();
        assert_eq!(err.to_string(), "REPORT_TARGET_BUCKET_NAME not set");

        let err = ReportTarget::from_lookup(|key| (key == REPORT_TARGET_BUCKET_NAME).then(|| "reports".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "REPORT_TARGET_BUCKET_PATH not set");

        let target = ReportTarget::from_lookup(|key| match key {
            REPORT_TARGET_BUCKET_NAME => Some("reports".to_string()),
            REPORT_TARGET_BUCKET_PATH => Some("inventory".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(target, self::target("inventory"));
    }

    #[test]
    fn path_style_is_opt_in() {
        assert!(use_path_style(|_| Some("TRUE".to_string())));
        assert!(!use_path_style(|_| Some("false".to_string())));
        assert!(!use_path_style(|_| None));
    }

    #[tokio::test]
    async fn uploader_requires_target_settings() {
        let err = S3ReportUploader::from_lookup(|key| (key == USE_PATH_STYLE_BUCKETS).then(|| "true".to_string()))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ReportError::MissingSetting(REPORT_TARGET_BUCKET_NAME)));
    }

    #[tokio::test]
    async fn missing_report_file_fails_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let config = s3::Config::builder()
            .behavior_version(s3::config::BehaviorVersion::latest())
            .region(s3::config::Region::new("us-east-1"))
            .build();
        let uploader = S3ReportUploader::new(s3::Client::from_conf(config), target("inventory"));

        let err = uploader.upload(&dir.path().join("missing.xlsx")).await.unwrap_err();

        match err {
            ReportError::Upload { bucket, key, .. } => {
                assert_eq!(bucket, "reports");
                assert!(key.starts_with("inventory/missing-"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
