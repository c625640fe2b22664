//! Collaborators that turn collected inventory into a delivered report.
//!
//! Rendering and e-mail delivery are consumed through traits only. Upload has
//! an S3 implementation in [`s3`].

pub mod s3;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// One row of the inventory worksheet. Empty fields leave their cell blank.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InventoryRow {
    pub unique_id: Option<String>,
    pub ip_address: Option<String>,
    pub is_virtual: Option<String>,
    pub is_public: Option<String>,
    pub dns_name: Option<String>,
    pub mac_address: Option<String>,
    pub authenticated_scan_planned: Option<String>,
    pub baseline_config: Option<String>,
    pub asset_type: Option<String>,
    pub hardware_model: Option<String>,
    pub software_vendor: Option<String>,
    pub software_product_name: Option<String>,
    pub network_id: Option<String>,
    pub owner: Option<String>,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0} not set")]
    MissingSetting(&'static str),

    #[error("failed to render report: {0}")]
    Render(String),

    #[error("failed to upload {key} to bucket {bucket}: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to e-mail report: {0}")]
    Email(String),
}

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Writes the rows into a report file and returns its path.
    async fn render(&self, rows: &[InventoryRow]) -> Result<PathBuf, ReportError>;
}

#[async_trait]
pub trait ReportUploader: Send + Sync {
    /// Stores the report and returns where it can be found.
    async fn upload(&self, report: &Path) -> Result<String, ReportError>;
}

#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn email(&self, report: &Path) -> Result<(), ReportError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredReport {
    pub path: PathBuf,
    pub location: String,
}

/// Render, upload, then e-mail. Stops at the first failing step.
pub struct ReportPipeline<R, U, M> {
    renderer: R,
    uploader: U,
    mailer: M,
}

impl<R, U, M> ReportPipeline<R, U, M>
where
    R: ReportRenderer,
    U: ReportUploader,
    M: ReportMailer,
{
    pub fn new(renderer: R, uploader: U, mailer: M) -> Self {
        Self {
            renderer,
            uploader,
            mailer,
        }
    }

    pub async fn run(&self, rows: &[InventoryRow]) -> Result<DeliveredReport, ReportError> {
        tracing::info!("Rendering report with {} inventory rows", rows.len());
        let path = self.renderer.render(rows).await?;

        tracing::info!("Uploading report {}", path.display());
        let location = self.uploader.upload(&path).await?;
        tracing::info!("Report uploaded to {}", location);

        self.mailer.email(&path).await?;
        tracing::info!("Report {} e-mailed", path.display());

        Ok(DeliveredReport { path, location })
    }
}
