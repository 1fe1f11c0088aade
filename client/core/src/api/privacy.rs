//! Student privacy consent

use super::client::ApiClient;
use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Consent record stored next to a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyConsent {
    pub accepted: bool,
    pub data_retention_days: i64,
}

/// Source of consent records, keyed by student id
#[async_trait]
pub trait PrivacyConsentSource: Send + Sync {
    async fn privacy_consent(&self, student_id: &str) -> Result<PrivacyConsent, ApiError>;
}

#[async_trait]
impl PrivacyConsentSource for ApiClient {
    async fn privacy_consent(&self, student_id: &str) -> Result<PrivacyConsent, ApiError> {
        self.get(&format!("/api/students/{}/privacy-consent", student_id)).await
    }
}
