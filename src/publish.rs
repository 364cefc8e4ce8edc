//! Publishing target capability
//!
//! The core hands publishing personas one contract: given a title, body,
//! and metadata, produce success or failure. The remote CMS API behind it
//! is opaque; concrete targets plug in through [`PublishTarget`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no publishing target configured")]
    NotConfigured,
    #[error("publish request rejected: {0}")]
    Rejected(String),
    #[error("publish request failed: {0}")]
    Request(String),
}

/// A post ready to hand to a publishing target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    /// Publication state understood by the target, e.g. "draft" or "publish"
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_status() -> String {
    "draft".to_string()
}

impl PostDraft {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            status: default_status(),
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// What the target reported back about a published post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Remote identifier, when the target assigns one
    pub post_id: Option<String>,
    /// Public URL, when the target reports one
    pub url: Option<String>,
}

/// Capability to push a drafted post to a remote publishing target
pub trait PublishTarget: Send {
    fn publish(&self, draft: &PostDraft) -> Result<PublishReceipt, PublishError>;
}

/// The unconfigured default: always reports the target as missing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublishTarget;

impl PublishTarget for NullPublishTarget {
    fn publish(&self, _draft: &PostDraft) -> Result<PublishReceipt, PublishError> {
        Err(PublishError::NotConfigured)
    }
}
