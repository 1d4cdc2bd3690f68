//! Conversation context management
//!
//! Each operator composing an advertisement has a context keyed by their
//! user id. It holds the wizard step and the draft collected so far. Nothing
//! reaches the record store until the draft is saved.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};
use crate::services::delivery::MAX_ALBUM_SIZE;
use crate::utils::errors::{AdRelayError, Result};
use crate::utils::helpers::{normalize_whitespace, telegram_length};
use crate::models::advertisement::compose_caption;

/// Longest text message Telegram accepts
pub const MAX_TEXT_LENGTH: usize = 4096;
/// Longest photo caption Telegram accepts
pub const MAX_CAPTION_LENGTH: usize = 1024;

/// Where the operator is inside the composition wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Choosing which field to fill next, or saving
    Menu,
    AwaitingBody,
    AwaitingImage,
    AwaitingContact,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Menu => "menu",
            WizardStep::AwaitingBody => "awaiting_body",
            WizardStep::AwaitingImage => "awaiting_image",
            WizardStep::AwaitingContact => "awaiting_contact",
        }
    }
}

/// Advertisement fields collected so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdDraft {
    pub body: Option<String>,
    /// Platform file ids of the collected photos, in the order received
    pub photo_file_ids: Vec<String>,
    pub contact: Option<String>,
}

impl AdDraft {
    /// Check the draft can be saved and later delivered
    pub fn validate(&self) -> Result<()> {
        let body = self
            .body
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| AdRelayError::InvalidInput("Advertisement text is required".to_string()))?;

        let caption_length = telegram_length(&compose_caption(body, self.contact.as_deref()));
        let limit = if self.photo_file_ids.is_empty() {
            MAX_TEXT_LENGTH
        } else {
            MAX_CAPTION_LENGTH
        };
        if caption_length > limit {
            return Err(AdRelayError::InvalidInput(format!(
                "Advertisement text is too long: {} > {}",
                caption_length, limit
            )));
        }

        if self.photo_file_ids.len() > MAX_ALBUM_SIZE {
            return Err(AdRelayError::InvalidInput(format!(
                "Too many photos: {} > {}",
                self.photo_file_ids.len(),
                MAX_ALBUM_SIZE
            )));
        }

        Ok(())
    }
}

/// Operator conversation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Operator this context belongs to
    pub user_id: i64,
    /// Current wizard step, `None` outside the wizard
    pub step: Option<WizardStep>,
    pub draft: AdDraft,
    /// When this context expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this context was last updated
    pub updated_at: DateTime<Utc>,
}

impl ConversationContext {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            step: None,
            draft: AdDraft::default(),
            expires_at: None,
            updated_at: Utc::now(),
        }
    }

    /// Start composing a new advertisement, discarding any previous draft
    pub fn begin_composition(&mut self) {
        self.step = Some(WizardStep::Menu);
        self.draft = AdDraft::default();
        self.updated_at = Utc::now();
        self.expires_at = Some(Utc::now() + Duration::hours(24));
    }

    pub fn is_composing(&self) -> bool {
        self.step.is_some()
    }

    /// Wait for input for one of the draft fields
    pub fn await_input(&mut self, step: WizardStep) -> Result<()> {
        if !self.is_composing() {
            return Err(AdRelayError::InvalidStateTransition {
                from: "idle".to_string(),
                to: step.as_str().to_string(),
            });
        }

        self.step = Some(step);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Take text typed by the operator for the awaited field.
    /// Returns to the wizard menu.
    pub fn accept_text(&mut self, text: &str) -> Result<()> {
        match self.step {
            Some(WizardStep::AwaitingBody) => self.draft.body = Some(text.to_string()),
            Some(WizardStep::AwaitingContact) => self.draft.contact = Some(normalize_whitespace(text)),
            other => {
                return Err(AdRelayError::InvalidStateTransition {
                    from: other.map_or("idle", |s| s.as_str()).to_string(),
                    to: WizardStep::Menu.as_str().to_string(),
                })
            }
        }

        self.step = Some(WizardStep::Menu);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Take a photo. The wizard keeps waiting for photos, so an album sent
    /// as several messages is collected whole. Returns the photo count.
    pub fn accept_photo(&mut self, file_id: &str) -> Result<usize> {
        if self.step != Some(WizardStep::AwaitingImage) {
            return Err(AdRelayError::InvalidStateTransition {
                from: self.step.map_or("idle", |s| s.as_str()).to_string(),
                to: WizardStep::AwaitingImage.as_str().to_string(),
            });
        }

        if self.draft.photo_file_ids.len() >= MAX_ALBUM_SIZE {
            return Err(AdRelayError::InvalidInput(format!(
                "An advertisement holds at most {} photos",
                MAX_ALBUM_SIZE
            )));
        }

        self.draft.photo_file_ids.push(file_id.to_string());
        self.updated_at = Utc::now();
        Ok(self.draft.photo_file_ids.len())
    }

    /// Leave the wizard, handing over the draft
    pub fn finish(&mut self) -> AdDraft {
        self.step = None;
        self.expires_at = None;
        self.updated_at = Utc::now();
        std::mem::take(&mut self.draft)
    }

    /// Leave the wizard, dropping the draft
    pub fn cancel(&mut self) {
        self.finish();
    }

    /// Check if context has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Set custom expiry time
    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }
}
