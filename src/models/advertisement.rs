//! Advertisement model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Advertisement {
    pub id: i64,
    pub body: String,
    pub contact: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Advertisement {
    /// Text sent with the advertisement: the body, plus the contact line when
    /// a contact is set.
    pub fn caption(&self) -> String {
        compose_caption(&self.body, self.contact.as_deref())
    }
}

/// Build the caption from its parts
pub fn compose_caption(body: &str, contact: Option<&str>) -> String {
    match contact.map(str::trim).filter(|c| !c.is_empty()) {
        Some(contact) => format!("{}\nContact: {}", body, contact),
        None => body.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdvertisement {
    pub body: String,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAdvertisementRequest {
    pub body: Option<String>,
    pub contact: Option<String>,
}

/// Equality filter over advertisements; `None` fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvertisementFilter {
    pub active: Option<bool>,
}

impl AdvertisementFilter {
    pub fn active() -> Self {
        Self { active: Some(true) }
    }

    pub fn matches(&self, advertisement: &Advertisement) -> bool {
        self.active.map_or(true, |active| advertisement.active == active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advertisement(contact: Option<&str>) -> Advertisement {
        Advertisement {
            id: 1,
            body: "Sale!".to_string(),
            contact: contact.map(str::to_string),
            active: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_caption_with_contact() {
        assert_eq!(advertisement(Some("+123")).caption(), "Sale!\nContact: +123");
    }

    #[test]
    fn test_caption_without_contact() {
        assert_eq!(advertisement(None).caption(), "Sale!");
        assert_eq!(advertisement(Some("  ")).caption(), "Sale!");
    }

    #[test]
    fn test_filter_matches() {
        let mut ad = advertisement(None);
        assert!(AdvertisementFilter::default().matches(&ad));
        assert!(!AdvertisementFilter::active().matches(&ad));
        ad.active = true;
        assert!(AdvertisementFilter::active().matches(&ad));
    }
}
