//! Group membership events

use teloxide::types::{ChatMemberUpdated, Message};
use tracing::{debug, info};
use crate::utils::errors::Result;
use crate::services::{JoinOutcome, MembersAdded, ServiceFactory};

/// Public link for a group with a username
pub fn invite_link(username: Option<&str>) -> Option<String> {
    username.map(|name| format!("https://t.me/{}", name))
}

/// Handle a new-chat-members service message
pub async fn handle_new_chat_members(msg: Message, services: ServiceFactory) -> Result<()> {
    let Some(members) = msg.new_chat_members() else {
        return Ok(());
    };

    let event = MembersAdded {
        chat_id: msg.chat.id.0,
        title: msg.chat.title().unwrap_or_default().to_string(),
        invite_link: invite_link(msg.chat.username()),
        added_user_ids: members.iter().map(|user| user.id).collect(),
    };

    match services.watcher.handle_members_added(event).await? {
        JoinOutcome::Registered { delivered } => {
            info!(chat_id = msg.chat.id.0, delivered = delivered, "Bot joined a new group");
        }
        outcome => debug!(chat_id = msg.chat.id.0, outcome = ?outcome, "Members added"),
    }
    Ok(())
}

/// Handle a left-chat-member service message
pub async fn handle_left_chat_member(msg: Message, services: ServiceFactory) -> Result<()> {
    let Some(user) = msg.left_chat_member() else {
        return Ok(());
    };

    if user.id == services.watcher.bot_id() {
        services.watcher.handle_bot_removed(msg.chat.id.0).await?;
    }
    Ok(())
}

/// Handle a change of the bot's own membership. Kicks do not always come
/// with a left-chat-member message, so this catches them too.
pub async fn handle_my_chat_member(update: ChatMemberUpdated, services: ServiceFactory) -> Result<()> {
    let kind = &update.new_chat_member.kind;
    if kind.is_left() || kind.is_banned() {
        services.watcher.handle_bot_removed(update.chat.id.0).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_link() {
        assert_eq!(invite_link(Some("bazaar_uz")).as_deref(), Some("https://t.me/bazaar_uz"));
        assert_eq!(invite_link(None), None);
    }
}
