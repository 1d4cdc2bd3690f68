//! Broadcast control commands

use teloxide::{Bot, types::Message, prelude::*};
use crate::utils::errors::Result;
use crate::services::{EngineState, ServiceFactory, StartOutcome, StopOutcome};
use crate::i18n::I18n;
use crate::utils::logging;
use super::{operator_id, operator_language};

/// Handle /broadcast
pub async fn handle_start_broadcast(bot: Bot, msg: Message, services: ServiceFactory, i18n: I18n) -> Result<()> {
    let lang = operator_language(&msg, &i18n);

    let key = match services.engine.start().await? {
        StartOutcome::Started { has_active: true } => "broadcast.started",
        StartOutcome::Started { has_active: false } => "broadcast.started_no_active",
        StartOutcome::AlreadyRunning => "broadcast.already_running",
        StartOutcome::Stopping => "broadcast.stopping",
    };
    logging::log_operator_action(operator_id(&msg)?, "broadcast_start", Some(key));

    bot.send_message(msg.chat.id, i18n.t(key, &lang, None)).await?;
    Ok(())
}

/// Handle /stop
pub async fn handle_stop_broadcast(bot: Bot, msg: Message, services: ServiceFactory, i18n: I18n) -> Result<()> {
    let lang = operator_language(&msg, &i18n);

    let key = match services.engine.stop().await {
        StopOutcome::Stopped => "broadcast.stopped",
        StopOutcome::NotRunning => "broadcast.not_running",
    };
    logging::log_operator_action(operator_id(&msg)?, "broadcast_stop", Some(key));

    bot.send_message(msg.chat.id, i18n.t(key, &lang, None)).await?;
    Ok(())
}

/// Handle /status
pub async fn handle_status(bot: Bot, msg: Message, services: ServiceFactory, i18n: I18n) -> Result<()> {
    let lang = operator_language(&msg, &i18n);

    let state = match services.engine.state().await {
        EngineState::Running => i18n.t("broadcast.status_running", &lang, None),
        EngineState::Stopping => i18n.t("broadcast.status_stopping", &lang, None),
        EngineState::Idle => i18n.t("broadcast.status_idle", &lang, None),
    };
    let active = match services.tracker.get_active().await? {
        Some(advertisement) => i18n.t_with("broadcast.active", &lang, "id", advertisement.id),
        None => i18n.t("broadcast.no_active", &lang, None),
    };
    let groups = services.store.list_groups().await?.len();
    let groups = i18n.t_with("broadcast.groups", &lang, "count", groups);

    bot.send_message(msg.chat.id, format!("{}\n{}\n{}", state, active, groups)).await?;
    Ok(())
}
