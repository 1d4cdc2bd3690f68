//! Reply and inline keyboards shown to the operator

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};
use crate::handlers::callbacks::CallbackAction;
use crate::i18n::I18n;

fn button(i18n: &I18n, lang: &str, key: &str) -> KeyboardButton {
    KeyboardButton::new(i18n.t(&format!("buttons.{}", key), lang, None))
}

/// Main menu: manage advertisements and the broadcast
pub fn main_menu(i18n: &I18n, lang: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![button(i18n, lang, "ads"), button(i18n, lang, "new_ad")],
        vec![button(i18n, lang, "broadcast"), button(i18n, lang, "stop")],
        vec![button(i18n, lang, "status")],
    ])
    .resize_keyboard()
}

/// Composition wizard menu
pub fn wizard_menu(i18n: &I18n, lang: &str) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![button(i18n, lang, "image"), button(i18n, lang, "body")],
        vec![button(i18n, lang, "contact"), button(i18n, lang, "save")],
        vec![button(i18n, lang, "cancel")],
    ])
    .resize_keyboard()
}

/// Select and Delete buttons under a listed advertisement
pub fn advertisement_actions(i18n: &I18n, lang: &str, advertisement_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(
            i18n.t("inline.select", lang, None),
            CallbackAction::Select(advertisement_id).to_data(),
        ),
        InlineKeyboardButton::callback(
            i18n.t("inline.delete", lang, None),
            CallbackAction::Delete(advertisement_id).to_data(),
        ),
    ]])
}
