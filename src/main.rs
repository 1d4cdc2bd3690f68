//! AdRelay Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::info;

use AdRelay::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, PoolConfig, RecordStore, create_pool, run_migrations},
    services::{ServiceFactory, TelegramGateway},
    state::StateStorage,
    i18n::I18n,
    handlers::{
        Command, handle_command, handle_callback_query, handle_message,
        handle_new_chat_members, handle_left_chat_member, handle_my_chat_member,
    },
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting AdRelay Telegram Bot...");

    info!("Connecting to database...");
    let db_pool = create_pool(&PoolConfig::from_settings(&settings.database)).await?;

    info!("Running database migrations...");
    run_migrations(&db_pool).await?;

    let store: Arc<dyn RecordStore> = Arc::new(DatabaseService::new(db_pool));

    info!("Connecting to Redis...");
    let state_storage = StateStorage::new(settings.redis.clone()).await?;
    state_storage.test_connection().await?;

    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations().await?;

    let bot = Bot::new(&settings.bot.token);
    let me = bot.get_me().await?;
    info!(bot_id = me.id.0, username = ?me.username, "Authorized");

    let services = ServiceFactory::new(&settings, me.id, store, TelegramGateway::new(bot.clone()));
    services.images.ensure_dir().await?;
    let engine = services.engine.clone();

    let services_arc = Arc::new(services);
    let state_storage_arc = Arc::new(state_storage);
    let i18n_arc = Arc::new(i18n);

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![services_arc, state_storage_arc, i18n_arc])
        .default_handler(|upd| async move {
            logging::log_unhandled_update(&upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("AdRelay bot is ready!");
    dispatcher.dispatch().await;

    // Let a cycle in progress finish before exiting
    engine.stop().await;

    info!("AdRelay bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::filter(|msg: Message| msg.new_chat_members().is_some())
                        .endpoint(on_new_members),
                )
                .branch(
                    dptree::filter(|msg: Message| msg.left_chat_member().is_some())
                        .endpoint(on_left_member),
                )
                .branch(
                    dptree::filter(|msg: Message| msg.chat.is_private())
                        .branch(dptree::entry().filter_command::<Command>().endpoint(on_command))
                        .branch(dptree::endpoint(on_message)),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(on_callback))
        .branch(Update::filter_my_chat_member().endpoint(on_my_chat_member))
}

/// Handle operator commands
async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();
    let state_storage = (*state_storage).clone();
    let i18n = (*i18n).clone();

    if let Err(e) = handle_command(bot, msg, cmd, services, state_storage, i18n).await {
        logging::log_error(&e, "command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle private messages: buttons and wizard input
async fn on_message(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    state_storage: Arc<StateStorage>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();
    let state_storage = (*state_storage).clone();
    let i18n = (*i18n).clone();

    if let Err(e) = handle_message(bot, msg, services, state_storage, i18n).await {
        logging::log_error(&e, "message");
        return Err(e.into());
    }

    Ok(())
}

async fn on_new_members(msg: Message, services: Arc<ServiceFactory>) -> HandlerResult {
    if let Err(e) = handle_new_chat_members(msg, (*services).clone()).await {
        logging::log_error(&e, "new_chat_members");
        return Err(e.into());
    }

    Ok(())
}

async fn on_left_member(msg: Message, services: Arc<ServiceFactory>) -> HandlerResult {
    if let Err(e) = handle_left_chat_member(msg, (*services).clone()).await {
        logging::log_error(&e, "left_chat_member");
        return Err(e.into());
    }

    Ok(())
}

/// Handle inline button callbacks
async fn on_callback(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    services: Arc<ServiceFactory>,
    i18n: Arc<I18n>,
) -> HandlerResult {
    if let Err(e) = handle_callback_query(bot, query, (*services).clone(), (*i18n).clone()).await {
        logging::log_error(&e, "callback_query");
        return Err(e.into());
    }

    Ok(())
}

/// Handle changes of the bot's own membership
async fn on_my_chat_member(
    update: teloxide::types::ChatMemberUpdated,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    if let Err(e) = handle_my_chat_member(update, (*services).clone()).await {
        logging::log_error(&e, "my_chat_member");
        return Err(e.into());
    }

    Ok(())
}
