use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

mod application;
mod domain;
mod infrastructure;

use application::errors::{CommandError, RegistryError};
use application::messaging::{Context, DispatchOptions, Dispatcher, MessageParser};
use application::services::message_service;
use application::services::StatusRotator;
use application::state::{AppState, BotIdentity};
use domain::entities::command::CommandRegistry;
use domain::entities::{Command, Embed, Message, OutgoingMessage, User};
use domain::traits::Messageable;
use infrastructure::adapters::console::ConsoleChannel;
use infrastructure::adapters::revolt::{RevoltChannel, RevoltClient};
use infrastructure::animals::{AnimalClient, AnimalError, AnimalKind};
use infrastructure::config::Config;
use infrastructure::keepalive::KeepAlive;

#[derive(Parser)]
#[command(name = "meowie-bot")]
#[command(about = "A cat-themed chat bot with random animal facts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config, cli.token);
        }
        Commands::Version => {
            println!("meowie-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn init_config() {
    let config = Config::default();
    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("# Save this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("Failed to render default config: {}", e),
    }
}

fn run_bot(config_path: String, token_override: Option<String>) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting {}", config.bot.name);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return;
        }
    };

    let token = token_override.or_else(|| {
        config
            .adapters
            .revolt
            .as_ref()
            .and_then(|revolt| revolt.token.clone())
    });

    if let Some(token) = token {
        rt.block_on(run_revolt_bot(config, token));
    } else {
        // Run console bot (dev mode)
        rt.block_on(run_console_bot(config));
    }
}

fn build_state(config: &Config, identity: BotIdentity) -> Result<AppState, AnimalError> {
    let animals = AnimalClient::new(
        config.animals.api_base.clone(),
        Duration::from_secs(config.animals.timeout_seconds),
    )?;

    Ok(AppState {
        identity,
        animals,
        prefix: config.bot.prefix.clone(),
        owner: config.bot.owner.clone(),
    })
}

fn build_dispatcher(config: &Config, state: Arc<AppState>) -> Result<Dispatcher, RegistryError> {
    let mut registry = CommandRegistry::new();
    register_general_commands(&mut registry)?;
    register_animal_commands(&mut registry)?;
    register_purge_command(&mut registry)?;

    let mention_token = config
        .dispatch
        .mention_token
        .clone()
        .unwrap_or_else(|| format!("<@{}>", state.identity.id));
    let parser = MessageParser::new(&config.bot.prefix).with_mention_token(mention_token);

    let options = DispatchOptions {
        notify_unknown_command: config.dispatch.notify_unknown_command,
    };

    Ok(Dispatcher::new(parser, registry, options, state))
}

const HELP_TEXT: &str = "Available commands:
^help - Show this message
^version - Show bot version
^ping - Check the bot is alive
^test - Spread luv
^cat / ^dog - Random pictures
^catfact / ^dogfact - Random facts
^fact <animal> - Fact for any known animal
^picture <animal> - Picture for any known animal
^purge <count> - Delete recent messages (owner only)";

fn register_general_commands(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    registry.register(
        Command::new("help")
            .with_description("Show help message")
            .with_handler(|ctx| async move {
                ctx.say(HELP_TEXT).await?;
                Ok(())
            }),
    )?;

    registry.register(
        Command::new("version")
            .with_description("Show bot version")
            .with_handler(|ctx| async move {
                ctx.say(concat!("meowie-bot v", env!("CARGO_PKG_VERSION")))
                    .await?;
                Ok(())
            }),
    )?;

    registry.register(
        Command::new("ping")
            .with_aliases(vec!["pingcog".to_string()])
            .with_description("Check the bot is alive")
            .with_handler(|ctx| async move {
                ctx.say("Pong!").await?;
                Ok(())
            }),
    )?;

    registry.register(
        Command::new("test")
            .with_description("Spread luv")
            .with_handler(|ctx| async move {
                ctx.say("# SPREAD LUV! :cat_blob: :girl_happy:").await?;
                Ok(())
            }),
    )?;

    Ok(())
}

fn register_animal_commands(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    registry.register(
        Command::new("cat")
            .with_description("Kat pics!")
            .with_handler(|ctx| animal_picture(ctx, AnimalKind::Cat, "Hav kat pic!")),
    )?;

    registry.register(
        Command::new("catfact")
            .with_description("Kat fun facts!! (some may be dark)")
            .with_handler(|ctx| animal_fact(ctx, AnimalKind::Cat)),
    )?;

    registry.register(
        Command::new("dog")
            .with_description("Dog pics! >:(")
            .with_handler(|ctx| animal_picture(ctx, AnimalKind::Dog, "Hav dog pic! >:(")),
    )?;

    registry.register(
        Command::new("dogfact")
            .with_description("Dog fun facts!! >:(")
            .with_handler(|ctx| animal_fact(ctx, AnimalKind::Dog)),
    )?;

    registry.register(
        Command::new("fact")
            .with_description("Random fact for any known animal")
            .with_usage("fact <animal>")
            .with_handler(|ctx| async move {
                let Some(kind) = parse_kind_arg(&ctx).await? else {
                    return Ok(());
                };
                animal_fact(ctx, kind).await
            }),
    )?;

    registry.register(
        Command::new("picture")
            .with_aliases(vec!["pic".to_string()])
            .with_description("Random picture for any known animal")
            .with_usage("picture <animal>")
            .with_handler(|ctx| async move {
                let Some(kind) = parse_kind_arg(&ctx).await? else {
                    return Ok(());
                };
                animal_picture(ctx, kind, "Hav animal pic!").await
            }),
    )?;

    Ok(())
}

fn register_purge_command(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    registry.register(
        Command::new("purge")
            .with_description("Delete recent messages (owner only)")
            .with_usage("purge <count>")
            .with_check(|ctx| async move {
                if ctx.state.is_owner(ctx.author_id()) {
                    Ok(true)
                } else {
                    Err(CommandError::NotOwner)
                }
            })
            .with_handler(|ctx| async move {
                let count = ctx
                    .arg(0)
                    .and_then(|arg| arg.parse::<usize>().ok())
                    .filter(|count| (1..=100).contains(count));

                let Some(count) = count else {
                    ctx.say(format!("Usage: {}purge <1-100>", ctx.state.prefix))
                        .await?;
                    return Ok(());
                };

                let deleted = message_service::purge(ctx.channel.as_ref(), count).await?;
                ctx.say(format!("Purged {} messages!", deleted)).await?;
                Ok(())
            }),
    )?;

    Ok(())
}

fn known_kinds() -> String {
    AnimalKind::ALL
        .iter()
        .map(AnimalKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve the first argument to an animal kind, answering with usage help
/// when it is absent or unknown
async fn parse_kind_arg(ctx: &Context) -> Result<Option<AnimalKind>, CommandError> {
    let Some(arg) = ctx.arg(0) else {
        ctx.say(format!(
            "Usage: {}{} <animal>\nKnown animals: {}",
            ctx.state.prefix,
            ctx.command,
            known_kinds()
        ))
        .await?;
        return Ok(None);
    };

    match arg.parse::<AnimalKind>() {
        Ok(kind) => Ok(Some(kind)),
        Err(_) => {
            ctx.say(format!(
                "I dunno that animal :c Try one of: {}",
                known_kinds()
            ))
            .await?;
            Ok(None)
        }
    }
}

async fn animal_fact(ctx: Context, kind: AnimalKind) -> Result<(), CommandError> {
    let fact = ctx.state.animals.fact(kind).await?;
    ctx.say(fact).await?;
    Ok(())
}

/// Send a placeholder, fetch the picture, then edit the same message with
/// the final content and embed
async fn animal_picture(
    ctx: Context,
    kind: AnimalKind,
    caption: &'static str,
) -> Result<(), CommandError> {
    let placeholder = format!("{} (Embd loading... sry 4 waitin :c )", caption);
    let handle = ctx.say(placeholder).await?;

    let url = ctx.state.animals.picture(kind).await?;

    ctx.edit(
        &handle,
        OutgoingMessage::text(caption).with_embed(Embed::media(url)),
    )
    .await?;

    Ok(())
}

async fn run_revolt_bot(config: Config, token: String) {
    let revolt_cfg = config.adapters.revolt.clone().unwrap_or_default();

    let client = match RevoltClient::new(token, revolt_cfg.api_base.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!("Failed to build platform client: {}", e);
            return;
        }
    };

    // Fetch bot info
    let me = match client.fetch_self().await {
        Ok(me) => me,
        Err(e) => {
            tracing::error!("Failed to fetch bot info: {}", e);
            return;
        }
    };
    tracing::info!("Bot started: @{}", me.display_name());

    let identity = BotIdentity {
        id: me.id.clone(),
        username: me.display_name().to_string(),
    };

    let state = match build_state(&config, identity) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to build application state: {}", e);
            return;
        }
    };

    let dispatcher = match build_dispatcher(&config, Arc::clone(&state)) {
        Ok(dispatcher) => Arc::new(dispatcher),
        Err(e) => {
            tracing::error!("Command registration failed: {}", e);
            return;
        }
    };

    let _keepalive = if config.keepalive.enabled {
        match config.keepalive.bind.parse() {
            Ok(addr) => Some(KeepAlive::spawn(addr)),
            Err(e) => {
                tracing::warn!("Invalid keep-alive bind address: {}", e);
                None
            }
        }
    } else {
        None
    };

    let _status = if config.status.enabled && !config.status.entries.is_empty() {
        let rotator = StatusRotator::new(
            config.status.entries.clone(),
            Duration::from_secs(config.status.interval_seconds),
            config.status.rounds,
        );
        Some(rotator.spawn(Arc::clone(&client)))
    } else {
        None
    };

    if revolt_cfg.channels.is_empty() {
        tracing::warn!("No channels configured to watch; only keep-alive and status will run");
    }

    // Seed per-channel cursors so old history is not replayed
    let mut cursors: HashMap<String, Option<String>> = HashMap::new();
    for channel_id in &revolt_cfg.channels {
        match client.fetch_messages(channel_id, 1).await {
            Ok(mut latest) => {
                cursors.insert(channel_id.clone(), latest.pop().map(|m| m.id));
            }
            Err(e) => {
                tracing::warn!("Failed to seed cursor for {}: {}", channel_id, e);
                cursors.insert(channel_id.clone(), None);
            }
        }
    }

    let poll_period = Duration::from_secs(revolt_cfg.poll_interval_seconds.max(1));

    tracing::info!("Starting message loop...");

    loop {
        for channel_id in &revolt_cfg.channels {
            let after = cursors.get(channel_id).cloned().flatten();

            match client.poll_channel(channel_id, after.as_deref()).await {
                Ok(messages) => {
                    if let Some(last) = messages.last() {
                        cursors.insert(channel_id.clone(), Some(last.id.clone()));
                    }

                    for api_message in messages {
                        let message = api_message.into_message();
                        let channel: Arc<dyn Messageable> = Arc::new(RevoltChannel::new(
                            Arc::clone(&client),
                            message.channel_id.clone(),
                        ));
                        let dispatcher = Arc::clone(&dispatcher);

                        // Each message runs on its own task so a suspended
                        // handler never stalls the poll loop
                        tokio::spawn(async move {
                            dispatcher.dispatch(message, channel).await;
                        });
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to poll {}: {}", channel_id, e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }

        tokio::time::sleep(poll_period).await;
    }
}

async fn run_console_bot(config: Config) {
    tracing::info!("Starting console bot (dev mode)");

    let identity = BotIdentity {
        id: "console-bot".to_string(),
        username: config.bot.name.clone(),
    };

    let state = match build_state(&config, identity) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to build application state: {}", e);
            return;
        }
    };

    let dispatcher = match build_dispatcher(&config, state) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            tracing::error!("Command registration failed: {}", e);
            return;
        }
    };

    let channel: Arc<dyn Messageable> = Arc::new(ConsoleChannel::new());

    loop {
        let Some(input) = ConsoleChannel::read_line("> ").await else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        let message = Message::new("console", User::new("console"), input);
        dispatcher.dispatch(message, Arc::clone(&channel)).await;
    }
}
