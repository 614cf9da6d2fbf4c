//! Gigi operator binary: wires the catalog, policy, handlers, and
//! dispatcher together, then drives them from a small operator REPL.
//!
//! HTTP mounting for the production webhooks lives in the deployment
//! layer; this binary exercises the same adapters from the terminal.

mod config;
mod crm;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use crm::HttpCrmStore;
use gigi_catalog::Catalog;
use gigi_channels::{ChatAdapter, SmsAdapter, TelephonyClient, VoiceAdapter};
use gigi_core::{Channel, CrmStore, SmsError, SmsSender};
use gigi_dispatch::Dispatcher;
use gigi_executor::AdminCliExecutor;
use gigi_policy::{is_visible, schemas_for_channel, ChannelOverrides, CommandGuard, PolicyFile};
use gigi_tools::{build_registry, builtin_definitions, Resources};

/// Stand-in sender for environments without telephony credentials.
struct ConsoleSender;

#[async_trait]
impl SmsSender for ConsoleSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        println!("[sms to {to}] {body}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("gigi.toml"));
    let config = Config::load(&config_path)?;

    let policy = match &config.policy_file {
        Some(path) => PolicyFile::load(path)
            .with_context(|| format!("failed to load policy file {}", path.display()))?,
        None => PolicyFile::default(),
    };

    // Clients are built once here and injected; handlers hold no hidden
    // global state.
    let crm: Arc<dyn CrmStore> = Arc::new(HttpCrmStore::new(
        config.crm.base_url.clone(),
        Config::crm_token()?,
    ));
    let sender: Arc<dyn SmsSender> = match &config.telephony {
        Some(telephony) => Arc::new(TelephonyClient::new(
            telephony.base_url.clone(),
            telephony.from_number.clone(),
            Config::telephony_token()?,
        )),
        None => Arc::new(ConsoleSender),
    };
    let guard = Arc::new(
        CommandGuard::new(&config.admin_cli.program)
            .with_extra_verbs(&policy.extra_allowed_verbs, &policy.extra_blocked_verbs),
    );
    let admin_cli = Arc::new(AdminCliExecutor::new(
        &config.admin_cli.program,
        config.admin_cli.timeout_ms,
        config.admin_cli.max_output_bytes,
    ));

    // Startup integrity: a duplicate tool name or an unresolved handler
    // key refuses to start.
    let catalog = Arc::new(
        Catalog::build(builtin_definitions()).context("tool catalog failed integrity check")?,
    );
    let registry = build_registry(Resources {
        crm,
        guard,
        admin_cli,
    });
    registry
        .verify(&catalog)
        .context("handler registry failed integrity check")?;

    let overrides = Arc::new(ChannelOverrides::with_extra(
        &policy.voice_excluded,
        &policy.sms_excluded,
        &policy.chat_excluded,
    ));
    let dispatcher = Arc::new(Dispatcher::new(
        catalog.clone(),
        overrides.clone(),
        Arc::new(registry),
        config.dispatch.timeout_ms,
    ));

    info!(tools = catalog.len(), "gigi dispatch ready");

    let voice = VoiceAdapter::new(dispatcher.clone());
    let sms = SmsAdapter::new(dispatcher.clone(), sender);
    let chat = ChatAdapter::new(dispatcher);

    println!("gigi operator console - 'help' for commands");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line.split_whitespace().next() {
            None => continue,
            Some("quit") | Some("exit") => break,
            Some("help") => print_help(),
            Some("tools") => print_tools(&catalog, &overrides, line),
            Some("schemas") => print_schemas(&catalog, &overrides, line),
            Some("!gigi") => {
                if let Some(reply) = chat.handle_message("operator", "console", line).await {
                    println!("{reply}");
                }
            }
            Some("voice") => {
                let payload = line.trim_start_matches("voice").trim();
                match serde_json::from_str(payload) {
                    Ok(value) => match voice.handle_tool_call(&value).await {
                        Ok(reply) => println!("[spoken] {}", reply.response),
                        Err(e) => println!("voice error: {e}"),
                    },
                    Err(e) => println!("expected a JSON payload after 'voice': {e}"),
                }
            }
            Some("sms") => match parse_sms_command(line) {
                Some((conversation, from, tool, args)) => {
                    match sms.handle_tool_call(&conversation, &from, &tool, args).await {
                        Ok(body) => println!("[reply] {body}"),
                        Err(e) => println!("sms error: {e}"),
                    }
                }
                None => println!("usage: sms <conversation> <from> <tool> [json-args]"),
            },
            Some(other) => println!("unknown command '{other}' - try 'help'"),
        }
    }

    Ok(())
}

fn print_help() {
    println!("  tools <voice|sms|chat>         list tools visible on a channel");
    println!("  schemas <voice|sms|chat>       dump that channel's tool schemas");
    println!("  !gigi <tool> [json-args]       dispatch as the chat adapter");
    println!("  voice <json-payload>           dispatch a vendor tool-call webhook");
    println!("  sms <conv> <from> <tool> [json] dispatch as the sms adapter");
    println!("  quit");
}

fn channel_arg(line: &str) -> Option<Channel> {
    match line.split_whitespace().nth(1) {
        Some("voice") => Some(Channel::Voice),
        Some("sms") => Some(Channel::Sms),
        Some("chat") => Some(Channel::Chat),
        _ => None,
    }
}

fn print_tools(catalog: &Catalog, overrides: &ChannelOverrides, line: &str) {
    let Some(channel) = channel_arg(line) else {
        println!("usage: tools <voice|sms|chat>");
        return;
    };
    for def in catalog.list_for_channel(channel) {
        if is_visible(def, channel, overrides) {
            println!("  {:<24} {}", def.name, def.description);
        }
    }
}

fn print_schemas(catalog: &Catalog, overrides: &ChannelOverrides, line: &str) {
    let Some(channel) = channel_arg(line) else {
        println!("usage: schemas <voice|sms|chat>");
        return;
    };
    for schema in schemas_for_channel(catalog, channel, overrides) {
        println!("{schema}");
    }
}

fn parse_sms_command(
    line: &str,
) -> Option<(String, String, String, serde_json::Map<String, serde_json::Value>)> {
    let mut parts = line.splitn(5, char::is_whitespace);
    parts.next()?; // "sms"
    let conversation = parts.next()?.to_string();
    let from = parts.next()?.to_string();
    let tool = parts.next()?.to_string();
    let args = match parts.next().map(str::trim) {
        None | Some("") => serde_json::Map::new(),
        Some(json_text) => match serde_json::from_str(json_text) {
            Ok(serde_json::Value::Object(m)) => m,
            _ => return None,
        },
    };
    Some((conversation, from, tool, args))
}
