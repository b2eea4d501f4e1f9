use crate::ai::AiClient;
use crate::api;
use crate::engine::{Checker, EventSink, Severity};
use crate::sites::{parse_import, ImportFormat};
use crate::store::{LocalFsStore, SiteStore};
use crate::tools::fetch::HttpTransport;
use crate::types::ApiResponse;
use crate::{runtime, MonitorError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitewatch", version, about = "Website monitoring (JSON only)")]
pub struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(subcommand)]
    Site(SiteCmd),
    /// Check one site, or every site with `all`
    Check(CheckArgs),
    /// Import sites from a csv/json/text file, then check them
    Import(ImportArgs),
    /// Export the collection with per-site availability
    Export,
    /// Show (or clear) a site's check history
    History(HistoryArgs),
    /// Run AI analysis over a site's page content
    Analyze(AnalyzeArgs),
    /// List the AI models the configured API offers
    Models,
    #[command(subcommand)]
    Settings(SettingsCmd),
    /// Fleet-wide status figures
    Stats,
    /// Show the activity log, newest first
    Logs(LogsArgs),
}

#[derive(Subcommand)]
enum SiteCmd {
    Add(AddArgs),
    List,
    Update(UpdateArgs),
    Delete(DeleteArgs),
}

#[derive(Args)]
struct AddArgs {
    /// URL to monitor; `https://` is assumed when no scheme is given
    url: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Args)]
struct UpdateArgs {
    /// Site id or URL
    target: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "tag")]
    tags: Option<Vec<String>>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args)]
struct DeleteArgs {
    /// Site id or URL
    target: String,
    #[arg(long = "yes")]
    yes: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Site id or URL, or `all`
    target: String,
}

#[derive(Args)]
struct ImportArgs {
    file: PathBuf,
    /// csv, json, or text; guessed from the extension when omitted
    #[arg(long)]
    format: Option<String>,
}

#[derive(Args)]
struct HistoryArgs {
    /// Site id or URL
    target: String,
    #[arg(long)]
    clear: bool,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Site id or URL
    target: String,
    /// Overrides the model from settings
    #[arg(long)]
    model: Option<String>,
}

#[derive(Subcommand)]
enum SettingsCmd {
    Show,
    Set(SetArgs),
}

#[derive(Args)]
struct SetArgs {
    #[arg(long)]
    check_interval_ms: Option<u64>,
    #[arg(long)]
    slow_threshold_ms: Option<u64>,
    #[arg(long)]
    ai_model: Option<String>,
    #[arg(long)]
    ai_api_key: Option<String>,
    #[arg(long)]
    notify_offline: Option<bool>,
    #[arg(long)]
    notify_online: Option<bool>,
    #[arg(long)]
    notify_slow: Option<bool>,
}

#[derive(Args)]
struct LogsArgs {
    /// Only lines mentioning this site
    #[arg(long)]
    site: Option<String>,
    #[arg(long)]
    errors: bool,
}

/// Sink that prints domain events to stderr, keeping stdout JSON-clean.
struct StderrSink;
impl EventSink for StderrSink {
    fn notify(&self, message: &str, severity: Severity) {
        let marker = match severity {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warn",
            Severity::Error => "error",
        };
        eprintln!("[{marker}] {message}");
    }
}

pub fn run() {
    let cli = Cli::parse();
    let store = match LocalFsStore::new() {
        Ok(s) => s,
        Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
    };

    match cli.cmd {
        Command::Site(sc) => site_cmd(&store, sc),
        Command::Check(CheckArgs { target }) => {
            let checker = match make_checker(&store) {
                Ok(c) => c,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            if target == "all" {
                finish(runtime::block_on(api::check_all(&store, &checker)));
            } else {
                finish(runtime::block_on(api::check_site(&store, &checker, &target)));
            }
        }
        Command::Import(ImportArgs { file, format }) => {
            let content = match std::fs::read_to_string(&file) {
                Ok(c) => c,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            let format = match format.as_deref() {
                Some("csv") => ImportFormat::Csv,
                Some("json") => ImportFormat::Json,
                Some("text") => ImportFormat::Text,
                Some(other) => {
                    return print_json(ApiResponse::<()>::err(format!(
                        "unknown import format: {other}"
                    )))
                }
                None => ImportFormat::from_extension(
                    file.extension().and_then(|e| e.to_str()),
                ),
            };
            let records = match parse_import(&content, format) {
                Ok(r) => r,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            let checker = match make_checker(&store) {
                Ok(c) => c,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            finish(runtime::block_on(api::import_sites(&store, &checker, records)));
        }
        Command::Export => finish(api::export_sites(&store)),
        Command::History(HistoryArgs { target, clear }) => {
            if clear {
                finish(api::clear_history(&store, &target));
            } else {
                finish(api::site_history(&store, &target));
            }
        }
        Command::Analyze(AnalyzeArgs { target, model }) => {
            let checker = match make_checker(&store) {
                Ok(c) => c,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            let ai = match make_ai_client(&store, model) {
                Ok(c) => c,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            finish(runtime::block_on(api::analyze_site(&store, &checker, &ai, &target)));
        }
        Command::Models => {
            let ai = match make_ai_client(&store, None) {
                Ok(c) => c,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            finish(runtime::block_on(ai.list_models()));
        }
        Command::Settings(sc) => settings_cmd(&store, sc),
        Command::Stats => finish(api::stats(&store)),
        Command::Logs(LogsArgs { site, errors }) => {
            let result = crate::log::ActivityLogger::new()
                .and_then(|logger| logger.read_logs(site.as_deref(), errors));
            finish(result);
        }
    }
}

fn site_cmd(store: &LocalFsStore, sc: SiteCmd) {
    match sc {
        SiteCmd::Add(AddArgs {
            url,
            name,
            tags,
            description,
        }) => {
            let checker = match make_checker(store) {
                Ok(c) => c,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            finish(runtime::block_on(api::add_site(
                store,
                &checker,
                &url,
                name.as_deref(),
                tags,
                description,
            )));
        }
        SiteCmd::List => finish(api::list_sites(store)),
        SiteCmd::Update(UpdateArgs {
            target,
            name,
            tags,
            description,
        }) => finish(api::update_site(store, &target, name, tags, description)),
        SiteCmd::Delete(DeleteArgs { target, yes }) => {
            if !yes {
                return print_json(ApiResponse::<()>::err("refusing to delete without --yes"));
            }
            finish(api::delete_site(store, &target));
        }
    }
}

fn settings_cmd(store: &LocalFsStore, sc: SettingsCmd) {
    match sc {
        SettingsCmd::Show => finish(api::get_settings(store)),
        SettingsCmd::Set(args) => {
            let mut settings = match store.load_settings() {
                Ok(s) => s,
                Err(e) => return print_json(ApiResponse::<()>::err(e.to_string())),
            };
            if let Some(v) = args.check_interval_ms {
                settings.check_interval_ms = v;
            }
            if let Some(v) = args.slow_threshold_ms {
                settings.slow_response_threshold_ms = v;
            }
            if let Some(v) = args.ai_model {
                settings.ai_model = v;
            }
            if let Some(v) = args.ai_api_key {
                settings.ai_api_key = v;
            }
            if let Some(v) = args.notify_offline {
                settings.notifications.offline = v;
            }
            if let Some(v) = args.notify_online {
                settings.notifications.online = v;
            }
            if let Some(v) = args.notify_slow {
                settings.notifications.slow_response = v;
            }
            finish(api::update_settings(store, &settings));
        }
    }
}

fn make_checker(store: &LocalFsStore) -> crate::Result<Checker> {
    let settings = store.load_settings()?;
    Ok(Checker::new(
        Box::new(HttpTransport::new()?),
        Box::new(StderrSink),
        (&settings).into(),
    ))
}

fn make_ai_client(store: &LocalFsStore, model: Option<String>) -> crate::Result<AiClient> {
    let settings = store.load_settings()?;
    let api_key = if !settings.ai_api_key.is_empty() {
        settings.ai_api_key.clone()
    } else {
        std::env::var("GEMINI_API_KEY").map_err(|_| {
            MonitorError::AiRequest(
                "no API key: set GEMINI_API_KEY or `settings set --ai-api-key`".into(),
            )
        })?
    };
    let model = model.unwrap_or(settings.ai_model);
    AiClient::new(api_key, model)
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) {
    match res {
        Ok(v) => print_json(ApiResponse::ok(v)),
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}
fn print_json<T: serde::Serialize>(val: T) {
    // pretty JSON output
    println!("{}", serde_json::to_string_pretty(&val).unwrap());
}
