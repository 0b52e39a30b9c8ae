//! `ile`: renders chat-bot reply templates with the Inline Logic Engine.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ile_application::ports::RandomSource;
use ile_application::use_cases::{FindAutoReply, RenderReply};
use ile_application::{TemplateEngine, ile};
use ile_domain::TenantId;
use ile_infrastructure::{InMemoryStore, SeededRandom, ThreadRandom, from_json, load_snapshot, to_json_stable};

mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "ile", version, about = "Expand ${...} expressions in reply templates")]
struct Cli {
    /// Configuration file (default: ./ile.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store snapshot; overrides `data_file` from the configuration
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Expand a template file for a tenant and print the messages
    Render {
        /// Template JSON file
        template: PathBuf,
        #[arg(long)]
        tenant: String,
        /// Seed for reproducible `rand` output
        #[arg(long)]
        seed: Option<u64>,
        /// Fail on lookup errors instead of printing the unprocessed template
        #[arg(long)]
        strict: bool,
    },

    /// Show how every `${...}` in a template parses, without evaluating
    Inspect {
        /// Template JSON file
        template: PathBuf,
    },

    /// Find the auto-reply for an incoming message and render it
    Match {
        /// Incoming message text
        message: String,
        #[arg(long)]
        tenant: String,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List the built-in functions
    Functions,
}

type Engine = TemplateEngine<InMemoryStore, InMemoryStore, dyn RandomSource>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("load settings")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.log_filter))
                .context("parse log filter")?,
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_file = cli.data.clone().or_else(|| settings.data_file.clone());

    match cli.cmd {
        Cmd::Render {
            template,
            tenant,
            seed,
            strict,
        } => {
            let store = open_store(data_file).await?;
            let tenant = TenantId::new(tenant).context("tenant id")?;
            let template = read_template(&template).await?;
            let use_case = RenderReply::new(engine(&settings, &store, seed));

            if strict {
                let messages = use_case.execute_strict(&template, &tenant).await?;
                print!("{}", to_json_stable(&messages)?);
            } else {
                let reply = use_case.execute(&template, &tenant).await;
                info!(summary = %reply.summary(), fallback = reply.is_fallback(), "rendered");
                print!("{}", to_json_stable(&reply)?);
            }
            Ok(())
        }

        Cmd::Inspect { template } => {
            let template = read_template(&template).await?;
            print!("{}", to_json_stable(&ile::inspect_value(&template))?);
            Ok(())
        }

        Cmd::Match {
            message,
            tenant,
            seed,
        } => {
            let store = open_store(data_file).await?;
            let tenant = TenantId::new(tenant).context("tenant id")?;
            let found = FindAutoReply::new(Arc::new(store.clone()))
                .execute(&tenant, &message)
                .await?;
            let Some(auto_reply) = found else {
                eprintln!("no auto-reply matched");
                return Ok(());
            };

            let reply = RenderReply::new(engine(&settings, &store, seed))
                .render_auto_reply(&auto_reply)
                .await;
            let output = serde_json::json!({
                "auto_reply_id": auto_reply.id,
                "keyword": auto_reply.keyword,
                "match_type": auto_reply.match_type,
                "summary": reply.summary(),
                "reply": reply,
            });
            print!("{}", to_json_stable(&output)?);
            Ok(())
        }

        Cmd::Functions => {
            for builtin in ile::Builtin::available() {
                println!("{:<10} {:<60} {}", builtin.name, builtin.description, builtin.example);
            }
            Ok(())
        }
    }
}

async fn open_store(data_file: Option<PathBuf>) -> Result<InMemoryStore> {
    match data_file {
        Some(path) => {
            let snapshot = load_snapshot(&path).await?;
            Ok(InMemoryStore::from_snapshot(snapshot))
        }
        None => Ok(InMemoryStore::new()),
    }
}

async fn read_template(path: &std::path::Path) -> Result<serde_json::Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read template {}", path.display()))?;
    from_json(&raw).with_context(|| format!("parse template {}", path.display()))
}

fn engine(settings: &Settings, store: &InMemoryStore, seed: Option<u64>) -> Engine {
    let random: Arc<dyn RandomSource> = match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom::new()),
    };
    let store = Arc::new(store.clone());
    let engine = TemplateEngine::new(Arc::clone(&store), store, random)
        .with_max_passes(settings.max_passes);
    match settings.timeout() {
        Some(timeout) => engine.with_timeout(timeout),
        None => engine,
    }
}
