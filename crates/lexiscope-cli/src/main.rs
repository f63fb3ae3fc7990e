//! lexiscope: command-line driver for the corpus analysis service.
//!
//! Every subcommand prints the resulting view model as pretty JSON on
//! stdout. Logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexiscope_client::{AnalysisClient, ClientConfig};
use lexiscope_core::{AnalysisApi, Corpus, JobKind, LogOddsVariant, StatType};
use lexiscope_jobs::TrackerEvent;
use lexiscope_session::{Session, SessionConfig};

#[derive(Parser)]
#[command(name = "lexiscope")]
#[command(author, version, about = "Compare media coverage of two conflicts through a remote analysis service")]
#[command(propagate_version = true)]
struct Cli {
    /// Base URL of the analysis service
    #[arg(long, global = true, env = "LEXISCOPE_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the analysis service is reachable
    Health,

    /// Show job status
    Status {
        /// Only this job (scraping, lexical, semantic, sentiment)
        #[arg(short, long)]
        kind: Option<JobKind>,
    },

    /// Start scraping
    Scrape {
        /// Poll the scraping status for up to this many seconds
        #[arg(short, long)]
        watch: Option<u64>,
    },

    /// Browse scraped texts
    Corpus {
        #[arg(short, long, default_value = "gaza")]
        corpus: Corpus,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u64,
    },

    /// Lexical statistics with n-grams for both corpora
    Lexical,

    /// Per-actor token tables for both corpora
    Actor {
        /// Actor name, e.g. israel, palestin, russia, ukraine
        actor: String,

        /// Table to select: context, adjectives, nouns, verbs
        #[arg(short, long, default_value = "context")]
        stat: StatType,
    },

    /// Concordances, neighbors and clusters
    Semantic {
        #[arg(short, long, default_value = "gaza")]
        corpus: Corpus,
    },

    /// Victim and actor sentiment
    Sentiment {
        #[arg(short, long, default_value = "gaza")]
        corpus: Corpus,
    },

    /// Start a job
    Start {
        /// scraping, lexical, semantic or sentiment
        kind: JobKind,

        /// Wait for the delayed reload and print the refreshed results
        #[arg(short, long)]
        wait: bool,
    },

    /// One slice of the log-odds table
    Logodds {
        /// top200, bottom200 or full
        #[arg(short, long, default_value = "top200")]
        variant: LogOddsVariant,
    },

    /// Per-corpus tf-idf scores
    Tfidf {
        #[arg(short, long, default_value = "gaza")]
        corpus: Corpus,
    },

    /// Per-corpus word frequencies
    Wordfreq {
        #[arg(short, long, default_value = "gaza")]
        corpus: Corpus,
    },
}

fn init_logging() {
    // LOG_FORMAT - "json" or "text" (default: "text")
    // RUST_LOG   - standard env filter (default: "info")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let mut client_config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        client_config = client_config.with_base_url(url);
    }
    if let Some(secs) = cli.timeout_secs {
        client_config = client_config.with_timeout_secs(secs);
    }
    let client = AnalysisClient::new(&client_config).context("invalid client configuration")?;
    let api: Arc<dyn AnalysisApi> = Arc::new(client);
    let session = Session::new(api.clone(), SessionConfig::from_env());

    match cli.command {
        Commands::Health => {
            let healthy = api.health_check().await?;
            print_json(&serde_json::json!({
                "base_url": client_config.base_url,
                "healthy": healthy,
            }))?;
            if !healthy {
                bail!("analysis service is not reachable");
            }
        }
        Commands::Status { kind } => {
            let kinds = kind.map_or_else(|| JobKind::ALL.to_vec(), |k| vec![k]);
            let mut statuses = Vec::with_capacity(kinds.len());
            for kind in kinds {
                session
                    .tracker()
                    .refresh_status(kind)
                    .await
                    .with_context(|| format!("failed to fetch {} status", kind))?;
                statuses.push(session.job_status(kind));
            }
            print_json(&statuses)?;
        }
        Commands::Scrape { watch } => {
            let mut events = session.tracker().events();
            let refresh = session.start_scraping().await?;
            print_json(&session.job_status(JobKind::Scraping))?;

            if let Some(secs) = watch {
                watch_scraping(&session, &mut events, Duration::from_secs(secs)).await?;
                if refresh.wait().await.is_some() {
                    if let Some(view) = session.corpus_view() {
                        print_json(&*view)?;
                    }
                }
            }
        }
        Commands::Corpus { corpus, page } => {
            session.select_corpus(corpus);
            let view = session.load_corpus_page(page).await?;
            print_json(&*view)?;
        }
        Commands::Lexical => {
            let view = session.load_lexical().await?;
            print_json(&*view)?;
        }
        Commands::Actor { actor, stat } => {
            let view = session.load_actor_stats(&actor, stat).await;
            print_json(&*view)?;
        }
        Commands::Semantic { corpus } => {
            let view = session.load_semantic(corpus).await;
            print_json(&*view)?;
        }
        Commands::Sentiment { corpus } => {
            let view = session.load_sentiment(corpus).await;
            print_json(&*view)?;
        }
        Commands::Start { kind, wait } => {
            let refresh = session.start_analysis(kind).await?;
            print_json(&session.job_status(kind))?;

            if wait {
                info!(
                    job_kind = %kind,
                    delay_ms = refresh.delay().as_millis() as u64,
                    "Waiting for delayed reload"
                );
                if refresh.wait().await.is_some() {
                    print_refreshed(&session, kind)?;
                }
            }
        }
        Commands::Logodds { variant } => {
            let entries = session.aggregator().logodds(variant).await?;
            print_json(&entries)?;
        }
        Commands::Tfidf { corpus } => {
            let entries = session.aggregator().tfidf(corpus).await?;
            print_json(&entries)?;
        }
        Commands::Wordfreq { corpus } => {
            let entries = session.aggregator().wordfreq(corpus).await?;
            print_json(&entries)?;
        }
    }

    Ok(())
}

/// Print scraping status changes until scraping stops or `limit` elapses.
async fn watch_scraping(
    session: &Session,
    events: &mut tokio::sync::broadcast::Receiver<TrackerEvent>,
    limit: Duration,
) -> anyhow::Result<()> {
    let poll = session.watch_scraping();
    let deadline = tokio::time::sleep(limit);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = events.recv() => match event {
                Ok(TrackerEvent::StatusChanged(status)) if status.kind == JobKind::Scraping => {
                    print_json(&status)?;
                    if !status.running {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed status events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    poll.shutdown().await;
    Ok(())
}

fn print_refreshed(session: &Session, kind: JobKind) -> anyhow::Result<()> {
    match kind {
        JobKind::Scraping => match session.corpus_view() {
            Some(view) => print_json(&*view),
            None => Ok(()),
        },
        JobKind::Lexical => match session.lexical() {
            Some(view) => print_json(&*view),
            None => bail!("lexical results could not be loaded"),
        },
        JobKind::Semantic => match session.semantic() {
            Some(view) => print_json(&*view),
            None => Ok(()),
        },
        JobKind::Sentiment => match session.sentiment() {
            Some(view) => print_json(&*view),
            None => Ok(()),
        },
    }
}
