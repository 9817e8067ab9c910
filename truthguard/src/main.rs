use anyhow::{bail, Context};
use std::io::Read;
use truthguard::config::ProviderConfiguration;
use truthguard::db::{HistoryEngine, HistoryStore};
use truthguard::knowledge::KnowledgeBase;
use truthguard::models::{
    AiJudgment, FactCheckPayload, HistoryEntry, SignalKind, SourceMatchPayload, Verdict,
};
use truthguard::pipeline::{Aggregator, Analyzer, LiveAnalyzer, UnavailableProvider};
use truthguard::telemetry::init_tracing;

const USAGE: &str = "usage: truthguard [--offline] [--no-history] [--url <source-url>] [<content> | -]
       truthguard --schema";

#[derive(Debug, Default)]
struct Args {
    offline: bool,
    no_history: bool,
    schema: bool,
    source_url: Option<String>,
    content: Option<String>,
}

fn parse_args(raw: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut words: Vec<String> = Vec::new();
    let mut raw = raw.peekable();
    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--offline" => args.offline = true,
            "--no-history" => args.no_history = true,
            "--schema" => args.schema = true,
            "--url" => {
                let url = raw.next().context("--url needs a value")?;
                args.source_url = Some(url);
            }
            "-h" | "--help" => bail!("{USAGE}"),
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ => words.push(arg),
        }
    }
    if !words.is_empty() {
        args.content = Some(words.join(" "));
    }
    Ok(args)
}

fn read_content(args: &Args) -> anyhow::Result<String> {
    match args.content.as_deref() {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(text) => Ok(text.to_string()),
    }
}

async fn run_analysis(
    config: &ProviderConfiguration,
    offline: bool,
    content: &str,
    source_url: Option<&str>,
) -> anyhow::Result<Verdict> {
    if offline {
        let mut knowledge = KnowledgeBase::builtin();
        if let Some(path) = &config.knowledge_base_path {
            knowledge.extend(KnowledgeBase::from_path(path)?);
        }
        let analyzer = Analyzer::new(
            UnavailableProvider::<AiJudgment>::new(SignalKind::AiJudgment),
            UnavailableProvider::<FactCheckPayload>::new(SignalKind::FactCheck),
            UnavailableProvider::<SourceMatchPayload>::new(SignalKind::SourceMatch),
            knowledge,
            Aggregator::new(config.aggregator.clone()),
        );
        return Ok(analyzer.analyze(content, source_url).await);
    }
    let analyzer = LiveAnalyzer::from_config(config)?;
    Ok(analyzer.analyze(content, source_url).await)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = parse_args(std::env::args().skip(1))?;

    if args.schema {
        let schema = schemars::schema_for!(Verdict);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    let config = ProviderConfiguration::from_env()?;
    let content = read_content(&args)?;
    let source_url = args.source_url.as_deref().map(str::trim).filter(|u| !u.is_empty());
    if content.trim().is_empty() && source_url.is_none() {
        bail!("content is required\n{USAGE}");
    }

    let verdict = run_analysis(&config, args.offline, &content, source_url).await?;

    if !args.no_history {
        let engine = HistoryEngine::open(&config.history_path)?;
        let op = engine
            .append(HistoryEntry::new(&content, source_url, verdict.clone()))
            .await?;
        tracing::info!(
            entry_id = %op.entry_id,
            path = %engine.path().display(),
            "verdict recorded"
        );
    }

    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}
