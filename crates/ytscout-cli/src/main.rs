mod pipeline;
mod report;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use ytscout_core::{AppConfig, EngagementThresholds, SortKey};

use crate::pipeline::{ResearchOptions, Services};

#[derive(Debug, Parser)]
#[command(name = "ytscout")]
#[command(about = "Find high-engagement YouTube videos on a topic")]
struct Cli {
    /// Search topic (e.g. "Best SaaS Business")
    topic: Option<String>,

    /// Search topic (alternative to the positional argument)
    #[arg(long = "topic", short = 't', value_name = "TOPIC")]
    topic_flag: Option<String>,

    /// Days to look back [default: YTSCOUT_SEARCH_DAYS or 7]
    #[arg(long, short = 'd')]
    days: Option<u32>,

    /// Minimum view count [default: YTSCOUT_MIN_VIEWS or 1000]
    #[arg(long, short = 'v')]
    min_views: Option<u64>,

    /// Minimum like ratio in percent [default: 5.0]
    #[arg(long, short = 'l', value_name = "PERCENT")]
    min_likes: Option<f64>,

    /// Minimum comment ratio in percent [default: 0.2]
    #[arg(long, short = 'c', value_name = "PERCENT")]
    min_comments: Option<f64>,

    /// Metric used to order results (descending)
    #[arg(long, value_enum, default_value_t = SortArg::LikeRatio)]
    sort_by: SortArg,

    /// Skip language validation
    #[arg(long)]
    no_language_check: bool,

    /// Skip saving to Google Sheets
    #[arg(long)]
    no_sheets: bool,

    /// Save results to a JSON file
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Prompt for the topic
    #[arg(long, short = 'i')]
    interactive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    LikeRatio,
    CommentRatio,
    Views,
    Likes,
    Comments,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::LikeRatio => SortKey::LikeRatio,
            SortArg::CommentRatio => SortKey::CommentRatio,
            SortArg::Views => SortKey::Views,
            SortArg::Likes => SortKey::Likes,
            SortArg::Comments => SortKey::Comments,
        }
    }
}

impl Cli {
    /// Merge CLI flags over configured defaults. Percent flags become fractions.
    fn research_options(&self, config: &AppConfig, topic: String) -> ResearchOptions {
        let defaults = config.thresholds;
        ResearchOptions {
            topic,
            days_back: self.days.unwrap_or(config.search_days),
            max_results: config.max_results,
            thresholds: EngagementThresholds {
                min_like_ratio: self
                    .min_likes
                    .map_or(defaults.min_like_ratio, |p| p / 100.0),
                min_comment_ratio: self
                    .min_comments
                    .map_or(defaults.min_comment_ratio, |p| p / 100.0),
                min_views: self.min_views.unwrap_or(defaults.min_views),
            },
            sort_key: self.sort_by.into(),
            output: self.output.clone(),
        }
    }
}

/// Pick the topic from the arguments, or prompt for it.
///
/// Returns `None` when the prompt yields an empty line.
fn resolve_topic<R: BufRead, W: Write>(
    cli: &Cli,
    mut input: R,
    mut prompt: W,
) -> std::io::Result<Option<String>> {
    let given = cli.topic.clone().or_else(|| cli.topic_flag.clone());

    if let Some(topic) = given.filter(|_| !cli.interactive) {
        return Ok(Some(topic));
    }

    write!(prompt, "Enter search topic: ")?;
    prompt.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let topic = line.trim();
    Ok((!topic.is_empty()).then(|| topic.to_string()))
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = ytscout_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let stdin = std::io::stdin();
    let Some(topic) = resolve_topic(&cli, stdin.lock(), std::io::stdout())? else {
        eprintln!("Error: Topic is required");
        return Ok(ExitCode::FAILURE);
    };

    let options = cli.research_options(&config, topic);
    let services = Services::from_config(&config, !cli.no_language_check, !cli.no_sheets)?;

    let videos = pipeline::run_research(&services, &options).await?;
    print!("{}", report::render_summary(&videos));

    Ok(if videos.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod tests;
