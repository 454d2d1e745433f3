use anyhow::Context;

use persona_insight::analysis::{AnalysisMode, AnalysisOutcome, AnalysisSession, Credentials, Submission, TraitReport};
use persona_insight::config::AnalysisConfig;

const USAGE: &str = "usage: persona-insight <twitter-profile-url> [tweet-count] [--realtime]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut realtime = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--realtime" => realtime = true,
            "-h" | "--help" => {
                eprintln!("{USAGE}");
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let Some(profile) = positional.first().cloned() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let count: i64 = match positional.get(1) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("tweet count must be an integer, got {raw:?}"))?,
        None => 10,
    };

    let config = AnalysisConfig::from_env()?;
    let credentials = Credentials::from_env().context("credentials are read from the environment")?;

    eprintln!("🔎 Persona Insight v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Endpoint: {}", config.endpoint);
    eprintln!("   Deadline: {}ms", config.deadline.as_millis());

    let session = AnalysisSession::with_http(&config);
    let mut submission = Submission::new(profile, count);
    if realtime {
        submission = submission.with_mode(AnalysisMode::Realtime);
    }

    match session.submit(submission, &credentials).await {
        Ok(AnalysisOutcome::Success(report)) => print_report(&report),
        Ok(outcome) => {
            eprintln!("Error: {}", outcome.user_message().unwrap_or_default());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_report(report: &TraitReport) {
    match &report.profile_username {
        Some(username) => println!("Profile: @{username}"),
        None => println!("Profile analysis"),
    }
    println!("Tweets analyzed: {}", report.tweets_analyzed);
    println!("Analyzed at: {}", report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    for (t, score) in report.trait_averages.iter() {
        println!("  {:<18} {:>5.1}%", t.label(), score * 100.0);
    }

    let mut current: Option<&str> = None;
    for item in &report.insights {
        if current != Some(item.category.as_str()) {
            println!("\n{}:", item.category_label());
            current = Some(item.category.as_str());
        }
        println!("  • {}", item.text);
    }
}
