use anyhow::Result;
use clap::Parser;
use sitegrade::{
    AnalysisReport, app_state::build_analyzer, config::Config, extractor::language,
    extractor::schema,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Analyze one web page for on-page SEO signals.
#[derive(Debug, Parser)]
#[command(name = "sitegrade", version, about)]
struct Cli {
    /// Page to analyze; https:// is assumed when no scheme is given
    url: String,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Skip the DNS existence check
    #[arg(long)]
    skip_dns: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let analyzer = build_analyzer(&config, !cli.skip_dns)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let report = analyzer.analyze(&cli.url, &cancel).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let s = &report.signals;
    let score = &report.score;

    println!("{}", s.url);
    println!("  loaded in {} ms, {} words", s.load_time_ms, s.word_count);
    if let Some(detected) = &s.detected_language {
        let note = if s.language.is_empty() {
            " (no lang declared)"
        } else if language::declared_matches(&s.language, detected) {
            ""
        } else {
            " (differs from declared lang)"
        };
        println!("  language: {detected}{note}");
    }
    let types = schema::schema_types(&s.schemas);
    if !types.is_empty() {
        println!("  structured data: {}", types.join(", "));
    }

    println!();
    println!("Score: {}/100", score.total);
    println!("  on-page   {:>2}/40", score.on_page);
    println!("  technical {:>2}/30", score.technical);
    println!("  content   {:>2}/20", score.content);
    println!("  links     {:>2}/10", score.links);

    let summary = report.summary();
    println!();
    println!(
        "Recommendations: {} ({} high, {} medium, {} low)",
        summary.total(),
        summary.high,
        summary.medium,
        summary.low
    );
    for (i, rec) in report.recommendations.iter().enumerate() {
        println!(
            "  {}. [{}] {} ({})",
            i + 1,
            rec.priority,
            rec.title,
            rec.estimated_time_range
        );
        if let Some(impact) = rec.score_impact {
            println!(
                "     +{} points, projected total {}",
                impact.points, impact.projected_total
            );
        }
    }
}
