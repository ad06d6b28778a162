use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::process;
use std::time::Duration;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vapor_match::catalog::{load_catalog, sample_catalog, CatalogItem};
use vapor_match::recommend::{map_answers_to_preferences, score_items};
use vapor_match::settings::settings;
use vapor_match::utils::{
    log_error, log_init, print_mapping_errors, print_recommendations, print_vibe_recommendations,
};
use vapor_match::vibe::{recommend_by_vibe, GeminiClient};

struct Args {
    answers_path: Option<String>,
    vibe_query: Option<String>,
    catalog_path: Option<String>,
    top_n: Option<usize>,
}

fn print_usage() {
    eprintln!("Usage: vapor-match <answers.ron> [--catalog <path>] [--top <n>]");
    eprintln!("       vapor-match --vibe <query> [--catalog <path>] [--top <n>]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <answers.ron>    RON map of quiz dimension -> answer");
    eprintln!("  --vibe <query>   Free-text query ranked by the LLM instead of the quiz");
    eprintln!("  --catalog <path> RON catalog file (defaults to the built-in sample)");
    eprintln!("  --top <n>        How many matches to print");
}

fn parse_args(raw: &[String]) -> Option<Args> {
    let mut args = Args {
        answers_path: None,
        vibe_query: None,
        catalog_path: None,
        top_n: None,
    };

    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--vibe" => args.vibe_query = Some(iter.next()?.clone()),
            "--catalog" => args.catalog_path = Some(iter.next()?.clone()),
            "--top" => args.top_n = iter.next()?.parse().ok(),
            _ if args.answers_path.is_none() => args.answers_path = Some(arg.clone()),
            _ => return None,
        }
    }

    if args.answers_path.is_some() == args.vibe_query.is_some() {
        return None;
    }
    Some(args)
}

fn load_items(catalog_path: Option<&str>) -> Result<(Vec<CatalogItem>, String)> {
    match catalog_path {
        Some(path) => {
            let items = load_catalog(Path::new(path))
                .with_context(|| format!("failed to load catalog from {path}"))?;
            Ok((items, path.to_string()))
        }
        None => Ok((sample_catalog(), "built-in sample catalog".to_string())),
    }
}

fn load_answers(path: &str) -> Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers from {path}"))?;
    ron::from_str(&content).with_context(|| format!("failed to parse answers from {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("vapor_match=info".parse()?))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        );
    set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Some(args) => args,
        None => {
            print_usage();
            process::exit(1);
        }
    };

    let s = settings();
    let top_n = args.top_n.unwrap_or(s.recommend.top_n);
    let catalog_path = args
        .catalog_path
        .as_deref()
        .or(s.recommend.catalog_path.as_deref());
    let (items, source) = load_items(catalog_path)?;

    log_init(&source, items.len(), top_n);
    println!();

    if let Some(query) = args.vibe_query {
        let client = GeminiClient::from_env(
            s.llm.model.clone(),
            Duration::from_secs(s.llm.timeout_secs),
        )?;
        match recommend_by_vibe(&client, &query, &items, top_n).await {
            Ok(results) => print_vibe_recommendations(&query, &results),
            Err(e) => {
                log_error(&e.to_string());
                process::exit(1);
            }
        }
        return Ok(());
    }

    let answers_path = args.answers_path.unwrap_or_default();
    let answers = load_answers(&answers_path)?;

    let preferences = match map_answers_to_preferences(&answers) {
        Ok(preferences) => preferences,
        Err(errors) => {
            print_mapping_errors(&errors);
            process::exit(1);
        }
    };

    let mut results = score_items(&preferences, &items);
    results.truncate(top_n);
    print_recommendations(&results);

    Ok(())
}
