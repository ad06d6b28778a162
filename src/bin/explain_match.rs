use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::process;
use vapor_match::catalog::{load_catalog, sample_catalog, CatalogItem};
use vapor_match::recommend::{map_answers_to_preferences, score_items};
use vapor_match::utils::{log_error, print_mapping_errors, print_match_breakdown};

fn print_usage() {
    eprintln!("Usage: explain-match <answers.ron> <item name> [--catalog <path>]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <answers.ron>    RON map of quiz dimension -> answer");
    eprintln!("  <item name>      Catalog item to explain, matched case-insensitively");
    eprintln!("  --catalog <path> RON catalog file (defaults to the built-in sample)");
}

fn find_item<'a>(items: &'a [CatalogItem], name: &str) -> Option<&'a CatalogItem> {
    items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut catalog_path: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--catalog" {
            match iter.next() {
                Some(path) => catalog_path = Some(path.clone()),
                None => {
                    print_usage();
                    process::exit(1);
                }
            }
        } else {
            positional.push(arg.clone());
        }
    }

    if positional.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let answers_path = &positional[0];
    let item_name = positional[1..].join(" ");

    let items = match catalog_path {
        Some(ref path) => match load_catalog(Path::new(path)) {
            Ok(items) => items,
            Err(e) => {
                log_error(&format!("failed to load catalog from {path}: {e}"));
                process::exit(1);
            }
        },
        None => sample_catalog(),
    };

    let item = match find_item(&items, &item_name) {
        Some(item) => item.clone(),
        None => {
            let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
            log_error(&format!(
                "no item named {item_name:?}; catalog has: {}",
                names.join(", ")
            ));
            process::exit(1);
        }
    };

    let answers: HashMap<String, String> = match std::fs::read_to_string(answers_path)
        .map_err(|e| e.to_string())
        .and_then(|content| ron::from_str(&content).map_err(|e| e.to_string()))
    {
        Ok(answers) => answers,
        Err(e) => {
            log_error(&format!("failed to load answers from {answers_path}: {e}"));
            process::exit(1);
        }
    };

    let preferences = match map_answers_to_preferences(&answers) {
        Ok(preferences) => preferences,
        Err(errors) => {
            print_mapping_errors(&errors);
            process::exit(1);
        }
    };

    let results = score_items(&preferences, std::slice::from_ref(&item));
    if let Some(result) = results.first() {
        print_match_breakdown(result);
    }
}
