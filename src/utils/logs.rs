use console::{measure_text_width, Style};

use crate::recommend::{MappingErrors, RecommendationResult};
use crate::vibe::VibeRecommendation;

pub const TREE_BRANCH: char = '\u{251C}';
pub const TREE_END: char = '\u{2514}';
pub const TREE_HORIZ: char = '\u{2500}';
pub const TREE_VERT: char = '\u{2502}';

const TREE_PREFIX_WIDTH: usize = 4;
const VALUE_COLUMN: usize = 25;

fn tree_branch() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_BRANCH, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_end() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_END, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_indent() -> String {
    dim().apply_to(format!("{}   ", TREE_VERT)).to_string()
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn blue() -> Style {
    Style::new().blue()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn init_prefix() -> String {
    blue().apply_to("[INIT]").to_string()
}

pub fn pad_label(label: &str, depth: usize) -> String {
    let prefix_width = depth * TREE_PREFIX_WIDTH;
    let target_width = VALUE_COLUMN.saturating_sub(prefix_width);
    let current_width = measure_text_width(label);
    if current_width < target_width {
        format!("{}{}", label, " ".repeat(target_width - current_width))
    } else {
        format!("{} ", label)
    }
}

fn percentage_style(percentage: u8) -> Style {
    if percentage >= 75 {
        green().bold()
    } else if percentage >= 40 {
        yellow().bold()
    } else {
        red().bold()
    }
}

pub fn log_init(catalog_source: &str, item_count: usize, top_n: usize) {
    println!(
        "{} loaded {} items from {}",
        init_prefix(),
        bold().apply_to(item_count),
        cyan().apply_to(catalog_source),
    );
    println!(
        "{} returning top {} matches",
        init_prefix(),
        bold().apply_to(top_n),
    );
}

pub fn print_mapping_errors(errors: &MappingErrors) {
    println!(
        "{} {} quiz answer(s) could not be mapped:",
        red().apply_to("[ERROR]"),
        bold().apply_to(errors.0.len())
    );
    let count = errors.0.len();
    for (i, error) in errors.0.iter().enumerate() {
        let branch = if i == count - 1 {
            tree_end()
        } else {
            tree_branch()
        };
        println!(
            "{}{} {}",
            branch,
            pad_label(error.dimension.key(), 1),
            red().apply_to(format!("{:?}", error.answer))
        );
    }
}

/// One ranked entry: name, percentage and the category tree.
pub fn print_recommendation(rank: usize, result: &RecommendationResult) {
    println!(
        "{} {} {}",
        dim().apply_to(format!("#{rank}")),
        bold().apply_to(&result.item.name),
        percentage_style(result.match_percentage)
            .apply_to(format!("{}% match", result.match_percentage)),
    );

    let count = result.match_details.len();
    if count == 0 {
        println!("{}{}", tree_end(), dim().apply_to("no scored categories"));
        println!();
        return;
    }

    for (i, detail) in result.match_details.iter().enumerate() {
        let branch = if i == count - 1 {
            tree_end()
        } else {
            tree_branch()
        };
        let score_style = if detail.score >= detail.max_score {
            green()
        } else if detail.score > 0.0 {
            yellow()
        } else {
            dim()
        };
        println!(
            "{}{} {} {}",
            branch,
            pad_label(&detail.category.to_string(), 1),
            score_style.apply_to(format!("{:.1}/{:.0}", detail.score, detail.max_score)),
            dim().apply_to(format!("({})", detail.details)),
        );
    }
    println!();
}

pub fn print_recommendations(results: &[RecommendationResult]) {
    println!(
        "{}\n",
        magenta().apply_to(bold().apply_to("[RECOMMENDATIONS]"))
    );
    for (i, result) in results.iter().enumerate() {
        print_recommendation(i + 1, result);
    }
}

/// The explain view: a single item with its full breakdown plus totals.
pub fn print_match_breakdown(result: &RecommendationResult) {
    println!(
        "{} {}",
        magenta().apply_to(bold().apply_to("[MATCH BREAKDOWN]")),
        bold().apply_to(&result.item.name),
    );
    println!();
    println!("{}", bold().apply_to("CATEGORIES"));

    let count = result.match_details.len();
    if count == 0 {
        println!(
            "{}{}",
            tree_end(),
            dim().apply_to("no preferences to score against")
        );
    }
    for (i, detail) in result.match_details.iter().enumerate() {
        let branch = if i == count - 1 {
            tree_end()
        } else {
            tree_branch()
        };
        println!("{}{}", branch, pad_label(&detail.category.to_string(), 1));
        println!(
            "{}{}{} {}",
            tree_indent(),
            tree_branch(),
            pad_label("score", 2),
            bold().apply_to(format!("{:.2}/{:.0}", detail.score, detail.max_score))
        );
        println!(
            "{}{}{} {}",
            tree_indent(),
            tree_end(),
            pad_label("details", 2),
            dim().apply_to(&detail.details)
        );
    }

    println!();
    println!("{}", bold().apply_to("RESULT"));
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("total", 1),
        bold().apply_to(format!("{:.2}", result.score))
    );
    println!(
        "{}{} {}",
        tree_end(),
        pad_label("match", 1),
        percentage_style(result.match_percentage).apply_to(format!("{}%", result.match_percentage))
    );
}

pub fn print_vibe_recommendations(query: &str, results: &[VibeRecommendation]) {
    println!(
        "{} \"{}\"\n",
        magenta().apply_to(bold().apply_to("[VIBE MATCH]")),
        dim().apply_to(query)
    );

    if results.is_empty() {
        println!("{}", yellow().apply_to("no matches came back"));
        return;
    }

    for (i, result) in results.iter().enumerate() {
        let clamped = result.score.round().clamp(0.0, 100.0) as u8;
        println!(
            "{} {} {}",
            dim().apply_to(format!("#{}", i + 1)),
            bold().apply_to(&result.item.name),
            percentage_style(clamped).apply_to(format!("{:.0}/100", result.score)),
        );
        println!("{}{}", tree_end(), dim().apply_to(&result.reasoning));
        println!();
    }
}

pub fn log_error(message: &str) {
    println!("{} {}", red().apply_to("[ERROR]"), message);
}
