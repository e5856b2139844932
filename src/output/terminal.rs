// Colored terminal output for classifications, semantic fields and
// comparisons. main.rs delegates all display here.

use colored::Colorize;

use crate::analysis::{CategoryScore, ComparisonResult, SemanticField};
use crate::catalog::{Catalog, Category, Language};
use crate::similarity::{similarity_stars, MatchLevel};

/// Number of field entries shown per text.
const FIELD_PREVIEW: usize = 5;

/// Display per-category probe scores with the winner highlighted.
pub fn display_classification(text: &str, scores: &[CategoryScore], winner: Category) {
    println!(
        "\n{}",
        format!("=== Category for \"{}\" ===", super::truncate_chars(text, 60)).bold()
    );
    for score in scores {
        let label = format!("{:<8}", score.category.as_str());
        let label = if score.category == winner {
            label.green().bold()
        } else {
            label.normal()
        };
        println!("  {} {:>6.3}  {}", label, score.score, similarity_stars(score.score).dimmed());
    }
    println!("\n  Resolved category: {}", winner.as_str().bold());
}

/// Display a single ranked semantic field.
pub fn display_field(field: &SemanticField) {
    println!(
        "\n{}",
        format!(
            "=== {} semantic field ({}, {} terms) ===",
            field.language,
            field.category,
            field.len()
        )
        .bold()
    );
    for (i, (term, score)) in field.iter().enumerate() {
        println!(
            "  {:>2}. {:<24} {:>6.3}  {}",
            i + 1,
            term,
            score,
            similarity_stars(score).dimmed()
        );
    }
}

/// Display a full comparison: score, match level, top terms and paired rows.
pub fn display_comparison(text_a: &str, text_b: &str, result: &ComparisonResult) {
    let level = result.match_level();

    println!(
        "\n{}",
        format!(
            "=== \"{}\" ({}) vs \"{}\" ({}) ===",
            super::truncate_chars(text_a, 40),
            result.field_a.language,
            super::truncate_chars(text_b, 40),
            result.field_b.language,
        )
        .bold()
    );
    println!();
    println!("  Similarity score: {:.2}", result.score);
    println!("  Match level:      {}", similarity_stars(result.score));
    println!("  Verdict:          {}", colorize_level(level));
    println!("  {}", level.interpretation().dimmed());

    println!("\n{}", "Semantic field analysis".bold());
    display_field_preview(&result.field_a);
    display_field_preview(&result.field_b);

    if !result.same_category() {
        println!(
            "\n  {} texts resolved to different categories ({} vs {}); rows below are not aligned concepts",
            "~".yellow(),
            result.field_a.category,
            result.field_b.category,
        );
    }

    println!("\n{}", "Side by side".bold());
    println!(
        "  {:<28} {:>6}  {:>6}",
        "Terms".dimmed(),
        result.field_a.language.name().dimmed(),
        result.field_b.language.name().dimmed(),
    );
    println!("  {}", "-".repeat(44).dimmed());
    for ((term_a, score_a), (term_b, score_b)) in result.field_a.paired_with(&result.field_b) {
        let label = format!("{term_a}/{term_b}");
        println!(
            "  {:<28} {:>6.2}  {:>6.2}",
            super::truncate_chars(&label, 28),
            score_a,
            score_b
        );
    }
    println!();
}

fn display_field_preview(field: &SemanticField) {
    println!("\n  {} ({}):", field.language.name().bold(), field.category);
    for (term, score) in field.top(FIELD_PREVIEW) {
        println!("    - {:<22} {:.2} {}", term, score, similarity_stars(*score).dimmed());
    }
}

/// Display the configured categories, probes and vocabulary sizes.
pub fn display_catalog(catalog: &Catalog) {
    println!("\n{}", "=== Catalog ===".bold());
    for category in Category::ALL {
        println!(
            "\n  {} (probe: \"{}\")",
            category.as_str().bold(),
            catalog.probe(category)
        );
        for language in Language::ALL {
            match catalog.vocabulary(category, language) {
                Ok(terms) => println!(
                    "    {:<9} {} terms: {}",
                    language.name(),
                    terms.len(),
                    terms.join(", ").dimmed()
                ),
                Err(_) => println!("    {:<9} {}", language.name(), "(none)".dimmed()),
            }
        }
    }
    println!();
}

/// Colorize a match level.
fn colorize_level(level: MatchLevel) -> colored::ColoredString {
    let label = level.to_string();
    match level {
        MatchLevel::Strong => label.green().bold(),
        MatchLevel::Good => label.green(),
        MatchLevel::Partial => label.yellow(),
        MatchLevel::Weak => label.red(),
    }
}
