use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use semfield::catalog::{Category, Language};
use semfield::config::Config;
use semfield::embedding::{download, CachingEmbedder, Embedder, SentenceEmbedder};
use semfield::output::terminal;
use semfield::pairs::ExamplePair;
use semfield::SemanticAnalyzer;

/// semfield: compare words and phrases across languages.
///
/// Classifies text into a semantic category, ranks that category's
/// vocabulary by similarity, and scores two texts against each other.
#[derive(Parser)]
#[command(name = "semfield", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the multilingual embedding model (~470 MB)
    DownloadModel,

    /// Resolve the semantic category of a text
    Classify {
        /// The text to classify
        text: String,
    },

    /// Rank a category's vocabulary by similarity to a text
    Field {
        /// The text to analyze
        text: String,

        /// Vocabulary language (name or ISO code)
        #[arg(long, default_value = "English")]
        lang: Language,

        /// Category to rank (default: classify the text first)
        #[arg(long)]
        category: Option<Category>,
    },

    /// Compare two texts, possibly in different languages
    Compare {
        /// First text
        #[arg(required_unless_present = "example")]
        text_a: Option<String>,

        /// Second text
        #[arg(required_unless_present = "example")]
        text_b: Option<String>,

        /// Language of the first text
        #[arg(long, default_value = "English")]
        lang_a: Language,

        /// Language of the second text
        #[arg(long, default_value = "Chinese")]
        lang_b: Language,

        /// Use a preset pair instead of texts (gender, family, person)
        #[arg(long, conflicts_with_all = ["text_a", "text_b"])]
        example: Option<ExamplePair>,
    },

    /// List categories, probe phrases and vocabularies
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("semfield=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::DownloadModel => {
            println!("Downloading embedding model...");
            println!("  Destination: {}", config.model_dir.display());

            download::download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `semfield compare man 男人`.");
        }

        Commands::Classify { text } => {
            let analyzer = build_analyzer(&config)?;
            let scores = analyzer.category_scores(&text).await?;
            let winner = semfield::analysis::classifier::best_category(&scores);
            terminal::display_classification(&text, &scores, winner);
        }

        Commands::Field {
            text,
            lang,
            category,
        } => {
            let analyzer = build_analyzer(&config)?;
            let field = match category {
                Some(category) => analyzer.rank_field(&text, category, lang).await?,
                None => analyzer.analyze_field(&text, lang).await?,
            };
            terminal::display_field(&field);
        }

        Commands::Compare {
            text_a,
            text_b,
            lang_a,
            lang_b,
            example,
        } => {
            let (text_a, text_b) = match example {
                Some(pair) => {
                    info!(example = pair.name, "Using preset example pair");
                    (pair.word(lang_a).to_string(), pair.word(lang_b).to_string())
                }
                None => (
                    text_a.context("First text is required")?,
                    text_b.context("Second text is required")?,
                ),
            };

            let analyzer = build_analyzer(&config)?;
            println!("Analyzing semantic relationship...");
            let result = analyzer.compare(&text_a, lang_a, &text_b, lang_b).await?;
            terminal::display_comparison(&text_a, &text_b, &result);
        }

        Commands::Catalog => {
            let catalog = config.load_catalog()?;
            terminal::display_catalog(&catalog);
        }
    }

    Ok(())
}

/// Load the catalog and the local embedding model, memoizing embeddings
/// unless disabled.
fn build_analyzer(config: &Config) -> Result<SemanticAnalyzer> {
    config.require_model()?;
    let catalog = config.load_catalog()?;

    let model_dir = download::embedding_model_dir(&config.model_dir);
    let model = SentenceEmbedder::load(&model_dir)?;
    info!("Loaded sentence embedding model");

    let embedder: Arc<dyn Embedder> = if config.cache_embeddings {
        Arc::new(CachingEmbedder::new(model))
    } else {
        Arc::new(model)
    };

    Ok(SemanticAnalyzer::new(catalog, embedder).with_concurrency(config.concurrency))
}
