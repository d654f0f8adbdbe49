use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use archsim_core::config::EmbeddingConfig;
use archsim_core::corpus::sweep_output_path;
use archsim_core::graph::BuildMode;
use archsim_core::semantic::{CachedEmbedder, FastEmbedder, NameNormalizer, StaticEmbedder};
use archsim_core::{
    CompareMode, Config, Corpus, CorpusScheduler, Embedder, GraphBuilder, InstanceDocument,
    SemanticScorer, SimilarityEngine,
};

#[derive(Parser)]
#[command(name = "archsim")]
#[command(about = "Pairwise similarity matrices for architecture instance models", long_about = None)]
struct Cli {
    /// Config file (defaults to ./archsim.toml, then the user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score two instance documents
    Compare {
        first: PathBuf,
        second: PathBuf,

        /// Override the configured compare mode (max, min, average)
        #[arg(long)]
        mode: Option<CompareMode>,

        /// Print the scores as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score every pair of documents in a directory and write the CSV matrices
    Corpus {
        /// Directory of JSON documents (defaults to paths.json_dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Sweep the weight split from 0.0 to 1.0 and write one combined matrix per step
        #[arg(long)]
        sweep: bool,

        /// Worker threads (defaults to scheduler.threads, then all cores)
        #[arg(short, long)]
        threads: Option<usize>,
    },
    /// Show the graph built from one document
    Inspect {
        file: PathBuf,

        /// Resolve connections to owning components instead of features
        #[arg(long)]
        component: bool,
    },
    /// Print the default configuration
    Config,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .wrap_err_with(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Compare {
            first,
            second,
            mode,
            json,
        } => {
            if let Some(mode) = mode {
                config.similarity.compare_mode = mode;
            }
            config.validate()?;
            compare(&config, &first, &second, json)
        }
        Commands::Corpus {
            dir,
            sweep,
            threads,
        } => {
            if sweep {
                config.similarity.test = true;
            }
            if let Some(threads) = threads {
                config.scheduler.threads = Some(threads);
            }
            config.validate()?;
            let dir = dir.unwrap_or_else(|| config.paths.json_path());
            corpus(&config, &dir)
        }
        Commands::Inspect { file, component } => inspect(&file, component),
        Commands::Config => {
            print!("{}", Config::default_config_string());
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_embedder(config: &EmbeddingConfig) -> color_eyre::Result<Arc<dyn Embedder>> {
    if let Some(path) = &config.vectors_file {
        let table = StaticEmbedder::from_vec_file(path)
            .wrap_err_with(|| format!("failed to load word vectors from {}", path))?;
        info!(path = %path, words = table.len(), dimension = table.dimension(), "word vectors loaded");
        return Ok(Arc::new(CachedEmbedder::new(table)));
    }

    let model = FastEmbedder::model_from_name(&config.model)?;
    let cache_dir = config
        .cache_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(FastEmbedder::default_cache_dir);
    let embedder = FastEmbedder::with_model_and_cache(model, cache_dir)?;
    info!(model = embedder.model_name(), dimension = embedder.dimension(), "embedding model loaded");
    Ok(Arc::new(CachedEmbedder::new(embedder)))
}

fn build_engine(config: &Config) -> color_eyre::Result<SimilarityEngine> {
    let embedder = load_embedder(&config.embedding)?;
    let scorer = SemanticScorer::new(embedder)
        .with_normalizer(NameNormalizer::new(&config.embedding.stop_words));
    Ok(SimilarityEngine::new(scorer, config.similarity.compare_mode))
}

fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn compare(config: &Config, first: &Path, second: &Path, json: bool) -> color_eyre::Result<()> {
    let doc1 = InstanceDocument::from_file(first)?;
    let doc2 = InstanceDocument::from_file(second)?;
    let engine = build_engine(config)?;

    let weights = config.similarity.weights();
    let scores = engine.score(&doc1, &doc2, &file_id(first), &file_id(second), weights)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
    } else {
        println!("Compare mode:          {}", engine.compare_mode());
        println!("Structural similarity: {:.4}", scores.structural);
        println!(
            "Semantic similarity:   {:.4} (normalized {:.4})",
            scores.semantic,
            scores.semantic_normalized()
        );
        println!(
            "Combined similarity:   {:.4} (w_struct {}, w_semantic {})",
            scores.combined, weights.structural, weights.semantic
        );
    }
    Ok(())
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} pairs")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb
}

fn corpus(config: &Config, dir: &Path) -> color_eyre::Result<()> {
    let corpus = Corpus::load_dir(dir)?;
    if corpus.is_empty() {
        warn!(dir = %dir.display(), "no documents found");
    }
    info!(dir = %dir.display(), models = corpus.len(), pairs = corpus.pair_count(), "corpus loaded");

    let mut scheduler = CorpusScheduler::new(build_engine(config)?);
    if let Some(threads) = config.scheduler.threads {
        scheduler = scheduler.with_threads(threads);
    }

    let pb = progress_bar(corpus.pair_count());
    let on_pair = || pb.inc(1);

    if config.similarity.test {
        let matrices = scheduler.sweep_with_progress(&corpus, &on_pair)?;
        pb.finish_and_clear();
        for (weights, matrix) in matrices {
            let path = sweep_output_path(&config.paths.combined_csv, weights);
            matrix.write_csv(&path)?;
            println!("{}", path.display());
        }
    } else {
        let result = scheduler.run_with_progress(&corpus, config.similarity.weights(), &on_pair)?;
        pb.finish_and_clear();

        result.structural.write_csv(&config.paths.structural_csv)?;
        result.semantic.write_csv(&config.paths.semantic_csv)?;
        result.combined.write_csv(&config.paths.combined_csv)?;
        println!("{}", config.paths.structural_csv);
        println!("{}", config.paths.semantic_csv);
        println!("{}", config.paths.combined_csv);

        if !result.failed.is_empty() {
            warn!(failed = result.failed.len(), "some comparisons failed and were left at 0");
        }
    }
    Ok(())
}

fn inspect(file: &Path, component: bool) -> color_eyre::Result<()> {
    let mode = if component {
        BuildMode::Component
    } else {
        BuildMode::Complete
    };
    let document = InstanceDocument::from_file(file)?;
    let (model, report) = GraphBuilder::new(mode).build_with_report(&document)?;
    let root = model.root().ok_or_else(|| eyre!("model has no root"))?;

    println!("Model: {}", model.name());
    if let Some(node) = model.node(root) {
        println!("Root:  {} [{}]", node.name(), node.category());
    }
    println!("Nodes: {}", model.node_count());
    println!("Edges: {}", model.edge_count());

    println!();
    println!("Categories:");
    for (category, count) in model.category_histogram() {
        println!("  {:<20} {}", category.as_str(), count);
    }

    println!();
    println!("Connections:");
    for (connection_type, count) in model.connection_histogram() {
        println!("  {:<20} {}", connection_type.to_string(), count);
    }

    if !report.unresolved.is_empty() {
        println!();
        println!("Unresolved connections:");
        for c in &report.unresolved {
            println!("  {} -> {}", c.source, c.destination);
        }
    }
    Ok(())
}
