use anyhow::Context;
use cinematch::{
    load_dataset, BenchmarkReport, Catalog, ItemId, Recommendation, RecommendConfig, Recommender,
    TitleMatch, TitleResolver, TitleSuggestion,
};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Movie recommendations from a ratings catalog
#[derive(Parser, Debug)]
#[command(name = "cinematch")]
#[command(about = "Movie recommendations from a ratings catalog", long_about = None)]
struct Args {
    /// Movies CSV (movieId,title,genres)
    #[arg(long, default_value = "data/movies.csv")]
    movies: PathBuf,

    /// Ratings CSV (userId,movieId,rating,timestamp)
    #[arg(long, default_value = "data/ratings.csv")]
    ratings: PathBuf,

    /// JSON file with recommendation settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Neighbourhood size for collaborative filtering
    #[arg(long)]
    neighbors: Option<usize>,

    /// Number of recommendations per strategy
    #[arg(long)]
    limit: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend movies for a title
    Recommend {
        title: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Time a single index lookup
    Lookup { id: ItemId },
    /// Time collaborative queries for random movies
    Bench {
        #[arg(long, default_value_t = 100)]
        queries: usize,

        /// Seed for picking the movies
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Catalog size and memory estimate
    Stats,
    /// Numbered menu on stdin
    Interactive,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting cinematch v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let limit = args.limit.unwrap_or(config.default_limit);

    let started = Instant::now();
    let (catalog, report) = load_dataset(&args.movies, &args.ratings).with_context(|| {
        format!(
            "loading {} and {}",
            args.movies.display(),
            args.ratings.display()
        )
    })?;
    info!(
        movies = report.movies,
        ratings = report.ratings,
        users = report.users,
        orphans = report.orphan_ratings,
        elapsed = ?started.elapsed(),
        "Catalog ready"
    );

    match args.command.unwrap_or(Command::Interactive) {
        Command::Recommend { title, json } => recommend(&catalog, &config, &title, limit, json)?,
        Command::Lookup { id } => lookup(&catalog, id),
        Command::Bench { queries, seed } => bench(&catalog, &config, queries, limit, seed),
        Command::Stats => print_stats(&catalog),
        Command::Interactive => interactive(&catalog, &config, limit)?,
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<RecommendConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => RecommendConfig::default(),
    };
    if let Some(neighbors) = args.neighbors {
        config.neighbor_count = neighbors;
    }
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<RecommendConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn recommend(
    catalog: &Catalog,
    config: &RecommendConfig,
    title: &str,
    limit: usize,
    as_json: bool,
) -> anyhow::Result<()> {
    let resolver = TitleResolver::new(catalog, config);
    let id = match resolver.lookup(title) {
        TitleMatch::Exact(id) => id,
        TitleMatch::Suggestions(suggestions) => {
            if as_json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "query": title,
                        "found": false,
                        "suggestions": suggestions,
                    }))?
                );
            } else {
                print_suggestions(title, &suggestions);
            }
            return Ok(());
        }
    };

    let recommender = Recommender::new(catalog, config.clone());

    let started = Instant::now();
    let collaborative = recommender.collaborative(id, limit);
    let collaborative_time = started.elapsed();

    let started = Instant::now();
    let content = recommender.content(id, limit);
    let content_time = started.elapsed();

    if as_json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "query": title,
                "found": true,
                "item_id": id,
                "collaborative": collaborative,
                "collaborative_ms": millis(collaborative_time),
                "content": content,
                "content_ms": millis(content_time),
            }))?
        );
        return Ok(());
    }

    println!("\nRecommendations for \"{}\"", title);
    print_recommendations("Based on user ratings", &collaborative, collaborative_time);
    print_recommendations("Based on genres", &content, content_time);
    Ok(())
}

fn print_recommendations(heading: &str, recommendations: &[Recommendation], elapsed: Duration) {
    println!("\n{} ({:.3} ms):", heading, millis(elapsed));
    if recommendations.is_empty() {
        println!("  (none)");
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!("  {}. {} [{:.2}]", rank + 1, rec.item.title, rec.score);
    }
}

fn print_suggestions(query: &str, suggestions: &[TitleSuggestion]) {
    println!("\nMovie \"{}\" not found.", query);
    if suggestions.is_empty() {
        return;
    }
    println!("Did you mean:");
    for suggestion in suggestions {
        println!("  - {} ({:.0}% match)", suggestion.title, suggestion.similarity * 100.0);
    }
}

fn lookup(catalog: &Catalog, id: ItemId) {
    let started = Instant::now();
    let found = catalog.index().search(id);
    let elapsed = started.elapsed();

    match found {
        Some(item) => println!("Found: {} [{}]", item.title, item.genres.join("|")),
        None => println!("Movie {} not found", id),
    }
    println!("Lookup time: {} ns", elapsed.as_nanos());
}

fn bench(catalog: &Catalog, config: &RecommendConfig, queries: usize, limit: usize, seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let ids = catalog.random_item_ids(queries, &mut rng);

    let report = Recommender::new(catalog, config.clone()).benchmark(&ids, limit);
    print_benchmark(&report);
    print_stats(catalog);
}

fn print_benchmark(report: &BenchmarkReport) {
    println!("\nPerformance Analysis");
    println!("  Queries:          {}", report.queries);
    println!("  Average time:     {:.3} ms", millis(report.average));
    println!("  Fastest:          {:.3} ms", millis(report.min));
    println!("  Slowest:          {:.3} ms", millis(report.max));
    println!("  Total:            {:.3} ms", millis(report.total));
}

fn print_stats(catalog: &Catalog) {
    let stats = catalog.stats();
    println!("\nCatalog");
    println!("  Movies:           {}", stats.items);
    println!("  Users:            {}", stats.users);
    println!("  Ratings (user):   {}", stats.user_ratings);
    println!("  Ratings (item):   {}", stats.item_ratings);
    println!(
        "  Rating memory:    {:.2} MB",
        stats.approx_rating_bytes as f64 / (1024.0 * 1024.0)
    );
}

fn interactive(catalog: &Catalog, config: &RecommendConfig, limit: usize) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        println!("\n1. Get movie recommendations");
        println!("2. Run performance analysis");
        println!("3. Test tree lookup");
        println!("4. Exit");
        let Some(choice) = prompt(&mut input, "Choice: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(title) = prompt(&mut input, "Enter movie title: ")? else {
                    break;
                };
                recommend(catalog, config, &title, limit, false)?;
            }
            "2" => bench(catalog, config, 100, limit, None),
            "3" => {
                let Some(raw) = prompt(&mut input, "Enter movie ID: ")? else {
                    break;
                };
                match raw.parse::<ItemId>() {
                    Ok(id) => lookup(catalog, id),
                    Err(_) => println!("Not a movie id: {}", raw),
                }
            }
            "4" => break,
            other => println!("Unknown choice: {}", other),
        }
    }

    Ok(())
}

/// `None` at end of input
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
