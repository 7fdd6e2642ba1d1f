use catalog_images::{catalog, check, config, normalize_local_path, output};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog location shared by commands that read products.
#[derive(clap::Args, Clone)]
struct CatalogArgs {
    /// Catalog JSON file, or a directory of catalog JSON files
    #[arg(long, default_value = "catalog.json")]
    catalog: PathBuf,
}

#[derive(Parser)]
#[command(name = "catalog-images")]
#[command(about = "Resolve display images for product catalogs")]
#[command(long_about = "\
Resolve display images for product catalogs

Every product resolves to exactly one display string. The first non-empty
candidate wins:

  1. localPath of the first image flagged isPrimary   (normalized)
  2. localPath of the first image                     (normalized)
  3. primaryImageUrl                                  (verbatim)
  4. url of the first image                           (verbatim)
  5. placeholder                                      (default /images/placeholder.svg)

Local paths lose a leading 'public/' and gain a leading '/':
  public/products/desk.jpg  ->  /products/desk.jpg

Catalogs are JSON: an array of products or {\"products\": [...]}.

Run 'catalog-images gen-config' to generate a documented catalog-images.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./catalog-images.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Placeholder override, takes precedence over the config file
    #[arg(long, global = true)]
    placeholder: Option<String>,

    /// Log config and catalog loading to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a stored local path into a web-root path
    Normalize {
        /// Path as stored in the catalog, e.g. public/products/desk.jpg
        path: String,
    },
    /// Show the resolved image and its source for every product
    Resolve(CatalogArgs),
    /// Write the catalog back out with imageSrc and imageSource added
    Enrich {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report catalog rows that resolve unexpectedly
    Check(CatalogArgs),
    /// Print a stock catalog-images.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Normalize { ref path } => {
            let normalized = normalize_local_path(Some(path.as_str()));
            output::print_normalize_output(normalized.as_deref());
        }
        Command::Resolve(ref args) => {
            let settings = load_settings(cli.config.as_deref())?;
            init_thread_pool(&settings.processing);
            let placeholder = effective_placeholder(&cli, &settings);
            let products = catalog::load_catalog(&args.catalog)?;
            let enriched = catalog::enrich(&products, placeholder);
            output::print_resolve_output(&enriched);
        }
        Command::Enrich {
            catalog: ref args,
            output: ref output_path,
        } => {
            let settings = load_settings(cli.config.as_deref())?;
            init_thread_pool(&settings.processing);
            let placeholder = effective_placeholder(&cli, &settings);
            let products = catalog::load_catalog(&args.catalog)?;
            let enriched = catalog::enrich(&products, placeholder);
            let json = serde_json::to_string_pretty(&enriched)?;
            match output_path {
                Some(path) => {
                    std::fs::write(path, json)?;
                    let noun = if enriched.len() == 1 { "product" } else { "products" };
                    println!("Enriched {} {} → {}", enriched.len(), noun, path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Check(ref args) => {
            let products = catalog::load_catalog(&args.catalog)?;
            let issues = check::check_catalog(&products);
            output::print_check_output(&products, &issues);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr so `enrich` output on stdout stays valid JSON.
///
/// `RUST_LOG` wins when set; otherwise `-v` enables this crate's debug events.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "catalog_images=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<config::ResolverConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn effective_placeholder<'a>(cli: &'a Cli, settings: &'a config::ResolverConfig) -> &'a str {
    cli.placeholder
        .as_deref()
        .unwrap_or(&settings.images.placeholder)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; config can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    rayon::ThreadPoolBuilder::new()
        .num_threads(processing.worker_count())
        .build_global()
        .ok();
}
