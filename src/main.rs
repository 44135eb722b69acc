use clap::{Parser, Subcommand};
use media_manifest::category::Category;
use media_manifest::config::{self, ManifestConfig};
use media_manifest::emit::{self, ArtifactFormat};
use media_manifest::imaging::RustBackend;
use media_manifest::scan::{self, ScanSettings};
use media_manifest::{output, server};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn version_string() -> &'static str {
    if env!("ON_RELEASE_TAG") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    match env!("GIT_HASH") {
        "" => "dev@unknown",
        hash => Box::leak(format!("dev@{hash}").into_boxed_str()),
    }
}

#[derive(Parser)]
#[command(name = "media-manifest")]
#[command(about = "Per-project media manifests for a portfolio front end")]
#[command(long_about = "\
Per-project media manifests for a portfolio front end

Each subdirectory of the projects root is a project. A project may hold
three media folders, each producing its own manifest:

  public/projects/
  └── alpha/
      ├── collage/      # png jpg jpeg tif tiff gif webp → { id, width, height, src }
      ├── approach/     # the above plus mp4 webm mov   → { id, type, src }
      └── prototypes/   # png jpg jpeg tif tiff gif webp → { id, src }

Files sharing an id (1.png, 1.gif) collapse to one asset; the category's
extension priority picks which file wins. Collage GIFs are scaled up to the
layout height; every other collage image is capped at it.

Run 'media-manifest gen-config' to generate a documented media-manifest.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Projects root (overrides `projects_root` from the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print one category's manifest as JSON
    Scan {
        /// collage, approach, or prototype
        category: Category,
    },
    /// Write static manifests for all categories
    Build {
        /// Output directory (overrides `output.dir`)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Artifact format (overrides `output.format`)
        #[arg(long, value_enum)]
        format: Option<ArtifactFormat>,
    },
    /// Run the dev server with live manifest endpoints
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        host: Option<String>,
        /// Rescan on every request instead of reusing unchanged manifests
        #[arg(long)]
        no_cache: bool,
    },
    /// Scan every category and print a summary
    Check,
    /// Print a stock media-manifest.toml with all options documented
    GenConfig,
}

/// Resolved config plus the effective projects root.
struct Context {
    config: ManifestConfig,
    root: PathBuf,
    settings: ScanSettings,
}

impl Context {
    fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let config = config::load_config(&cli.config)?;
        init_thread_pool(&config.processing);
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.projects_root));
        let settings = ScanSettings::from_config(&config);
        Ok(Self {
            config,
            root,
            settings,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    match &cli.command {
        Command::Scan { category } => {
            let ctx = Context::load(&cli)?;
            let manifest =
                scan::build_manifest(&ctx.root, *category, &RustBackend::new(), &ctx.settings)?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::Build { out, format } => {
            let ctx = Context::load(&cli)?;
            let out_dir = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(&ctx.config.output.dir));
            let format = format.unwrap_or(ctx.config.output.format);
            println!("==> Building manifests from {}", ctx.root.display());
            let files = emit::write_manifests(
                &ctx.root,
                &out_dir,
                format,
                &RustBackend::new(),
                &ctx.settings,
            )?;
            output::print_build_output(&files);
            println!("==> Build complete: {}", out_dir.display());
        }
        Command::Serve {
            port,
            host,
            no_cache,
        } => {
            let ctx = Context::load(&cli)?;
            let addr = bind_address(&ctx.config, host.clone(), *port)?;
            let public_dir = existing_dir(Path::new(&ctx.config.public_dir));
            let state = server::AppState::new(ctx.root, ctx.settings, !no_cache);
            tokio::runtime::Runtime::new()?.block_on(server::serve(state, public_dir, addr))?;
        }
        Command::Check => {
            let ctx = Context::load(&cli)?;
            println!("==> Checking {}", ctx.root.display());
            for category in Category::ALL {
                let manifest =
                    scan::build_manifest(&ctx.root, category, &RustBackend::new(), &ctx.settings)?;
                output::print_scan_output(&manifest);
                println!();
            }
            println!("==> Projects are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so `scan` output on stdout stays pipeable.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "media_manifest=info,tower_http=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Size the global rayon pool used for collage probing.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn bind_address(
    config: &ManifestConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<SocketAddr, Box<dyn std::error::Error>> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let ip: IpAddr = host
        .parse()
        .map_err(|e| format!("invalid host '{host}': {e}"))?;
    Ok(SocketAddr::new(ip, port.unwrap_or(config.server.port)))
}

fn existing_dir(dir: &Path) -> Option<PathBuf> {
    if dir.is_dir() {
        Some(dir.to_path_buf())
    } else {
        tracing::warn!(
            "Public dir {} not found; serving manifests only",
            dir.display()
        );
        None
    }
}
