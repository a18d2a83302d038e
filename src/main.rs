use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use gallery_state::{
    Catalog, CollectionKind, CollectionStateManager, Config, Error, FileStore, ImageCatalog,
    ImageRef, Lightbox,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;

const VERSION: &str = concat!(
    env!("GALLERY_BUILD_VERSION"),
    " (",
    compile_time::datetime_str!(),
    ")",
);

/// Environment variable overriding the data directory
const DATA_DIR_ENV: &str = "GALLERY_DATA_DIR";

/// gallery — manage your liked and saved gallery images
#[derive(Parser, Debug)]
#[command(
    version = VERSION,
    about,
    long_about = "gallery — manage your liked and saved gallery images\n\n\
        Sessions, likes and saves are kept on this device only.\n\
        Images can be given as a URL or as a grid position (0-based).",
    after_long_help = "Examples:\n\
        \x20 gallery signup \"Ann Lee\" ann@example.com pass1!\n\
        \x20 gallery browse --pages 2      List the first two pages of the grid\n\
        \x20 gallery like 5                Like the sixth image of the grid\n\
        \x20 gallery open --liked 0        Open the first liked image in the viewer"
)]
struct Cli {
    /// Directory holding the persisted state
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file to use instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in
    Signup {
        name: String,
        email: String,
        password: String,
    },
    /// Log in (name is taken from the email)
    Login { email: String, password: String },
    /// Log out and clear liked and saved images
    Logout {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Like or unlike an image
    Like { image: String },
    /// Save or unsave an image
    Save { image: String },
    /// Remove an image from the liked list
    Unlike { image: String },
    /// Remove an image from the saved list
    Unsave { image: String },
    /// List liked images
    Liked,
    /// List saved images
    Saved,
    /// Show the session and collection counts
    Status {
        /// Print the full state as JSON
        #[arg(long)]
        json: bool,
    },
    /// List grid images with like/save markers
    Browse {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u64,
    },
    /// Open an image in the viewer
    Open {
        /// Image URL or grid position
        #[arg(required_unless_present_any = ["liked", "saved"])]
        image: Option<String>,
        /// Open the n-th liked image (0-based)
        #[arg(long, conflicts_with_all = ["image", "saved"])]
        liked: Option<usize>,
        /// Open the n-th saved image (0-based)
        #[arg(long, conflicts_with_all = ["image", "liked"])]
        saved: Option<usize>,
        /// Number of grid pages to load before resolving
        #[arg(long, default_value_t = 1)]
        pages: u64,
    },
}

const DEFAULT_LOGLEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

fn main() {
    // Parse CLI arguments first (before any other initialization)
    let cli = Cli::parse();

    // Load environment variables from .env file
    if let Ok(dotenv) = dotenvy::dotenv() {
        eprintln!("Loaded .env file from: {}", dotenv.display());
    }
    init_tracing();

    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOGLEVEL));

    // Log to stderr so command output stays pipeable
    let fmt_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter_layer)
        .with(fmt_layer)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let data_dir = resolve_data_dir(cli.data_dir, &config);
    tracing::debug!(data_dir = %data_dir.display(), "Using data directory");

    let store = FileStore::new(data_dir);
    let mut manager = CollectionStateManager::open(store, config.storage.keys.clone());
    let mut catalog = Catalog::new(config.catalog.clone());

    match cli.command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            let session = manager.signup(&name, &email, &password)?;
            println!("Welcome, {}! Your account has been created.", session.name);
        }
        Command::Login { email, password } => {
            let session = manager.login(&email, &password)?;
            println!("Welcome back, {}!", session.name);
        }
        Command::Logout { yes } => {
            if !manager.is_authenticated() {
                println!("You are not logged in");
                return Ok(());
            }
            if !yes && !confirm("Are you sure you want to logout?")? {
                return Ok(());
            }
            manager.logout()?;
            println!("You have been logged out successfully");
        }
        Command::Like { image } => {
            let image = resolve_image(&image, &mut catalog)?;
            let liked = manager
                .toggle_liked(&image)
                .map_err(|e| explain(e, "like images"))?;
            let verb = if liked { "Liked" } else { "Unliked" };
            println!("{verb} {image} ({} liked)", manager.liked_count());
        }
        Command::Save { image } => {
            let image = resolve_image(&image, &mut catalog)?;
            let saved = manager
                .toggle_saved(&image)
                .map_err(|e| explain(e, "save images"))?;
            let verb = if saved { "Saved" } else { "Unsaved" };
            println!("{verb} {image} ({} saved)", manager.saved_count());
        }
        Command::Unlike { image } => {
            let image = resolve_image(&image, &mut catalog)?;
            if manager.remove_liked(&image)? {
                println!("Removed {image} from liked");
            } else {
                println!("{image} was not liked");
            }
        }
        Command::Unsave { image } => {
            let image = resolve_image(&image, &mut catalog)?;
            if manager.remove_saved(&image)? {
                println!("Removed {image} from saved");
            } else {
                println!("{image} was not saved");
            }
        }
        Command::Liked => list_collection(&manager, CollectionKind::Liked)?,
        Command::Saved => list_collection(&manager, CollectionKind::Saved)?,
        Command::Status { json } => {
            if json {
                let snapshot = serde_json::to_string_pretty(&manager.snapshot())
                    .context("Failed to serialize state")?;
                println!("{snapshot}");
            } else {
                match manager.session() {
                    Some(session) => println!("Name:  {}\nEmail: {}", session.name, session.email),
                    None => println!("Not logged in"),
                }
                println!(
                    "Liked: {}\nSaved: {}",
                    manager.liked_count(),
                    manager.saved_count()
                );
            }
        }
        Command::Browse { pages } => {
            catalog.load_pages(pages)?;
            for (position, entry) in catalog.entries().iter().enumerate() {
                let like = if manager.is_liked(&entry.image) { "♥" } else { " " };
                let save = if manager.is_saved(&entry.image) { "★" } else { " " };
                println!("{position:>4} {like}{save} {}", entry.image);
            }
        }
        Command::Open {
            image,
            liked,
            saved,
            pages,
        } => {
            catalog.load_pages(pages)?;
            let position = match (image, liked, saved) {
                (_, Some(index), _) => manager.resolve_liked(index, &catalog),
                (_, _, Some(index)) => manager.resolve_saved(index, &catalog),
                (Some(image), _, _) => {
                    let image = resolve_image(&image, &mut catalog)?;
                    catalog.resolve_position(&image)
                }
                (None, None, None) => None,
            };
            let Some(position) = position else {
                bail!("Image is not in the first {} page(s) of the grid", catalog.pages_loaded());
            };
            show_in_viewer(&manager, &catalog, position)?;
        }
    }

    Ok(())
}

/// `--data-dir`, then `$GALLERY_DATA_DIR`, then config, then the platform default
fn resolve_data_dir(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| {
        std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
    .or_else(|| config.storage.data_dir.clone())
    .unwrap_or_else(FileStore::default_dir)
}

/// Interpret an argument as a grid position or an image URL
fn resolve_image(arg: &str, catalog: &mut Catalog) -> anyhow::Result<ImageRef> {
    let Ok(position) = arg.parse::<usize>() else {
        return Ok(ImageRef::from(arg));
    };

    Ok(catalog.load_through(position)?.clone())
}

/// Turn an auth failure into the prompt shown to the user
fn explain(err: Error, action: &str) -> anyhow::Error {
    match err {
        Error::NotAuthenticated => anyhow::anyhow!("Please login to {action}"),
        other => other.into(),
    }
}

fn list_collection<S: gallery_state::PersistenceStore>(
    manager: &CollectionStateManager<S>,
    kind: CollectionKind,
) -> anyhow::Result<()> {
    if !manager.is_authenticated() {
        bail!("Please login to view {} images", kind.label());
    }

    let collection = manager.collection(kind);
    if collection.is_empty() {
        println!("No {} images yet", kind.label());
        return Ok(());
    }
    for (index, image) in collection.iter().enumerate() {
        println!("{index:>4} {image}");
    }
    Ok(())
}

fn show_in_viewer<S: gallery_state::PersistenceStore>(
    manager: &CollectionStateManager<S>,
    catalog: &Catalog,
    position: usize,
) -> anyhow::Result<()> {
    let mut lightbox = Lightbox::new();
    let image = lightbox
        .open(position, catalog)
        .with_context(|| format!("Grid position {position} is out of range"))?;

    println!("Image {} of {}", position + 1, catalog.len());
    println!("  src:      {image}");
    println!("  liked:    {}", manager.is_liked(image));
    println!("  saved:    {}", manager.is_saved(image));
    println!("  prev:     {}", lightbox.can_go_prev());
    println!("  next:     {}", lightbox.can_go_next(catalog));
    if let Some(name) = lightbox.download_file_name() {
        println!("  download: {name}");
    }
    Ok(())
}

/// Ask a yes/no question on the terminal (default: no)
fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
