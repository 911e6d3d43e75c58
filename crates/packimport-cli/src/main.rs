use anyhow::Context;
use clap::{Parser, Subcommand};
use packimport_core::config::CONFIG_FILE_NAME;
use packimport_core::{CliOverrides, Container, ImportConfig, PackageBuilder, PackagedStore, Priority};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// packimport - package script modules and import them from resource stores
#[derive(Parser, Debug)]
#[command(name = "packimport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log progress (equivalent to RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default packimport.json in the current directory
    Init,

    /// Package the top-level files of a directory
    Pack {
        /// Directory holding the resources
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Glob matched against file names to leave out (repeatable)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,

        /// Player binary copied in front of the package
        #[arg(long, value_name = "PLAYER")]
        append_to: Option<PathBuf>,
    },

    /// List the entries of a resource package
    Inspect {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a module and print its namespace
    Import {
        /// Dotted module name
        #[arg(value_name = "MODULE")]
        module: String,

        /// Configuration file (JSON or YAML)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Resource package to import from
        #[arg(long, value_name = "FILE")]
        package: Option<PathBuf>,

        /// Resource directory to import from
        #[arg(long, value_name = "DIR")]
        resource_dir: Option<PathBuf>,

        /// Directory searched for modules on disk (repeatable)
        #[arg(long, value_name = "DIR")]
        search_path: Vec<PathBuf>,

        /// Resource finder priority (front, back)
        #[arg(long, value_name = "PRIORITY")]
        priority: Option<Priority>,

        /// Source suffix used for resource keys
        #[arg(long, value_name = "EXT")]
        suffix: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set RUST_LOG=debug for detailed logs
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Init => init_project(),
        Command::Pack {
            dir,
            output,
            exclude,
            append_to,
        } => pack(&dir, &output, &exclude, append_to.as_deref()),
        Command::Inspect { file, json } => inspect(&file, json),
        Command::Import {
            module,
            config,
            package,
            resource_dir,
            search_path,
            priority,
            suffix,
        } => {
            let overrides = CliOverrides {
                source_suffix: suffix,
                priority,
                search_paths: search_path,
                resource_dir,
                package,
            };
            import(&module, config.as_deref(), overrides)
        }
    }
}

/// Initialize a packimport configuration in the current directory
fn init_project() -> anyhow::Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }

    ImportConfig::init_file(path).with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    println!("Created {}", CONFIG_FILE_NAME);
    Ok(())
}

/// Build a resource package from the top-level files of `dir`
fn pack(dir: &Path, output: &Path, exclude: &[String], player: Option<&Path>) -> anyhow::Result<()> {
    use rayon::prelude::*;

    let patterns = exclude
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid exclude pattern '{}'", p)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let files = collect_resources(dir, &patterns)?;
    info!("Packaging {} file(s) from {}", files.len(), dir.display());

    let contents = files
        .par_iter()
        .map(|(name, path)| {
            std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))
                .map(|data| (name.clone(), data))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut builder = PackageBuilder::new();
    for (name, data) in contents {
        builder.add(name, data)?;
    }

    let mut out = match player {
        Some(player) => std::fs::read(player)
            .with_context(|| format!("Failed to read player binary {}", player.display()))?,
        None => Vec::new(),
    };
    let prefix_len = out.len();
    builder.write_to(&mut out)?;

    std::fs::write(output, &out)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    copy_permissions(player, output)?;

    println!(
        "Packed {} resource(s) into {} ({} bytes)",
        builder.len(),
        output.display(),
        out.len() - prefix_len
    );
    Ok(())
}

/// Top-level files of `dir` not matched by an exclude pattern, sorted by name
fn collect_resources(
    dir: &Path,
    exclude: &[glob::Pattern],
) -> anyhow::Result<Vec<(String, PathBuf)>> {
    use walkdir::WalkDir;

    if !dir.is_dir() {
        anyhow::bail!("Resource directory not found: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if exclude.iter().any(|p| p.matches(name)) {
            debug!("Excluded {}", name);
            continue;
        }

        files.push((name.to_string(), entry.path().to_path_buf()));
    }
    Ok(files)
}

#[cfg(unix)]
fn copy_permissions(player: Option<&Path>, output: &Path) -> anyhow::Result<()> {
    if let Some(player) = player {
        let permissions = std::fs::metadata(player)?.permissions();
        std::fs::set_permissions(output, permissions)
            .with_context(|| format!("Failed to mark {} executable", output.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn copy_permissions(_player: Option<&Path>, _output: &Path) -> anyhow::Result<()> {
    Ok(())
}

/// Print the entries of a resource package
fn inspect(file: &Path, json: bool) -> anyhow::Result<()> {
    let store = PackagedStore::from_file(file)
        .with_context(|| format!("Failed to read package {}", file.display()))?;
    let entries = store.entries();

    if json {
        let listing: Vec<_> = entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "name": e.name,
                    "size": e.len,
                    "blake3": e.digest,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for entry in &entries {
        println!("{:>10}  {}  {}", entry.len, entry.digest, entry.name);
    }
    println!("{} resource(s)", entries.len());
    Ok(())
}

/// Import `module` through a fully wired container and print its namespace
fn import(module: &str, config_path: Option<&Path>, overrides: CliOverrides) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    config.merge(overrides);
    debug!("Import configuration: {:?}", config);

    let container = Container::new(config).context("Failed to set up the import system")?;
    let loaded = container.import_module(module)?;

    println!("module {} from {}", loaded.name(), loaded.file());
    for (name, value) in loaded.public_attrs() {
        println!("  {} = {}", name, value);
    }
    Ok(())
}

/// Load configuration from the given file, or packimport.json if present
fn load_config(path: Option<&Path>) -> anyhow::Result<ImportConfig> {
    if let Some(path) = path {
        return ImportConfig::from_file(path)
            .with_context(|| format!("Failed to load config file {}", path.display()));
    }

    let default_path = Path::new(CONFIG_FILE_NAME);
    if default_path.exists() {
        ImportConfig::from_file(default_path)
            .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME))
    } else {
        Ok(ImportConfig::default())
    }
}
