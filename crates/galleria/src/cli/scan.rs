//! The `galleria scan` command.

use anyhow::Context;
use clap::{Args, ValueEnum};
use galleria_core::{
    Config, LocalFs, OutputFormat as CoreOutputFormat, OutputWriter, ScanPool, ScanTree,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the `scan` command.
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Directory to scan, relative to the library root
    #[arg(default_value = ".")]
    pub directory: String,

    /// Library root (overrides `library.root`)
    #[arg(short, long, env = "GALLERIA_ROOT")]
    pub root: Option<PathBuf>,

    /// Number of scan workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Photos collected per subdirectory preview
    #[arg(long)]
    pub preview: Option<usize>,

    /// Output format (defaults to `output.format`)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// The directory tree as one JSON document
    Json,
    /// One JSON record per photo
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

impl ScanArgs {
    /// Fold command-line overrides into the loaded configuration.
    fn apply_to(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(root) = &self.root {
            let expanded = shellexpand::tilde(&root.to_string_lossy()).into_owned();
            config.library.root = PathBuf::from(expanded);
        }
        if let Some(workers) = self.workers {
            config.pool.workers = workers;
        }
        if let Some(preview) = self.preview {
            config.library.preview_photos = preview;
        }
        if self.pretty {
            config.output.pretty = true;
        }
        config.validate().context("Invalid scan options")?;
        Ok(())
    }

    fn output_format(&self, config: &Config) -> CoreOutputFormat {
        match self.format {
            Some(format) => format.into(),
            None => {
                CoreOutputFormat::parse(&config.output.format).unwrap_or(CoreOutputFormat::Json)
            }
        }
    }
}

/// Execute the scan command.
pub async fn execute(args: ScanArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply_to(&mut config)?;
    let format = args.output_format(&config);

    let (tree, image_root) = run_scan(&config, &args.directory).await?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_tree(BufWriter::new(file), &tree, &image_root, format, config.output.pretty)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            write_tree(io::stdout().lock(), &tree, &image_root, format, config.output.pretty)?;
        }
    }
    Ok(())
}

/// Start a pool, scan one directory, and stop the pool again.
async fn run_scan(config: &Config, directory: &str) -> anyhow::Result<(ScanTree, PathBuf)> {
    let pool = ScanPool::start(config, Arc::new(LocalFs));
    let image_root = pool.image_root().to_path_buf();

    let start = Instant::now();
    let result = pool.scan(directory).await;
    pool.shutdown().await;

    let tree = result.with_context(|| {
        format!("Failed to scan {:?} under {}", directory, image_root.display())
    })?;

    tracing::info!(
        "Scanned {} photos in {} directories in {:?}",
        tree.photo_count(),
        tree.directory_count(),
        start.elapsed()
    );
    Ok((tree, image_root))
}

fn write_tree<W: Write>(
    writer: W,
    tree: &ScanTree,
    image_root: &Path,
    format: CoreOutputFormat,
    pretty: bool,
) -> io::Result<()> {
    let mut writer = OutputWriter::new(writer, format, pretty);
    writer.write_tree(tree, image_root)?;
    writer.flush()
}
