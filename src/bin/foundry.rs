use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use listing_foundry::{
    ClusterConfig, ComposeConfig, JobConfig, ListingMetadata, PatternConfig,
    PrimaryMontageConfig, StageContext, TextEngine,
};

#[derive(Parser, Debug)]
#[command(name = "foundry", version, about = "Assemble product-listing imagery")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose layered artwork into one image.
    Compose(StageArgs),
    /// Build 3x3 repeat-pattern previews for every source tile.
    Pattern(StageArgs),
    /// Build the clustered preview images.
    Preview(StageArgs),
    /// Build the primary listing image.
    Primary(TitledArgs),
    /// Run every stage configured in a job document.
    Run(TitledArgs),
}

#[derive(Args, Debug)]
struct StageArgs {
    /// Working directory holding sources and receiving outputs.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Stage configuration JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads for parallel stages.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct TitledArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Short title for the primary image label; overrides listing.json.
    #[arg(long)]
    title: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log)?;
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Pattern(args) => cmd_pattern(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Primary(args) => cmd_primary(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::builder()
            .parse(level)
            .with_context(|| format!("invalid log level '{level}'"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn context(args: &StageArgs) -> anyhow::Result<StageContext> {
    let ctx = StageContext::new(&args.dir)
        .with_context(|| format!("open working directory '{}'", args.dir.display()))?;
    Ok(ctx.with_threads(args.threads))
}

fn read_config<T>(path: Option<&Path>) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match path {
        Some(path) => listing_foundry::load_json(path)
            .with_context(|| format!("load config '{}'", path.display())),
        None => Ok(T::default()),
    }
}

fn short_title(ctx: &StageContext, flag: Option<String>) -> anyhow::Result<Option<String>> {
    if let Some(title) = flag {
        return Ok(Some(title));
    }
    let Some(meta) = ListingMetadata::load_optional(&ctx.working_dir)? else {
        return Ok(None);
    };
    if !meta.is_complete() {
        tracing::warn!("listing.json is missing a title, description or keywords");
    }
    Ok(meta.short_title().map(str::to_string))
}

fn cmd_compose(args: StageArgs) -> anyhow::Result<()> {
    let ctx = context(&args)?;
    let cfg: ComposeConfig = read_config(args.config.as_deref())?;
    let text = TextEngine::for_working_dir(&ctx.working_dir);
    let out = listing_foundry::run_compose(&ctx, &cfg, &text)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_pattern(args: StageArgs) -> anyhow::Result<()> {
    let ctx = context(&args)?;
    let cfg: PatternConfig = read_config(args.config.as_deref())?;
    let report = listing_foundry::run_pattern(&ctx, &cfg)?;
    for o in &report.outputs {
        eprintln!("wrote {} ({} bytes)", o.full.display(), o.full_bytes);
        eprintln!("wrote {} ({} bytes)", o.preview.display(), o.preview_bytes);
    }
    Ok(())
}

fn cmd_preview(args: StageArgs) -> anyhow::Result<()> {
    let ctx = context(&args)?;
    let cfg: ClusterConfig = read_config(args.config.as_deref())?;
    let report = listing_foundry::run_preview(&ctx, &cfg)?;
    for out in &report.outputs {
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_primary(args: TitledArgs) -> anyhow::Result<()> {
    let ctx = context(&args.stage)?;
    let cfg: PrimaryMontageConfig = read_config(args.stage.config.as_deref())?;
    let title = short_title(&ctx, args.title)?;
    let text = TextEngine::for_working_dir(&ctx.working_dir);
    if let Some(out) = listing_foundry::run_primary(&ctx, &cfg, title.as_deref(), &text)? {
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn cmd_run(args: TitledArgs) -> anyhow::Result<()> {
    let ctx = context(&args.stage)?;
    let path = args
        .stage
        .config
        .as_deref()
        .context("'run' needs --config <job.json>")?;
    let job: JobConfig = read_config(Some(path))?;
    let title = short_title(&ctx, args.title)?;
    let report = listing_foundry::run_job(&ctx, &job, title.as_deref())?;
    for out in report.written() {
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}
