use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "postcomp", version, about = "Render branded social-media post images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a post request to a PNG.
    Render(RenderArgs),
    /// Print the resolved draw plan of a post request as JSON.
    Plan(PlanArgs),
    /// List the supported output formats.
    Formats,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input post request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file (TTF/OTF) for slogan, title and body text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also print the image as a `data:` URL on stdout.
    #[arg(long, default_value_t = false)]
    data_url: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input post request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Font used to measure text. Without it, text is laid out with fixed-advance estimates.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Plan(args) => cmd_plan(args).await,
        Command::Formats => cmd_formats(),
    }
}

fn context_for(font: Option<&PathBuf>) -> anyhow::Result<postcomp::RenderContext> {
    let ctx = postcomp::RenderContext::default();
    match font {
        Some(path) => Ok(ctx.with_font_path(path)?),
        None => Ok(ctx),
    }
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let request = postcomp::PostRequest::from_path(&args.in_path)
        .with_context(|| format!("load post request '{}'", args.in_path.display()))?;
    let ctx = context_for(args.font.as_ref())?;

    let image = postcomp::render_post(&request, ctx).await?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &image.png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    if args.data_url {
        println!("{}", image.to_data_url());
    }
    eprintln!("wrote {} ({}x{})", args.out.display(), image.width, image.height);
    Ok(())
}

async fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let request = postcomp::PostRequest::from_path(&args.in_path)
        .with_context(|| format!("load post request '{}'", args.in_path.display()))?;
    let ctx = context_for(args.font.as_ref())?;
    let compositor = postcomp::Compositor::new(ctx)?;

    let plan = if compositor.context().font.is_some() {
        compositor.plan(&request).await?
    } else {
        postcomp::resolve_format(&request.format)?;
        let assets = compositor.fetch_assets(&request).await;
        let mut measure = postcomp::FixedAdvanceMeasure::default();
        postcomp::compile_post(&request, &assets, compositor.context(), Some(&mut measure))?
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize render plan")?
    );
    Ok(())
}

fn cmd_formats() -> anyhow::Result<()> {
    for format in postcomp::Format::ALL {
        let canvas = format.canvas();
        println!("{:<10} {}x{}", format.as_str(), canvas.width, canvas.height);
    }
    Ok(())
}
