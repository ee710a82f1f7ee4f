//! docstyle CLI - PDF style profiling and estimate generation tool

mod llm;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use base64::Engine;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docstyle::compose::ContentBackend;
use docstyle::render::{self, RenderOptions};
use docstyle::{
    compose_content, parse_fallback, AnalyzeOptions, BatchReport, DocumentInput, JsonFormat,
};

use llm::{ChatCompletionsBackend, LlmConfig};

#[derive(Parser)]
#[command(name = "docstyle")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Profile PDF styles and generate matching estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze reference PDFs and print the merged style profile
    Analyze {
        /// Reference PDF files (at most 10)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Analyze documents one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Parse a request into an estimate outline without a backend
    Outline {
        /// Request text (read from stdin if not specified)
        #[arg(short, long)]
        prompt: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Analyze references and write an estimate in their style
    Generate {
        /// Reference PDF files (at most 10)
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Client request text
        #[arg(short, long)]
        prompt: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "estimate_output")]
        output: PathBuf,

        /// Logo image to embed (PNG, JPEG, SVG or WebP)
        #[arg(long, value_name = "FILE")]
        logo: Option<PathBuf>,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args)]
struct LlmArgs {
    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "LLM_BASE_URL")]
    llm_base_url: Option<String>,

    /// Model name
    #[arg(long, env = "LLM_MODEL")]
    llm_model: Option<String>,

    /// API key (sent as a bearer token)
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    llm_api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "60")]
    llm_timeout_secs: u64,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            inputs,
            json,
            compact,
            sequential,
        } => cmd_analyze(&inputs, json, compact, sequential),
        Commands::Outline { prompt, compact } => cmd_outline(prompt, compact),
        Commands::Generate {
            inputs,
            prompt,
            output,
            logo,
            llm,
        } => cmd_generate(&inputs, &prompt, &output, logo.as_deref(), llm),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn read_inputs(paths: &[PathBuf]) -> Result<Vec<DocumentInput>, Box<dyn std::error::Error>> {
    paths
        .iter()
        .map(|p| {
            DocumentInput::from_path(p).map_err(|e| {
                Box::<dyn std::error::Error>::from(format!("Cannot read {}: {}", p.display(), e))
            })
        })
        .collect()
}

fn analyze_inputs(
    paths: &[PathBuf],
    options: &AnalyzeOptions,
    pb: &ProgressBar,
) -> Result<BatchReport, Box<dyn std::error::Error>> {
    pb.set_message(format!("Reading {} files...", paths.len()));
    let inputs = read_inputs(paths)?;
    pb.inc(1);

    pb.set_message("Analyzing styles...");
    let report = docstyle::analyze_batch(&inputs, options)?;
    pb.inc(1);
    Ok(report)
}

fn cmd_analyze(
    inputs: &[PathBuf],
    json: bool,
    compact: bool,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = AnalyzeOptions::new().with_parallel(!sequential);

    let pb = progress_bar(2);
    let report = analyze_inputs(inputs, &options, &pb);
    pb.finish_and_clear();
    let report = report?;

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", render::to_json(&report, format)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!("{}", "Documents".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for doc in &report.documents {
        println!(
            "{} {} ({} pages, {}, {}/{}pt)",
            "✓".green(),
            doc.identifier.bold(),
            doc.pages,
            doc.primary_font,
            doc.heading_size,
            doc.body_size
        );
    }
    for failure in &report.failures {
        println!(
            "{} {}: {}",
            "✗".red(),
            failure.identifier.bold(),
            failure.reason.dimmed()
        );
    }

    let profile = &report.profile;
    println!();
    println!("{}", "Merged Style Profile".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), profile.doc_count);
    println!("{}: {}", "Pages".bold(), profile.page_count);
    println!("{}: {}", "Primary font".bold(), profile.primary_font);
    println!("{}: {}", "Secondary font".bold(), profile.secondary_font);
    println!("{}: {}", "Fonts".bold(), profile.fonts.join(", "));
    println!(
        "{}: body {}pt, heading {}pt, avg {}pt",
        "Sizes".bold(),
        profile.sizes.body,
        profile.sizes.heading,
        profile.sizes.avg
    );
    println!("{}: {}", "Colors".bold(), profile.colors.join(" "));
    println!("{}: {}", "Bold ratio".bold(), profile.emphasis.bold_ratio);
    println!(
        "{}: left {}, top {}, right {}, bottom {}",
        "Margins".bold(),
        profile.margins.left,
        profile.margins.top,
        profile.margins.right,
        profile.margins.bottom
    );
    let p = &profile.punctuation;
    println!(
        "{}: {} commas, {} periods, {} colons, {} semicolons, {} bullets",
        "Punctuation".bold(),
        p.commas,
        p.periods,
        p.colons,
        p.semicolons,
        p.bullets
    );
}

fn cmd_outline(prompt: Option<String>, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = match prompt {
        Some(p) => p,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let content = parse_fallback(&text);
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", render::to_json(&content, format)?);
    Ok(())
}

fn cmd_generate(
    inputs: &[PathBuf],
    prompt: &str,
    output: &Path,
    logo: Option<&Path>,
    llm: LlmArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if prompt.trim().is_empty() {
        return Err("Prompt is required".into());
    }

    let mut render_options = RenderOptions::new();
    if let Some(path) = logo {
        render_options = render_options.with_logo(logo_data_uri(path)?);
    }

    let backend = match LlmConfig::from_parts(
        llm.llm_base_url,
        llm.llm_model,
        llm.llm_api_key,
        llm.llm_timeout_secs,
    ) {
        Some(config) => Some(ChatCompletionsBackend::new(config)?),
        None => None,
    };

    fs::create_dir_all(output)?;

    let pb = progress_bar(5);
    let report = match analyze_inputs(inputs, &AnalyzeOptions::default(), &pb) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    for failure in &report.failures {
        pb.println(format!(
            "{} {}: {}",
            "Skipped".yellow(),
            failure.identifier,
            failure.reason
        ));
    }

    match &backend {
        Some(b) => pb.set_message(format!("Drafting content with {}...", b.model())),
        None => pb.set_message("Drafting content from outline..."),
    }
    let content = compose_content(
        prompt,
        &report.profile,
        backend.as_ref().map(|b| b as &dyn ContentBackend),
    );
    pb.inc(1);

    pb.set_message("Rendering HTML...");
    let html = render::to_html(&content, &report.profile, &render_options)?;
    fs::write(output.join("estimate.html"), &html)?;
    pb.inc(1);

    pb.set_message("Rendering PDF...");
    let pdf = render::to_pdf(&content, &report.profile, &render_options)?;
    fs::write(output.join("estimate.pdf"), &pdf)?;
    fs::write(
        output.join("content.json"),
        render::to_json(&content, JsonFormat::Pretty)?,
    )?;
    fs::write(
        output.join("style.json"),
        render::to_json(&report.profile, JsonFormat::Pretty)?,
    )?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} estimate.html", "├─".dimmed());
    println!("  {} estimate.pdf", "├─".dimmed());
    println!("  {} content.json", "├─".dimmed());
    println!("  {} style.json", "└─".dimmed());

    Ok(())
}

/// Read an image and encode it as a `data:` URI.
fn logo_data_uri(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => {
            return Err(format!(
                "Unsupported logo format: {} (use PNG, JPEG, SVG or WebP)",
                path.display()
            )
            .into())
        }
    };

    let data = fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    Ok(format!("data:{};base64,{}", mime, encoded))
}

fn cmd_version() {
    println!("{} {}", "docstyle".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF style profiling and estimate generation tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/docstyle".dimmed());
    println!("License: MIT");
}
