//! Binary entrypoint for qr-studio.
//!
//! Parses the CLI, loads the session config and delegates rendering to the
//! library crate.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use qr_studio::batch;
use qr_studio::config::{BatchFile, Configuration};
use qr_studio::content::{ContactCard, ContentDescriptor, MapsLocation, WifiCredentials, WifiEncryption};
use qr_studio::export::ExportFormat;
use qr_studio::language::Language;
use qr_studio::style::{BorderKind, Color};
use qr_studio::{RenderError, Studio};

#[derive(Debug, Parser)]
#[command(name = "qr-studio", version, about = "Render styled QR codes to PNG or SVG")]
struct Cli {
    /// Path to YAML session config
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Directory exported files are written to
    #[arg(long, value_name = "DIR", global = true)]
    out_dir: Option<PathBuf>,

    /// Output file name (sanitized, extension added)
    #[arg(long, value_name = "NAME", global = true)]
    name: Option<String>,

    #[arg(long, value_enum, global = true)]
    format: Option<FormatArg>,

    /// Image placed in the centre of the code
    #[arg(long, value_name = "FILE", global = true)]
    logo: Option<PathBuf>,

    /// Language forwarded to the map landing page (vi, en)
    #[arg(long, global = true)]
    lang: Option<Language>,

    /// Origin serving /map-landing.html
    #[arg(long, value_name = "URL", global = true)]
    origin: Option<String>,

    #[arg(long, value_name = "COLOR", global = true)]
    fg: Option<Color>,

    #[arg(long, value_name = "COLOR", global = true)]
    bg: Option<Color>,

    /// none, solid, dashed or gradient
    #[arg(long, global = true)]
    border: Option<BorderKind>,

    #[arg(long, value_name = "COLOR", global = true)]
    border_color: Option<Color>,

    /// Logo edge as a percentage of the code width (10-30)
    #[arg(long, value_name = "PERCENT", global = true)]
    logo_size: Option<u8>,

    /// Print the session usage counters as YAML before exiting
    #[arg(long, global = true)]
    stats: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Svg,
    Both,
}

impl FormatArg {
    fn formats(self) -> Vec<ExportFormat> {
        match self {
            Self::Png => vec![ExportFormat::Png],
            Self::Svg => vec![ExportFormat::Svg],
            Self::Both => vec![ExportFormat::Png, ExportFormat::Svg],
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Content(ContentCommand),
    /// Render every job of a YAML job list in one session
    Batch {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum ContentCommand {
    /// Website address; https:// is added when missing
    Url { value: String },
    /// Phone number, encoded as a tel: URI
    Phone { number: String },
    /// Map link wrapped in the landing page
    Maps {
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// vCard 3.0 business card
    Contact {
        #[arg(value_name = "NAME")]
        full_name: String,
        #[arg(long, default_value = "")]
        job_title: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long = "org", default_value = "")]
        organization: String,
    },
    /// WiFi network credentials
    Wifi {
        ssid: String,
        #[arg(long, default_value = "")]
        password: String,
        /// WPA, WEP or nopass
        #[arg(long, default_value = "WPA")]
        encryption: WifiEncryption,
    },
}

impl From<ContentCommand> for ContentDescriptor {
    fn from(cmd: ContentCommand) -> Self {
        match cmd {
            ContentCommand::Url { value } => ContentDescriptor::url(value),
            ContentCommand::Phone { number } => ContentDescriptor::phone(number),
            ContentCommand::Maps { url, title, note } => {
                ContentDescriptor::Maps(MapsLocation { url, title, note })
            }
            ContentCommand::Contact {
                full_name,
                job_title,
                phone,
                email,
                organization,
            } => ContentDescriptor::Contact(ContactCard {
                name: full_name,
                job_title,
                phone,
                email,
                organization,
            }),
            ContentCommand::Wifi {
                ssid,
                password,
                encryption,
            } => ContentDescriptor::Wifi(WifiCredentials {
                ssid,
                password,
                encryption,
            }),
        }
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("qr_studio={level}").parse().context("log directive")?);
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Configuration> {
    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    if let Some(lang) = cli.lang {
        cfg.language = lang;
    }
    if let Some(origin) = &cli.origin {
        cfg.origin = origin.clone();
    }
    if let Some(dir) = &cli.out_dir {
        cfg.output_dir = dir.clone();
    }
    if let Some(name) = &cli.name {
        cfg.file_name = name.clone();
    }
    if let Some(format) = cli.format {
        cfg.formats = format.formats();
    }
    if let Some(logo) = &cli.logo {
        cfg.logo = Some(logo.clone());
    }
    if let Some(fg) = cli.fg {
        cfg.style.foreground = fg;
    }
    if let Some(bg) = cli.bg {
        cfg.style.background = bg;
    }
    if let Some(border) = cli.border {
        cfg.style.border = border;
    }
    if let Some(color) = cli.border_color {
        cfg.style.border_color = color;
    }
    if let Some(size) = cli.logo_size {
        cfg.style.set_logo_size(size);
    }
    cfg.validated().context("validating configuration")
}

async fn run_batch(studio: &mut Studio, cfg: &Configuration, file: &Path) -> Result<()> {
    let batch = BatchFile::from_yaml_file(file)?;
    info!(file = %file.display(), "loaded batch");
    let report = batch::run_jobs(studio, cfg, &batch.jobs).await;
    for path in &report.written {
        println!("{}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let cfg = load_config(&cli)?;
    let mut studio = Studio::new(cfg.payload_context());

    let result = match cli.command {
        Command::Batch { file } => run_batch(&mut studio, &cfg, &file).await,
        Command::Content(cmd) => {
            let content = ContentDescriptor::from(cmd);
            let style = cfg.style.clone();
            batch::render_job(
                &mut studio,
                &cfg,
                &cfg.file_name,
                &content,
                &style,
                cfg.logo.as_deref(),
            )
            .await
            .map(|paths| {
                for path in paths {
                    println!("{}", path.display());
                }
            })
            .inspect_err(|err| {
                if let Some(alert) = err
                    .downcast_ref::<RenderError>()
                    .and_then(|e| e.user_message(cfg.language))
                {
                    eprintln!("{alert}");
                }
            })
        }
    };

    if cli.stats {
        print!("{}", serde_yaml::to_string(studio.stats())?);
    }
    result
}
