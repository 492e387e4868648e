//! Mail Translator CLI - Command line front end for the translation pipeline.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mail_translator_core::{
    clear_translation_cache, AppConfig, Lang, ProviderKind, RuntimeConfig, TranslationService,
};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderOption {
    Builtin,
    Deepl,
    Google,
    Libre,
}

impl From<ProviderOption> for ProviderKind {
    fn from(opt: ProviderOption) -> Self {
        match opt {
            ProviderOption::Builtin => Self::Builtin,
            ProviderOption::Deepl => Self::Deepl,
            ProviderOption::Google => Self::Google,
            ProviderOption::Libre => Self::Libre,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputMode {
    /// Sniff the input: markup goes through the text-node translator
    Auto,
    /// Treat the input as HTML
    Html,
    /// Treat the input as plain text
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "mail-translate")]
#[command(author, version, about = "Translate email text and HTML", long_about = None)]
struct Args {
    /// Text to translate (reads stdin if omitted and no --file is given)
    text: Option<String>,

    /// Read the input from a file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Target language code
    #[arg(short = 't', long, default_value = "en")]
    target: String,

    /// How to interpret the input
    #[arg(short, long, value_enum, default_value = "auto")]
    mode: InputMode,

    /// Translation provider
    #[arg(short, long, value_enum)]
    provider: Option<ProviderOption>,

    /// API key for keyed providers (DeepL, Google)
    #[arg(long, env = "TRANSLATE_API_KEY")]
    api_key: Option<String>,

    /// Cloudflare account id for the built-in AI runtime
    #[arg(long, env = "CF_ACCOUNT_ID")]
    cf_account_id: Option<String>,

    /// Cloudflare API token for the built-in AI runtime
    #[arg(long, env = "CF_API_TOKEN")]
    cf_api_token: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable caching
    #[arg(long)]
    no_cache: bool,

    /// Clear the on-disk translation cache and exit
    #[arg(long)]
    clear_cache: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn read_input(args: &Args) -> Result<String> {
    if let Some(ref text) = args.text {
        return Ok(text.clone());
    }

    if let Some(ref path) = args.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

fn build_config(args: &Args) -> Result<AppConfig> {
    let mut config = match args.config {
        Some(ref path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::load(),
    };

    if let Some(provider) = args.provider {
        config.translation.provider = provider.into();
    }
    if args.api_key.is_some() {
        config.translation.api_key = args.api_key.clone();
    }
    if let (Some(account_id), Some(api_token)) = (&args.cf_account_id, &args.cf_api_token) {
        config.runtime = Some(RuntimeConfig {
            account_id: account_id.clone(),
            api_token: api_token.clone(),
            model: config
                .runtime
                .map(|r| r.model)
                .unwrap_or_else(|| mail_translator_core::BUILTIN_MODEL.to_string()),
        });
    }
    if args.no_cache {
        config.cache.memory_enabled = false;
        config.cache.disk_enabled = false;
    }

    Ok(config)
}

#[allow(clippy::print_stdout)]
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if args.clear_cache {
        let cleared = clear_translation_cache()
            .map_err(|e| anyhow::anyhow!("Failed to clear cache: {e}"))?;
        info!("Cleared {} cache entries", cleared);
        return Ok(());
    }

    let config = build_config(&args)?;
    let service = TranslationService::new(&config).context("Failed to create service")?;

    let input = read_input(&args)?;
    let target = Lang::new(args.target.clone());

    let translated = match args.mode {
        InputMode::Auto => service.translate(&input, &target).await?,
        InputMode::Html => service.translate_html(&input, &target).await?,
        InputMode::Text => service.translate_text(&input, &target).await?,
    };

    println!("{translated}");

    Ok(())
}
