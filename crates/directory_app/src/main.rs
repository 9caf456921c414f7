mod platform;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use directory_core::{Filter, ImageForm, SiteForm, Upload, VideoForm};
use directory_engine::{PreviewInput, SubmissionRequest};
use directory_logging::{dir_info, dir_warn};
use log::LevelFilter;

use platform::config::{AppConfig, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(name = "directory", about = "Search and grow a directory of websites, images and videos")]
struct Cli {
    /// RON configuration file. Defaults apply when it does not exist.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log at debug level regardless of the configured level.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one search and render the results page.
    Search {
        query: String,
        #[arg(long, default_value = "all")]
        filter: Filter,
        /// Write HTML here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load a page location such as `/results.html?q=cats&debug=1`.
    Open {
        location: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Search as you type on stdin.
    Interactive,
    /// Add a website, image or video to the directory.
    Submit {
        #[command(subcommand)]
        form: SubmitForm,
    },
    /// Check what media a submission would show.
    Preview {
        #[arg(long, default_value = "")]
        link: String,
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Print the effective configuration as RON.
    Config,
}

#[derive(Debug, Subcommand)]
enum SubmitForm {
    Site {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        link: String,
        /// Comma-separated.
        #[arg(long, default_value = "")]
        keywords: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[command(flatten)]
        file: FileArg,
        #[arg(long)]
        is_company: bool,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        site_type: String,
    },
    Image {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        title_link: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[command(flatten)]
        file: FileArg,
    },
    Video {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        title_link: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        video_url: String,
        #[command(flatten)]
        file: FileArg,
    },
}

#[derive(Debug, Args)]
struct FileArg {
    /// Local file uploaded as the media of the entry.
    #[arg(long)]
    file: Option<PathBuf>,
}

impl FileArg {
    fn load(&self) -> anyhow::Result<Option<Upload>> {
        let Some(path) = &self.file else {
            return Ok(None);
        };
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Some(Upload { file_name, bytes }))
    }
}

impl SubmitForm {
    fn into_request(self) -> anyhow::Result<SubmissionRequest> {
        Ok(match self {
            SubmitForm::Site {
                title,
                link,
                keywords,
                description,
                image_url,
                file,
                is_company,
                company,
                site_type,
            } => SubmissionRequest::Site(SiteForm {
                title,
                link,
                keywords,
                description,
                image_url,
                upload: file.load()?,
                is_company,
                company_name: company,
                site_type,
            }),
            SubmitForm::Image {
                title,
                title_link,
                description,
                image_url,
                file,
            } => SubmissionRequest::Image(ImageForm {
                title,
                title_link,
                description,
                image_url,
                upload: file.load()?,
            }),
            SubmitForm::Video {
                title,
                title_link,
                description,
                video_url,
                file,
            } => SubmissionRequest::Video(VideoForm {
                title,
                title_link,
                description,
                video_url,
                upload: file.load()?,
            }),
        })
    }
}

fn load_config(path: &Path) -> (AppConfig, Option<anyhow::Error>) {
    match AppConfig::read(path) {
        Ok(Some(config)) => (config, None),
        Ok(None) => (AppConfig::default(), None),
        Err(err) => (AppConfig::default(), Some(err)),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, config_error) = load_config(&cli.config);

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        directory_logging::level_from_name(&config.log_level)
    };
    platform::logging::initialize(config.log_destination, level);
    if let Some(err) = config_error {
        dir_warn!("Using default configuration: {:#}", err);
    }
    dir_info!("Store at {}", config.store_root.display());

    match cli.command {
        Command::Search { query, filter, out } => {
            platform::app::run_search(&config, &query, filter, out.as_deref())
        }
        Command::Open { location, out } => {
            platform::app::run_open(&config, &location, out.as_deref())
        }
        Command::Interactive => platform::app::run_interactive(&config),
        Command::Submit { form } => {
            if platform::app::run_submit(&config, form.into_request()?)? {
                Ok(())
            } else {
                std::process::exit(1)
            }
        }
        Command::Preview { link, image_url } => {
            platform::app::run_preview(&config, PreviewInput { link, image_url })
        }
        Command::Config => {
            println!("{}", config.to_ron()?);
            Ok(())
        }
    }
}
