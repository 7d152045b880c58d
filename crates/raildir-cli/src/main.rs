//! Raildir CLI - Command-line front end for the division contacts directory.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use raildir_client::{ClientConfig, Directory, FilterMode, FilterSelection};

mod commands;
mod logging;
mod render;

use commands::Output;
use logging::LogFormat;

/// Raildir - Railway division contacts directory
#[derive(Parser, Debug)]
#[command(name = "raildir")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format (pretty or json)
    #[arg(long, default_value = "pretty", global = true)]
    log_format: String,

    /// Directory API base URL (overrides RAILDIR_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List contacts page by page
    List {
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Page size (default: RAILDIR_PAGE_SIZE)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show the total number of contacts
    Count,

    /// Show one contact
    Get {
        /// Contact ID
        id: String,
    },

    /// Search contacts
    Search {
        #[command(subcommand)]
        command: SearchCommands,
    },

    /// List blood groups
    BloodGroups,

    /// List lobbies
    Lobbies,

    /// List designations
    Designations,

    /// Filter contacts by blood group, lobby and designation
    Filter {
        /// Which filter to run
        #[arg(short, long, value_enum, default_value_t = FilterKind::All)]
        mode: FilterKind,
        /// Blood groups (comma-separated or repeated)
        #[arg(long = "blood-group", value_delimiter = ',')]
        blood_groups: Vec<String>,
        /// Lobbies (comma-separated or repeated)
        #[arg(long = "lobby", value_delimiter = ',')]
        lobbies: Vec<String>,
        /// Designations (comma-separated or repeated)
        #[arg(long = "designation", value_delimiter = ',')]
        designations: Vec<String>,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Show analytics
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommands,
    },

    /// List documents
    Documents {
        /// Only show documents whose title contains this text
        #[arg(short, long)]
        query: Option<String>,
        /// Show the document count instead
        #[arg(long)]
        count: bool,
    },

    /// Search as you type: each stdin line replaces the search input
    Interactive,

    /// Manage the theme preference
    Theme {
        /// Preferences file (default: platform config directory)
        #[arg(long)]
        preferences: Option<PathBuf>,

        #[command(subcommand)]
        command: ThemeCommands,
    },

    /// Show version information
    Version,
}

/// Filter endpoints.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FilterKind {
    /// Blood groups, optionally narrowed by lobby
    BloodGroup,
    /// Lobbies, optionally narrowed by designation
    Lobby,
    /// Any combination of the three
    All,
}

impl From<FilterKind> for FilterMode {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::BloodGroup => FilterMode::BloodGroup,
            FilterKind::Lobby => FilterMode::Lobby,
            FilterKind::All => FilterMode::Unified,
        }
    }
}

#[derive(Subcommand, Debug)]
enum SearchCommands {
    /// Search by name
    Name {
        /// Name or part of a name
        query: String,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Look up by phone number
    Phone {
        /// Phone number
        phone: String,
    },
}

#[derive(Subcommand, Debug)]
enum AnalyticsCommands {
    /// Headline numbers
    Overview,
    /// Contacts per blood group
    BloodGroups,
    /// Contacts per lobby
    Lobbies,
    /// Contacts per designation
    Designations,
    /// Contacts added per day
    Growth {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Most recently added contacts
    Recent {
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Site visit counter
    Visits {
        /// Record a visit
        #[arg(long)]
        increment: bool,
    },
    /// Visits per day
    History {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Everything at once
    Dashboard,
}

#[derive(Subcommand, Debug)]
enum ThemeCommands {
    /// Show the stored theme
    Show,
    /// Switch between light and dark
    Toggle,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    logging::init_logging(log_level, LogFormat::parse(&cli.log_format));

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let out = Output::new(cli.json);

    let command = match cli.command {
        Commands::Version => {
            println!("raildir {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Commands::Theme {
            preferences,
            command,
        } => {
            let path = preferences.or_else(raildir_client::Preferences::default_path);
            return match command {
                ThemeCommands::Show => commands::theme_show(path, out),
                ThemeCommands::Toggle => commands::theme_toggle(path, out),
            };
        }
        command => command,
    };

    let directory = connect(cli.base_url)?;

    match command {
        Commands::List { page, limit } => commands::list(&directory, page, limit, out).await,
        Commands::Count => commands::count(&directory, out).await,
        Commands::Get { id } => commands::get(&directory, &id, out).await,
        Commands::Search { command } => match command {
            SearchCommands::Name { query, page } => {
                commands::search_name(&directory, &query, page, out).await
            }
            SearchCommands::Phone { phone } => commands::search_phone(&directory, &phone, out).await,
        },
        Commands::BloodGroups => commands::enumeration(directory.blood_groups(), out).await,
        Commands::Lobbies => commands::enumeration(directory.lobbies(), out).await,
        Commands::Designations => commands::enumeration(directory.designations(), out).await,
        Commands::Filter {
            mode,
            blood_groups,
            lobbies,
            designations,
            page,
        } => {
            let selection = FilterSelection {
                blood_groups,
                lobbies,
                designations,
            };
            commands::filter(&directory, mode.into(), selection, page, out).await
        }
        Commands::Analytics { command } => match command {
            AnalyticsCommands::Overview => commands::overview(&directory, out).await,
            AnalyticsCommands::BloodGroups => {
                let distribution = directory.analytics().get_blood_group_distribution().await?;
                commands::distribution("Blood group", &distribution, out)
            }
            AnalyticsCommands::Lobbies => {
                let distribution = directory.analytics().get_lobby_distribution().await?;
                commands::distribution("Lobby", &distribution, out)
            }
            AnalyticsCommands::Designations => {
                let distribution = directory.analytics().get_designation_distribution().await?;
                commands::distribution("Designation", &distribution, out)
            }
            AnalyticsCommands::Growth { days } => commands::growth(&directory, days, out).await,
            AnalyticsCommands::Recent { limit } => commands::recent(&directory, limit, out).await,
            AnalyticsCommands::Visits { increment } => {
                commands::visits(&directory, increment, out).await
            }
            AnalyticsCommands::History { days } => commands::history(&directory, days, out).await,
            AnalyticsCommands::Dashboard => commands::dashboard(&directory, out).await,
        },
        Commands::Documents { query, count } => {
            if count {
                commands::documents_count(&directory, out).await
            } else {
                commands::documents(&directory, query.as_deref(), out).await
            }
        }
        Commands::Interactive => commands::interactive(&directory).await,
        Commands::Version | Commands::Theme { .. } => Ok(()),
    }
}

fn connect(base_url: Option<String>) -> anyhow::Result<Directory> {
    let mut config = ClientConfig::from_env().context("failed to load configuration")?;
    if let Some(base_url) = base_url {
        config.api_base_url = base_url;
    }
    Directory::new(config).context("failed to create directory client")
}
