use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deckview")]
#[command(author, version, about)]
#[command(long_about = "A slide-deck viewer with a synchronized presenter view.\n\n\
    The deck is rendered by an external renderer (see `renderer.command`) or\n\
    shown as plain source when none is configured. Renderer JSON (`.json`)\n\
    is displayed as-is.\n\n\
    Examples:\n  \
    deckview talk.md                 Show the deck (fullscreen)\n  \
    deckview talk.md#4 --windowed    Open slide 4 in a window\n  \
    deckview talk.md --presenter     Also open the presenter view\n  \
    deckview notes talk.md           Print the speaker notes")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck to show. `FILE#N` opens slide N
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Start in grid overview mode
    #[arg(long, global = false)]
    pub overview: bool,

    /// Open the presenter view alongside the audience view
    #[arg(long, global = false)]
    pub presenter: bool,

    /// Re-render the deck whenever the file changes
    #[arg(long, global = false)]
    pub watch: bool,

    /// Keep the presenter view unlinked from the audience view
    #[arg(long, global = false)]
    pub no_sync: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the speaker notes of a deck, one block per slide
    Notes {
        /// Deck file
        file: PathBuf,

        /// Print the notes as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Render a deck and print the renderer JSON
    Render {
        /// Deck file
        file: PathBuf,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, viewer.edge_zone_percent, renderer.command)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Default log filter for the verbosity flags. `RUST_LOG` wins over it.
pub fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Notes { file, json }) => crate::commands::notes::run(&file, json),
            Some(Commands::Render { file }) => crate::commands::render::run(&file),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::banner::print_banner_with_version();
                Ok(())
            }
            None => {
                if let Some(target) = self.file {
                    let (path, fragment) = crate::nav::split_deep_link(&target);
                    let file = PathBuf::from(path);
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    crate::app::run(crate::app::LaunchOptions {
                        file,
                        fragment: fragment.map(String::from),
                        windowed: self.windowed,
                        slide: self.slide,
                        overview: self.overview,
                        presenter: self.presenter,
                        watch: self.watch,
                        sync: !self.no_sync,
                    })
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}
