use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Query and manage Docker Hub repositories")]
pub struct Cli {
    /// YAML config file with `apiUrl` and `credentials`
    #[arg(short, long, env = "SONAR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work with the tags of an image
    #[command(subcommand)]
    Tags(TagsCommand),
    /// Read repository information
    #[command(subcommand)]
    Get(GetCommand),
    /// Change repository information
    #[command(subcommand)]
    Set(SetCommand),
    /// Work with the repositories of a namespace
    #[command(subcommand)]
    Images(ImagesCommand),
}

#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    /// Displays tags for a given Docker image name
    List {
        #[arg(value_name = "IMAGE-NAME")]
        image: String,
        /// Output the storage size of tags
        #[arg(long)]
        sum_size: bool,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Checks that a tag exists for an image
    Check {
        #[arg(value_name = "IMAGE-NAME")]
        image: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GetCommand {
    /// Number of pulls of an image
    Pulls {
        #[arg(value_name = "IMAGE-NAME")]
        image: String,
    },
    /// Number of stars of an image
    Stars {
        #[arg(value_name = "IMAGE-NAME")]
        image: String,
    },
    /// Summary (short description) of an image
    Summary {
        #[arg(value_name = "IMAGE-NAME")]
        image: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SetCommand {
    /// Set the summary for an image on Docker Hub
    #[command(long_about = "Set the summary for an image on Docker Hub.\n\nLimited to 100 characters.")]
    Summary {
        #[arg(value_name = "IMAGE-NAME")]
        image: String,
        #[arg(value_name = "SUMMARY-STRING")]
        summary: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImagesCommand {
    /// Lists the repositories of a namespace
    List { namespace: String },
}

/// Date filtering flags shared by listing commands.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Field to filter on
    #[arg(long, value_enum)]
    pub field: Option<FilterField>,
    /// Keep items older than this age, e.g. 30d, 2w, 1d12h
    #[arg(long, value_name = "AGE")]
    pub gt: Option<String>,
    /// Keep items newer than this age
    #[arg(long, value_name = "AGE")]
    pub lt: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Date,
}
