use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "procdb",
    version,
    about = "Local processor catalog import and query tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Setup(SetupArgs),
    Import(ImportArgs),
    ImportAll(ImportAllArgs),
    List(ListArgs),
    Show(ShowArgs),
    Tdp(TdpArgs),
    Export(ExportArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SetupArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub csv_path: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_manifest: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ImportAllArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub csv_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_manifest: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    #[arg(long, default_value_t = 100)]
    pub limit: u32,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, conflicts_with = "product")]
    pub id: Option<i64>,

    #[arg(long)]
    pub product: Option<String>,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum TdpFormat {
    Json,
    Text,
    Value,
}

#[derive(Args, Debug, Clone)]
pub struct TdpArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    pub product: String,

    #[arg(long, value_enum, default_value_t = TdpFormat::Text)]
    pub format: TdpFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long, default_value = "processors-data.json")]
    pub json_path: PathBuf,

    #[arg(long, default_value = "processors-import.sql")]
    pub sql_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/procdb")]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}
