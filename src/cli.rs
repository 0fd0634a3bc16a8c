use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::PageRange;

pub const DEFAULT_DOC_TITLE: &str = "USB Power Delivery Specification Rev 3.2 V1.1";

#[derive(Parser, Debug)]
#[command(
    name = "usbpd",
    version,
    about = "Structural extraction of the USB Power Delivery specification PDF"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Parse(ParseArgs),
    Toc(TocArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[arg(long)]
    pub pdf_path: PathBuf,

    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_DOC_TITLE)]
    pub doc_title: String,

    /// Physical pages holding the table of contents, e.g. `13-18`.
    #[arg(long)]
    pub toc_pages: Option<PageRange>,

    /// Physical pages holding the list of tables, e.g. `19-24`.
    #[arg(long)]
    pub lot_pages: Option<PageRange>,

    /// Physical page number minus printed page number.
    #[arg(long, allow_negative_numbers = true)]
    pub page_offset: Option<i64>,

    #[arg(long, value_enum, default_value_t = TocSource::Pages)]
    pub toc_source: TocSource,

    #[arg(long, value_enum, default_value_t = SharedPagePolicy::LastEntryWins)]
    pub shared_page_policy: SharedPagePolicy,
}

#[derive(Args, Debug, Clone)]
pub struct TocArgs {
    #[arg(long)]
    pub pdf_path: PathBuf,

    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,

    #[arg(long)]
    pub toc_pages: Option<PageRange>,

    #[arg(long, allow_negative_numbers = true)]
    pub page_offset: Option<i64>,

    #[arg(long, value_enum, default_value_t = TocSource::Pages)]
    pub toc_source: TocSource,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "out")]
    pub output_dir: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum TocSource {
    Pages,
    Outline,
    Auto,
}

impl TocSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Outline => "outline",
            Self::Auto => "auto",
        }
    }
}

/// How text on a page shared by several section starts is divided.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SharedPagePolicy {
    LastEntryWins,
    SplitAtHeadings,
}

impl SharedPagePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LastEntryWins => "last-entry-wins",
            Self::SplitAtHeadings => "split-at-headings",
        }
    }
}
