use std::collections::{HashMap, HashSet};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cli::{ParseArgs, SharedPagePolicy, TocSource};
use crate::model::{
    DocumentMetadata, Mismatch, MismatchKind, PageRange, SectionRecord, TocEntry,
    ValidationReport, ValidationSummary,
};
use crate::util::{ensure_directory, now_utc_string, sha256_file, write_json_pretty, write_jsonl};

mod page_extract;
mod records;
mod report;
mod report_workbook;
mod run;
mod sections;
mod tables;
mod text_source;
mod toc;

pub use run::run;
pub(crate) use records::{METADATA_FILE, OutputPaths, REPORT_JSON_FILE, write_toc_records};
pub(crate) use run::prepare_toc;
pub(crate) use text_source::{PdfDocument, TextSource};

use page_extract::*;
use records::*;
use report::*;
use report_workbook::*;
use sections::*;
use tables::*;
use text_source::*;
use toc::*;
