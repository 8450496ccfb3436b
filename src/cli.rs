use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pdf::Rotation;

#[derive(Parser)]
#[command(name = "repage")]
#[command(about = "Page-oriented PDF toolkit with MCP server support")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server (primary mode)
    Mcp,

    /// Display PDF metadata
    Info {
        /// PDF file to inspect
        path: PathBuf,
    },

    /// Resolve a page selection and show its canonical form
    Pages {
        /// PDF file to inspect
        path: PathBuf,

        /// Page ranges (e.g., "1-5,10"), one-based
        pages: String,

        /// Toggle a single page in or out of the selection (repeatable)
        #[arg(long = "toggle", value_name = "PAGE")]
        toggles: Vec<u32>,
    },

    /// Extract the selected pages to a new PDF
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page ranges (e.g., "1-5,10")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Remove the selected pages, keeping the rest
    Remove {
        /// PDF file to remove pages from
        path: PathBuf,

        /// Page ranges to remove (e.g., "2,7-9")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split PDF into individual pages
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Only split out these pages (default: all)
        #[arg(short, long)]
        pages: Option<String>,
    },

    /// Rearrange pages into a new order
    Reorder {
        /// PDF file to rearrange
        path: PathBuf,

        /// Explicit output order (e.g., "3,1,2"); every page exactly once
        order: Option<String>,

        /// Move a page between positions, as "FROM:TO" (repeatable)
        #[arg(long = "move", value_name = "FROM:TO")]
        moves: Vec<String>,

        /// Reverse the final order
        #[arg(long)]
        reverse: bool,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Rotate the selected pages clockwise
    Rotate {
        /// PDF file to rotate pages of
        path: PathBuf,

        /// Page ranges to rotate (e.g., "1,4-6")
        pages: String,

        /// Degrees: 90, 180, or 270
        #[arg(long)]
        by: Rotation,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Combine PDFs (files or directories of PDFs) into one
    Merge {
        /// PDF files or directories to merge
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}
