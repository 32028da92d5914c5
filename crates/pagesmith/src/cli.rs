//! CLI command structure using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pagesmith_core::pages::FamilyKind;

#[derive(Parser)]
#[command(name = "pagesmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Site root (defaults to the current directory)
    #[arg(long, global = true, env = "PAGESMITH_ROOT")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build static pages from data files and templates
    Build {
        /// Family to build; when omitted, the site pages (if site-config.json
        /// exists) and every family with a data directory
        #[arg(value_enum)]
        family: Option<Family>,
    },

    /// Build video scene pages (same as `build scenes`)
    Scenes,

    /// Render a scene page and narration script to a video
    Video {
        /// Scene page (HTML)
        #[arg(long)]
        scene: PathBuf,

        /// Narration script (Markdown)
        #[arg(long)]
        script: PathBuf,

        /// Output video file
        #[arg(long, default_value = "output.mp4")]
        output: PathBuf,

        /// Measure timing only; no recording or encoding
        #[arg(long)]
        dry_run: bool,

        /// Use silent placeholder audio instead of speech synthesis
        #[arg(long)]
        mock_audio: bool,
    },

    /// Assemble a layered SVG from a composition file
    Svg {
        /// Composition (JSON)
        composition: PathBuf,

        /// Output file; printed to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the autoplay schedule of a scene
    Timeline {
        /// Scene data file (JSON)
        scene: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Family {
    /// Pages listed in site-config.json
    Site,
    Annotations,
    Curriculum,
    Homepage,
    Schools,
    Scenes,
}

impl Family {
    /// The record family behind this target; `None` for the site pages
    pub fn kind(self) -> Option<FamilyKind> {
        match self {
            Family::Site => None,
            Family::Annotations => Some(FamilyKind::Annotations),
            Family::Curriculum => Some(FamilyKind::Curriculum),
            Family::Homepage => Some(FamilyKind::Homepage),
            Family::Schools => Some(FamilyKind::Schools),
            Family::Scenes => Some(FamilyKind::Scenes),
        }
    }
}
