use std::path::PathBuf;

use clap::Parser;
use cone_viewer_core::state::FilterMode;

/// Browse cone mosaics in the terminal, or render them to files with
/// --svg-dir / --csv-dir.
#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(name = "cone-viewer", version)]
pub struct Args {
    /// TOML client configuration
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subject to open (e.g. S042 or S042R)
    #[arg(long, value_name = "ID")]
    pub subject: Option<String>,

    /// Temporal, Nasal, Superior or Inferior
    #[arg(long, value_name = "NAME")]
    pub meridian: Option<String>,

    /// Comma-separated cone types
    #[arg(
        long = "types",
        value_name = "L,M,S",
        value_delimiter = ',',
        value_parser = cone_type
    )]
    pub cone_types: Option<Vec<String>>,

    /// Lower eccentricity bound in degrees (single plot only)
    #[arg(long = "min", value_name = "DEG", value_parser = degrees)]
    pub eccentricity_min: Option<f64>,

    /// Upper eccentricity bound in degrees (single plot only)
    #[arg(long = "max", value_name = "DEG", value_parser = degrees)]
    pub eccentricity_max: Option<f64>,

    /// One sub-plot per eccentricity range
    #[arg(long, default_value_t = false)]
    pub by_range: bool,

    /// Write plots as SVG into DIR and exit
    #[arg(long, value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,

    /// Write the CSV export into DIR and exit
    #[arg(long, value_name = "DIR")]
    pub csv_dir: Option<PathBuf>,

    /// Dark SVG theme
    #[arg(long, default_value_t = false)]
    pub dark: bool,
}

impl Args {
    /// Batch runs write files and exit instead of opening the viewer.
    pub fn is_batch(&self) -> bool {
        self.svg_dir.is_some() || self.csv_dir.is_some()
    }

    pub fn mode(&self) -> FilterMode {
        if self.by_range {
            FilterMode::MultiRange
        } else {
            FilterMode::Single
        }
    }
}

fn cone_type(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("empty cone type".to_string());
    }
    Ok(value.to_string())
}

fn degrees(value: &str) -> Result<f64, String> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid eccentricity {value:?}"))
}
