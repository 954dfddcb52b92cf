//! Writes the chart registry to a directory of PNG files.

use crate::charts::{ChartSpec, CHARTS};
use crate::raster::Rasterizer;
use log::{debug, info};
use nexpro_core::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One PNG written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct ChartArtifact {
    pub name: String,
    pub file_name: String,
    pub path: PathBuf,
    pub width_px: u32,
    pub height_px: u32,
    pub bytes: usize,
}

/// Renders charts into `out_dir`, creating it if needed.
pub struct ChartGenerator {
    out_dir: PathBuf,
    rasterizer: Rasterizer,
}

impl ChartGenerator {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        Ok(Self {
            out_dir,
            rasterizer: Rasterizer::new(),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    /// Build, render and save a single chart.
    pub fn generate(&self, spec: &ChartSpec) -> Result<ChartArtifact> {
        debug!("Building chart {}", spec.name);
        let figure = (spec.build)();
        let (width_px, height_px) = figure.pixel_size(self.rasterizer.dpi());
        let png = self.rasterizer.render(&figure)?;

        let path = self.out_dir.join(spec.file_name);
        fs::write(&path, &png)?;
        info!("Saved {} ({} bytes)", path.display(), png.len());

        Ok(ChartArtifact {
            name: spec.name.to_string(),
            file_name: spec.file_name.to_string(),
            path,
            width_px,
            height_px,
            bytes: png.len(),
        })
    }

    /// Every registered chart, in order. Stops at the first failure.
    pub fn generate_all(&self) -> Result<Vec<ChartArtifact>> {
        CHARTS.iter().map(|spec| self.generate(spec)).collect()
    }
}
