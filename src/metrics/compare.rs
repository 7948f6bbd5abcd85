use super::{mse, ssim};
use crate::batch::list_dir;
use crate::error::{HazeError, Result, ResultExt};
use crate::image::io::load_rgb_image;
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageComparison {
    pub name: String,
    pub ssim: f64,
    pub mse: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub images: Vec<ImageComparison>,
    pub mean_ssim: f64,
    pub mean_mse: f64,
}

/// Dark-channel and transmission maps written next to dehazed images.
fn is_intermediate(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    stem.ends_with("_dc") || stem.ends_with("_tr")
}

fn by_name(paths: Vec<PathBuf>) -> Vec<(String, PathBuf)> {
    paths
        .into_iter()
        .filter_map(|p| {
            let name = p.file_name()?.to_string_lossy().into_owned();
            Some((name, p))
        })
        .filter(|(name, _)| !is_intermediate(name))
        .collect()
}

fn score(name: &str, result: &Path, reference: &Path) -> Result<ImageComparison> {
    let lhs = load_rgb_image(result)?;
    let rhs = load_rgb_image(reference)?;
    Ok(ImageComparison {
        name: name.to_string(),
        ssim: ssim(&lhs, &rhs)?,
        mse: mse(&lhs, &rhs)?,
    })
}

/// Score every image of `results_dir` against the equally named image of
/// `reference_dir`.
///
/// `_dc` / `_tr` maps are skipped on both sides. Every remaining result needs
/// a reference; extra references are ignored.
pub fn compare(results_dir: &Path, reference_dir: &Path) -> Result<ComparisonReport> {
    let results = by_name(list_dir(results_dir).context("compare: cannot list results")?);
    let references: HashMap<String, PathBuf> =
        by_name(list_dir(reference_dir).context("compare: cannot list references")?)
            .into_iter()
            .collect();
    if results.is_empty() {
        return Err(HazeError::runtime(format!(
            "compare: no images in {}",
            results_dir.display()
        )));
    }

    let mut images = Vec::with_capacity(results.len());
    for (name, path) in results {
        let reference = references.get(&name).ok_or_else(|| {
            HazeError::runtime(format!(
                "compare: no reference for {name} in {}",
                reference_dir.display()
            ))
        })?;
        let scored = score(&name, &path, reference)
            .with_context(|| format!("compare: cannot score {name}"))?;
        info!("{}: ssim {:.4} mse {:.6}", scored.name, scored.ssim, scored.mse);
        images.push(scored);
    }

    let n = images.len() as f64;
    let mean_ssim = images.iter().map(|c| c.ssim).sum::<f64>() / n;
    let mean_mse = images.iter().map(|c| c.mse).sum::<f64>() / n;
    Ok(ComparisonReport {
        images,
        mean_ssim,
        mean_mse,
    })
}
