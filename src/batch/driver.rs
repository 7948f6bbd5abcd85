use super::dir::{ensure_empty_dir, list_dir, output_names};
use crate::diagnostics::{elapsed_ms, BatchReport, ImageReport};
use crate::error::{HazeError, Result, ResultExt};
use crate::executor::{Executor, ExecutorParams, ProcessOutput};
use crate::image::io::{load_rgb_image, save_gray_image, save_rgb_image};
use crate::types::ProcessingMode;
use log::info;
use rand::Rng;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    pub params: ExecutorParams,
    /// Process pairs on the rayon pool.
    pub parallel: bool,
    /// Base seed; pair `i` uses `seed + i`. Falls back to `params.seed`,
    /// then to a random value.
    pub seed: Option<u64>,
}

/// One unit of work: the image, the optional depth map, the output name.
struct Job {
    index: usize,
    name: String,
    image: PathBuf,
    depth: Option<PathBuf>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn plan_jobs(inputs: &[PathBuf]) -> Result<(ProcessingMode, Vec<Job>)> {
    let mode = match inputs.len() {
        1 => ProcessingMode::Dehazing,
        2 => ProcessingMode::Augmenting,
        n => {
            return Err(HazeError::invalid(format!(
                "produce: expected one or two input directories, got {n}"
            )))
        }
    };
    let images = list_dir(&inputs[0]).context("produce: cannot load content of input dirs")?;
    let depths = match inputs.get(1) {
        Some(dir) => Some(list_dir(dir).context("produce: cannot load content of input dirs")?),
        None => None,
    };

    if let Some(depths) = &depths {
        if depths.len() != images.len() {
            return Err(HazeError::runtime(format!(
                "produce: input dirs have different numbers of files ({} vs {})",
                images.len(),
                depths.len()
            )));
        }
        for (image, depth) in images.iter().zip(depths) {
            let (a, b) = (file_name(image), file_name(depth));
            if a != b {
                return Err(HazeError::runtime(format!(
                    "produce: files must have equal names ({a} vs {b})"
                )));
            }
        }
    }

    let jobs = images
        .into_iter()
        .enumerate()
        .map(|(index, image)| Job {
            index,
            name: file_name(&image),
            depth: depths.as_ref().map(|d| d[index].clone()),
            image,
        })
        .collect();
    Ok((mode, jobs))
}

fn run_job(job: &Job, mode: ProcessingMode, params: &ExecutorParams) -> Result<ProcessOutput> {
    let start = Instant::now();
    let mut images = vec![load_rgb_image(&job.image)?];
    if let Some(depth) = &job.depth {
        images.push(load_rgb_image(depth)?);
    }
    let mut executor = Executor::new(images, mode, params.clone())?;
    let output = executor.process()?;
    info!(
        "[{}] {} processed in {:.1} ms",
        job.index + 1,
        job.name,
        elapsed_ms(start)
    );
    Ok(output)
}

fn write_job(job: &Job, output: &ProcessOutput, output_dir: &Path) -> Result<ImageReport> {
    let names = output_names(&job.name);
    save_rgb_image(output.image(), &output_dir.join(&names.image))?;
    if let ProcessOutput::Dehazed(out) = output {
        save_gray_image(&out.dark_channel, &output_dir.join(&names.dark_channel))?;
        save_gray_image(&out.transmission, &output_dir.join(&names.transmission))?;
    }
    Ok(output.report(job.name.clone()))
}

/// Dehaze (one input directory) or augment (two) every image into
/// `output_dir`, which must exist and be empty.
///
/// The first failing image aborts the batch. Sequential runs write each image
/// as soon as it is processed, so earlier outputs stay on disk; parallel runs
/// hold every result in memory and write nothing if any image fails.
pub fn produce(inputs: &[PathBuf], output_dir: &Path, options: &BatchOptions) -> Result<BatchReport> {
    let start = Instant::now();
    options.params.validate()?;
    let (mode, jobs) = plan_jobs(inputs)?;
    ensure_empty_dir(output_dir).context("produce: incorrect result dir")?;

    let seed = options
        .seed
        .or(options.params.seed)
        .unwrap_or_else(|| rand::rng().random());
    info!(
        "produce: {} {} image(s) into {} (seed {seed}, parallel {})",
        mode,
        jobs.len(),
        output_dir.display(),
        options.parallel
    );

    let process = |job: &Job| -> Result<ProcessOutput> {
        let params = options
            .params
            .clone()
            .with_seed(seed.wrapping_add(job.index as u64));
        run_job(job, mode, &params)
            .with_context(|| format!("cannot process {}", job.image.display()))
    };
    let write = |job: &Job, output: &ProcessOutput| -> Result<ImageReport> {
        write_job(job, output, output_dir)
            .with_context(|| format!("cannot write results of {}", job.image.display()))
    };

    let results = if options.parallel {
        // Nothing is written unless every image was processed.
        jobs.par_iter()
            .map(process)
            .collect::<Result<Vec<_>>>()
            .and_then(|outputs| {
                jobs.iter()
                    .zip(&outputs)
                    .map(|(job, output)| write(job, output))
                    .collect::<Result<Vec<_>>>()
            })
    } else {
        jobs.iter()
            .map(|job| process(job).and_then(|output| write(job, &output)))
            .collect::<Result<Vec<_>>>()
    };
    let images = results.with_context(|| format!("produce: cannot {} images", verb(mode)))?;

    Ok(BatchReport {
        mode,
        seed,
        total_ms: elapsed_ms(start),
        images,
    })
}

fn verb(mode: ProcessingMode) -> &'static str {
    match mode {
        ProcessingMode::Dehazing => "dehaze",
        ProcessingMode::Augmenting => "augment",
    }
}
