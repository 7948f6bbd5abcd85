use super::params::ExecutorParams;
use crate::dcp::{dark_channel, estimate_atmospheric_light, estimate_transmission};
use crate::diagnostics::{elapsed_ms, ImageReport, MapSummary, TimingBreakdown};
use crate::error::{HazeError, Result};
use crate::filters::{box_blur, clamp_min, find_out_of_range};
use crate::haze_model::{create_transmission, HazeModel};
use crate::image::{ImageF64, ImageRgbF64, ImageView, InterleavedImage};
use crate::refine::TransmissionRefiner;
use crate::types::{AtmosphericLight, ProcessingMode, EPS};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Channel of a colour depth map that holds the depth: blue, the first
/// channel in the BGR order depth maps are conventionally stored in.
pub const DEPTH_CHANNEL: usize = 2;

/// Everything the dehazing pipeline computes for one image.
#[derive(Clone, Debug)]
pub struct DehazeOutput {
    pub dark_channel: ImageF64,
    /// Raw transmission, before refinement.
    pub transmission: ImageF64,
    pub refined_transmission: ImageF64,
    pub atmospheric_light: AtmosphericLight,
    /// Haze-free estimate; values may leave `[0, 1]`.
    pub recovered: ImageRgbF64,
    pub timings: TimingBreakdown,
}

impl DehazeOutput {
    /// Share of recovered channel values outside `[0, 1]`.
    pub fn clipped_share(&self) -> f64 {
        let total = self.recovered.data.len() * 3;
        if total == 0 {
            return 0.0;
        }
        let clipped = self
            .recovered
            .data
            .iter()
            .flatten()
            .filter(|v| !(0.0..=1.0).contains(*v))
            .count();
        clipped as f64 / total as f64
    }
}

/// Synthesized hazy image plus the parameters drawn to make it.
#[derive(Clone, Debug)]
pub struct AugmentOutput {
    pub hazy: ImageRgbF64,
    pub beta: f64,
    pub light_level: f64,
    pub atmospheric_light: AtmosphericLight,
    /// Transmission derived from the blurred, floored depth.
    pub transmission: ImageF64,
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug)]
pub enum ProcessOutput {
    Dehazed(DehazeOutput),
    Augmented(AugmentOutput),
}

impl ProcessOutput {
    /// Main product of the run: the recovered or the hazy image.
    pub fn image(&self) -> &ImageRgbF64 {
        match self {
            ProcessOutput::Dehazed(out) => &out.recovered,
            ProcessOutput::Augmented(out) => &out.hazy,
        }
    }

    pub fn timings(&self) -> &TimingBreakdown {
        match self {
            ProcessOutput::Dehazed(out) => &out.timings,
            ProcessOutput::Augmented(out) => &out.timings,
        }
    }

    pub fn report(&self, name: impl Into<String>) -> ImageReport {
        let (w, h) = self.image().size();
        match self {
            ProcessOutput::Dehazed(out) => ImageReport {
                name: name.into(),
                width: w,
                height: h,
                atmospheric_light: out.atmospheric_light,
                transmission: MapSummary::of(&out.refined_transmission),
                beta: None,
                clipped_share: Some(out.clipped_share()),
                timings: out.timings.clone(),
            },
            ProcessOutput::Augmented(out) => ImageReport {
                name: name.into(),
                width: w,
                height: h,
                atmospheric_light: out.atmospheric_light,
                transmission: MapSummary::of(&out.transmission),
                beta: Some(out.beta),
                clipped_share: None,
                timings: out.timings.clone(),
            },
        }
    }
}

/// Validated inputs of one processing run plus the state it needs.
///
/// Construction performs every input check, so [`Executor::process`] only
/// fails on conditions that depend on the data itself.
pub struct Executor {
    params: ExecutorParams,
    mode: ProcessingMode,
    image: ImageRgbF64,
    depth_map: Option<ImageRgbF64>,
    seed: u64,
    rng: StdRng,
    refiner: Box<dyn TransmissionRefiner>,
}

impl Executor {
    /// Takes the hazy (or clean) image first and, in augmenting mode, the
    /// depth map second. Extra images are ignored.
    pub fn new(images: Vec<ImageRgbF64>, mode: ProcessingMode, params: ExecutorParams) -> Result<Self> {
        params.validate()?;
        let required = mode.required_images();
        if images.len() < required {
            return Err(HazeError::invalid(format!(
                "Executor::new: incorrect number of images for {mode} (got {}, need {required})",
                images.len()
            )));
        }
        let mut images = images.into_iter().take(required);
        let image = images
            .next()
            .ok_or_else(|| HazeError::invalid("Executor::new: incorrect number of images"))?;
        let depth_map = images.next();

        if image.is_empty() {
            return Err(HazeError::invalid("Executor::new: image has incorrect size (empty)"));
        }
        if let Some(depth) = &depth_map {
            if !depth.same_size(&image) {
                return Err(HazeError::invalid(format!(
                    "Executor::new: images have incorrect size ({}x{} vs {}x{})",
                    image.w, image.h, depth.w, depth.h
                )));
            }
        }
        for (i, img) in std::iter::once(&image).chain(depth_map.as_ref()).enumerate() {
            if let Some((x, y, v)) = find_out_of_range(img, -EPS, 1.0 + EPS) {
                return Err(HazeError::invalid(format!(
                    "Executor::new: image {i} has values out of range [0, 1] ({v} at ({x}, {y}))"
                )));
            }
        }

        let seed = params.seed.unwrap_or_else(|| rand::rng().random());
        let refiner = params
            .refiner
            .build(params.refine_patch_size, params.refine_eps);
        debug!(
            "Executor::new mode={} size={}x{} seed={} refiner={}",
            mode,
            image.w,
            image.h,
            seed,
            refiner.name()
        );
        Ok(Self {
            params,
            mode,
            image,
            depth_map,
            seed,
            rng: StdRng::seed_from_u64(seed),
            refiner,
        })
    }

    pub fn with_default_params(images: Vec<ImageRgbF64>, mode: ProcessingMode) -> Result<Self> {
        Self::new(images, mode, ExecutorParams::default())
    }

    /// Build from decoder buffers whose channel layout has not been checked.
    pub fn from_interleaved(
        images: Vec<InterleavedImage>,
        mode: ProcessingMode,
        params: ExecutorParams,
    ) -> Result<Self> {
        let images = images
            .into_iter()
            .map(InterleavedImage::into_rgb)
            .collect::<Result<Vec<_>>>()?;
        Self::new(images, mode, params)
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn params(&self) -> &ExecutorParams {
        &self.params
    }

    /// Seed of the random source, whether given or drawn.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the pipeline selected at construction.
    pub fn process(&mut self) -> Result<ProcessOutput> {
        match self.mode {
            ProcessingMode::Dehazing => self.dehaze().map(ProcessOutput::Dehazed),
            ProcessingMode::Augmenting => self.augment().map(ProcessOutput::Augmented),
        }
    }

    fn check_mode(&self, op: &str, expected: ProcessingMode) -> Result<()> {
        if self.mode != expected {
            return Err(HazeError::invalid(format!(
                "Executor::{op}: executor was built for {} mode",
                self.mode
            )));
        }
        Ok(())
    }

    /// Dark channel → atmospheric light → transmission → refinement →
    /// inverse haze model.
    pub fn dehaze(&self) -> Result<DehazeOutput> {
        self.check_mode("dehaze", ProcessingMode::Dehazing)?;
        let p = &self.params;
        let image = &self.image;
        let start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let dark = timings.measure("dark_channel", || dark_channel(image, p.patch_size))?;
        let light = timings.measure("atmospheric_light", || {
            estimate_atmospheric_light(image, p.patch_size, p.brightest_share)
        })?;
        let transmission = timings.measure("transmission", || {
            estimate_transmission(image, &light, p.patch_size, p.omega)
        })?;
        let refined = timings.measure("refine", || self.refiner.refine(&transmission, image))?;
        let recovered = timings.measure("recover", || -> Result<ImageRgbF64> {
            HazeModel::new(&refined, light, p.t0)?.recover(image)
        })?;
        timings.total_ms = elapsed_ms(start);

        let out = DehazeOutput {
            dark_channel: dark,
            transmission,
            refined_transmission: refined,
            atmospheric_light: light,
            recovered,
            timings,
        };
        let clipped = out.clipped_share();
        if clipped > 0.0 {
            warn!(
                "dehaze: {:.2}% of recovered values fall outside [0, 1] and will saturate on save",
                clipped * 100.0
            );
        }
        debug!(
            "dehaze {}x{} A={:?} total={:.2}ms",
            image.w,
            image.h,
            out.atmospheric_light.channels(),
            out.timings.total_ms
        );
        Ok(out)
    }

    /// Sample β and a grey light level, turn the depth map into
    /// transmission and apply the forward haze model.
    pub fn augment(&mut self) -> Result<AugmentOutput> {
        self.check_mode("augment", ProcessingMode::Augmenting)?;
        let depth_map = self
            .depth_map
            .as_ref()
            .ok_or_else(|| HazeError::runtime("Executor::augment: depth map is missing"))?;
        let p = &self.params;
        let start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let [light_lo, light_hi] = p.light_range;
        let [beta_lo, beta_hi] = p.beta_range;
        let light_level = self.rng.random_range(light_lo..light_hi);
        let beta = self.rng.random_range(beta_lo..beta_hi);
        let atmospheric_light = AtmosphericLight::uniform(light_level);
        debug!("augment: sampled beta={beta:.4} light={light_level:.4}");

        let depth = timings.measure("depth", || -> Result<ImageF64> {
            let raw = depth_map.channel(DEPTH_CHANNEL);
            let blurred = box_blur(&raw, p.depth_blur_size, p.depth_blur_size)?;
            Ok(clamp_min(&blurred, p.min_depth))
        })?;
        let transmission = timings.measure("transmission", || create_transmission(&depth, beta));
        let hazy = timings.measure("augment", || -> Result<ImageRgbF64> {
            HazeModel::new(&transmission, atmospheric_light, p.t0)?.augment(&self.image)
        })?;
        timings.total_ms = elapsed_ms(start);

        Ok(AugmentOutput {
            hazy,
            beta,
            light_level,
            atmospheric_light,
            transmission,
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::RefinerKind;

    fn gradient(w: usize, h: usize) -> ImageRgbF64 {
        ImageRgbF64::from_fn(w, h, |x, y| {
            let v = (x + y) as f64 / (w + h) as f64;
            [v, 0.5 * v + 0.2, 1.0 - v]
        })
    }

    fn small_params() -> ExecutorParams {
        ExecutorParams {
            patch_size: 3,
            refine_patch_size: 5,
            depth_blur_size: 4,
            ..ExecutorParams::default()
        }
        .with_seed(42)
    }

    #[test]
    fn empty_image_list_is_rejected_in_both_modes() {
        for mode in [ProcessingMode::Dehazing, ProcessingMode::Augmenting] {
            let err = Executor::with_default_params(vec![], mode).err().unwrap();
            assert!(err.is_invalid_argument(), "{mode}");
            assert!(err.to_string().contains("incorrect number of images"), "{err}");
        }
    }

    #[test]
    fn rejects_wrong_count_size_and_range() {
        let img = gradient(8, 6);
        let err = Executor::with_default_params(vec![img.clone()], ProcessingMode::Augmenting)
            .err()
            .unwrap();
        assert!(err.to_string().contains("incorrect number of images"));

        let other = gradient(6, 8);
        let err = Executor::with_default_params(vec![img.clone(), other], ProcessingMode::Augmenting)
            .err()
            .unwrap();
        assert!(err.to_string().contains("incorrect size"));

        let mut bright = img.clone();
        bright.set(1, 1, [0.5, 1.2, 0.5]);
        let err = Executor::with_default_params(vec![bright], ProcessingMode::Dehazing)
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("out of range"));

        let err = Executor::with_default_params(vec![ImageRgbF64::new(0, 0)], ProcessingMode::Dehazing)
            .err()
            .unwrap();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn quantisation_noise_at_the_bounds_is_accepted() {
        let img = ImageRgbF64::filled(4, 4, [1.0 + EPS / 2.0, 0.5, -EPS / 2.0]);
        assert!(Executor::with_default_params(vec![img], ProcessingMode::Dehazing).is_ok());
    }

    #[test]
    fn interleaved_inputs_need_three_channels() {
        let gray = InterleavedImage::new(2, 2, 1, vec![0.5; 4]);
        let err = Executor::from_interleaved(vec![gray], ProcessingMode::Dehazing, small_params())
            .err()
            .unwrap();
        assert!(err.to_string().contains("incorrect type"));

        let rgb = InterleavedImage::new(2, 2, 3, vec![0.5; 12]);
        let exec = Executor::from_interleaved(vec![rgb], ProcessingMode::Dehazing, small_params()).unwrap();
        assert_eq!(exec.mode(), ProcessingMode::Dehazing);
    }

    #[test]
    fn dehaze_returns_all_intermediate_maps() {
        let img = gradient(12, 9);
        let exec = Executor::new(vec![img.clone()], ProcessingMode::Dehazing, small_params()).unwrap();
        let out = exec.dehaze().unwrap();
        for map in [&out.dark_channel, &out.transmission, &out.refined_transmission] {
            assert_eq!(map.size(), img.size());
        }
        assert_eq!(out.recovered.size(), img.size());
        assert!(out.recovered.data.iter().flatten().all(|v| v.is_finite()));
        let labels: Vec<_> = out.timings.stages.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["dark_channel", "atmospheric_light", "transmission", "refine", "recover"]);
    }

    #[test]
    fn guided_refiner_is_selectable() {
        let img = gradient(10, 10);
        let params = small_params().with_refiner(RefinerKind::Guided);
        let mut exec = Executor::new(vec![img], ProcessingMode::Dehazing, params).unwrap();
        let out = exec.process().unwrap();
        assert!(matches!(out, ProcessOutput::Dehazed(_)));
    }

    #[test]
    fn augment_samples_within_ranges_and_is_seeded() {
        let scene = gradient(10, 8);
        let depth = ImageRgbF64::from_fn(10, 8, |x, _| [x as f64 / 9.0; 3]);
        let run = |seed| {
            let params = small_params().with_seed(seed);
            Executor::new(vec![scene.clone(), depth.clone()], ProcessingMode::Augmenting, params)
                .unwrap()
                .augment()
                .unwrap()
        };
        let a = run(7);
        let b = run(7);
        assert_eq!(a.beta, b.beta);
        assert_eq!(a.light_level, b.light_level);
        assert_eq!(a.hazy.data, b.hazy.data);
        assert!((1.5..3.0).contains(&a.beta));
        assert!((0.3..0.7).contains(&a.light_level));
        assert_eq!(a.atmospheric_light, AtmosphericLight::uniform(a.light_level));
        // Depth is floored at 0.3, so transmission never exceeds exp(-0.3 β).
        let cap = (-0.3 * a.beta).exp();
        assert!(a.transmission.data.iter().all(|&t| t <= cap + 1e-12));
    }

    #[test]
    fn depth_is_read_from_the_blue_channel() {
        let scene = gradient(6, 6);
        let depth = ImageRgbF64::filled(6, 6, [0.0, 0.5, 1.0]);
        let mut exec =
            Executor::new(vec![scene, depth], ProcessingMode::Augmenting, small_params()).unwrap();
        let out = exec.augment().unwrap();
        let expected = (-out.beta * 1.0).exp();
        assert!(out.transmission.data.iter().all(|&t| (t - expected).abs() < 1e-12));
    }

    #[test]
    fn successive_augments_draw_fresh_parameters() {
        let scene = gradient(6, 6);
        let depth = ImageRgbF64::filled(6, 6, [0.5; 3]);
        let mut exec =
            Executor::new(vec![scene, depth], ProcessingMode::Augmenting, small_params()).unwrap();
        let first = exec.augment().unwrap();
        let second = exec.augment().unwrap();
        assert_ne!(first.beta, second.beta);
    }

    #[test]
    fn mismatched_pipeline_call_is_rejected() {
        let img = gradient(6, 6);
        let mut exec = Executor::new(vec![img.clone()], ProcessingMode::Dehazing, small_params()).unwrap();
        assert!(exec.augment().unwrap_err().is_invalid_argument());

        let exec = Executor::new(vec![img.clone(), img], ProcessingMode::Augmenting, small_params()).unwrap();
        assert!(exec.dehaze().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn report_carries_mode_specific_fields() {
        let img = gradient(6, 6);
        let mut exec = Executor::new(vec![img.clone(), img], ProcessingMode::Augmenting, small_params()).unwrap();
        let report = exec.process().unwrap().report("scene.png");
        assert_eq!(report.name, "scene.png");
        assert!(report.beta.is_some());
        assert!(report.clipped_share.is_none());
        assert_eq!((report.width, report.height), (6, 6));
    }
}
