mod common;

use common::synthetic_image::{
    depth_ramp, hazy_landscape, landscape, mean_abs_diff, GROUND_TRANSMISSION, LANDSCAPE_LIGHT,
};
use haze_machine::image::{ImageRgbF64, InterleavedImage};
use haze_machine::{Executor, ExecutorParams, ProcessOutput, ProcessingMode};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn dehazing_landscape_recovers_light_and_ground() {
    init_logs();
    let (w, h, horizon) = (96usize, 96usize, 32usize);
    let hazy = hazy_landscape(w, h, horizon);
    let scene = landscape(w, h, horizon);

    let mut exec = Executor::with_default_params(vec![hazy.clone()], ProcessingMode::Dehazing).unwrap();
    let out = match exec.process().unwrap() {
        ProcessOutput::Dehazed(out) => out,
        other => panic!("expected dehazing output, got {other:?}"),
    };

    let a = out.atmospheric_light.channels();
    for c in 0..3 {
        assert!(
            (a[c] - LANDSCAPE_LIGHT[c]).abs() < 0.02,
            "atmospheric light {a:?} too far from {LANDSCAPE_LIGHT:?}"
        );
    }

    // Below the dark-channel window of the horizon the raw estimate sees
    // only ground pixels.
    for y in horizon + 8..h {
        for x in 0..w {
            let t = out.transmission.get(x, y);
            assert!((t - GROUND_TRANSMISSION).abs() < 0.02, "t({x}, {y}) = {t}");
        }
    }

    let rows = 70..h;
    let recovered_err = mean_abs_diff(&out.recovered, &scene, rows.clone());
    let hazy_err = mean_abs_diff(&hazy, &scene, rows);
    assert!(recovered_err < 0.03, "recovered error {recovered_err:.4}");
    assert!(
        recovered_err * 4.0 < hazy_err,
        "dehazing did not help: {recovered_err:.4} vs {hazy_err:.4}"
    );
}

#[test]
fn augmenting_constant_depth_follows_forward_model() {
    let (w, h) = (40usize, 30usize);
    let scene = landscape(w, h, 10);
    let depth = ImageRgbF64::filled(w, h, [0.8; 3]);
    let params = ExecutorParams::default().with_seed(11);
    let mut exec = Executor::new(vec![scene.clone(), depth], ProcessingMode::Augmenting, params).unwrap();
    let out = exec.augment().unwrap();

    let t = (-out.beta * 0.8).exp();
    let l = out.light_level;
    for (hazy, clean) in out.hazy.data.iter().zip(&scene.data) {
        for c in 0..3 {
            let expected = t * clean[c] + (1.0 - t) * l;
            assert!((hazy[c] - expected).abs() < 1e-9, "{} vs {expected}", hazy[c]);
        }
    }
}

#[test]
fn shallow_depth_is_floored() {
    let scene = landscape(20, 20, 5);
    let depth = ImageRgbF64::new(20, 20);
    let params = ExecutorParams::default().with_seed(3);
    let mut exec = Executor::new(vec![scene, depth], ProcessingMode::Augmenting, params).unwrap();
    let out = exec.augment().unwrap();
    let expected = (-0.3 * out.beta).exp();
    assert!(out
        .transmission
        .data
        .iter()
        .all(|&t| (t - expected).abs() < 1e-15));
}

#[test]
fn distant_regions_receive_more_haze() {
    let (w, h) = (48usize, 64usize);
    let scene = landscape(w, h, 1);
    let mut exec = Executor::new(
        vec![scene, depth_ramp(w, h)],
        ProcessingMode::Augmenting,
        ExecutorParams::default().with_seed(99),
    )
    .unwrap();
    let out = exec.augment().unwrap();
    let row_mean = |y: usize| (0..w).map(|x| out.transmission.get(x, y)).sum::<f64>() / w as f64;
    assert!(row_mean(0) < row_mean(h / 2));
    assert!(row_mean(h / 2) < row_mean(h - 1));
    assert!(out.transmission.data.iter().all(|&t| t > 0.0 && t < 1.0));
}

#[test]
fn augmentation_is_reproducible_per_seed() {
    let (w, h) = (32usize, 24usize);
    let run = |seed: u64| {
        let mut exec = Executor::new(
            vec![landscape(w, h, 8), depth_ramp(w, h)],
            ProcessingMode::Augmenting,
            ExecutorParams::default().with_seed(seed),
        )
        .unwrap();
        exec.augment().unwrap()
    };
    let (a, b, c) = (run(1), run(1), run(2));
    assert_eq!(a.hazy.data, b.hazy.data);
    assert_eq!((a.beta, a.light_level), (b.beta, b.light_level));
    assert_ne!((a.beta, a.light_level), (c.beta, c.light_level));
}

#[test]
fn executor_reports_each_contract_violation() {
    let img = landscape(16, 16, 4);

    let err = Executor::with_default_params(vec![], ProcessingMode::Dehazing)
        .err()
        .unwrap();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("incorrect number of images"));

    let err = Executor::with_default_params(vec![img.clone()], ProcessingMode::Augmenting)
        .err()
        .unwrap();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("incorrect number of images"));

    let err = Executor::with_default_params(
        vec![img.clone(), landscape(16, 17, 4)],
        ProcessingMode::Augmenting,
    )
    .err()
    .unwrap();
    assert!(err.to_string().contains("incorrect size"));

    let mut overexposed = img.clone();
    overexposed.set(3, 3, [1.01, 0.5, 0.5]);
    let err = Executor::with_default_params(vec![overexposed], ProcessingMode::Dehazing)
        .err()
        .unwrap();
    assert!(err.to_string().contains("out of range"));

    let rgba = InterleavedImage::new(2, 2, 4, vec![0.5; 16]);
    let err = Executor::from_interleaved(vec![rgba], ProcessingMode::Dehazing, ExecutorParams::default())
        .err()
        .unwrap();
    assert!(err.to_string().contains("incorrect type"));
}
