//! Colour-guided filter (He, Sun, Tang).
//!
//! For every window `ω_k` the transmission `p` is modelled as `q = a_kᵀ I + b_k`
//! with
//!
//! ```text
//! a_k = (Σ_k + ε U)⁻¹ · cov_k(I, p)
//! b_k = mean_k(p) − a_kᵀ · mean_k(I)
//! ```
//!
//! where `Σ_k` is the 3×3 colour covariance of the guide in the window. The
//! output averages the coefficients of all windows covering a pixel:
//! `q_i = mean(a)_iᵀ I_i + mean(b)_i`. Every mean is a box filter, so the cost
//! is independent of the window size.
use super::{check_inputs, TransmissionRefiner};
use crate::error::Result;
use crate::filters::box_blur;
use crate::image::{ImageF64, ImageRgbF64};
use log::debug;
use nalgebra::{Matrix3, Vector3};

#[derive(Clone, Copy, Debug)]
pub struct GuidedFilterRefiner {
    pub patch_size: usize,
    /// Regularisation; larger values smooth more and follow edges less.
    pub eps: f64,
}

impl GuidedFilterRefiner {
    pub fn new(patch_size: usize, eps: f64) -> Self {
        Self { patch_size, eps }
    }
}

fn product(a: &ImageF64, b: &ImageF64) -> ImageF64 {
    ImageF64 {
        w: a.w,
        h: a.h,
        data: a.data.iter().zip(&b.data).map(|(x, y)| x * y).collect(),
    }
}

impl TransmissionRefiner for GuidedFilterRefiner {
    fn refine(&self, transmission: &ImageF64, guide: &ImageRgbF64) -> Result<ImageF64> {
        check_inputs("GuidedFilterRefiner::refine", transmission, guide, self.patch_size)?;
        debug!(
            "GuidedFilterRefiner::refine {}x{} patch={} eps={}",
            transmission.w, transmission.h, self.patch_size, self.eps
        );
        let k = self.patch_size;
        let mean = |img: &ImageF64| box_blur(img, k, k);

        let chan = [guide.channel(0), guide.channel(1), guide.channel(2)];
        let mean_i = [mean(&chan[0])?, mean(&chan[1])?, mean(&chan[2])?];
        let mean_p = mean(transmission)?;
        let mut cov_ip = Vec::with_capacity(3);
        for c in 0..3 {
            cov_ip.push(mean(&product(&chan[c], transmission))?);
        }
        // Upper triangle of the colour covariance: rr, rg, rb, gg, gb, bb.
        const PAIRS: [(usize, usize); 6] = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)];
        let mut corr = Vec::with_capacity(6);
        for (i, j) in PAIRS {
            corr.push(mean(&product(&chan[i], &chan[j]))?);
        }

        let n = transmission.data.len();
        let mut a: [ImageF64; 3] = std::array::from_fn(|_| ImageF64::new(guide.w, guide.h));
        let mut b = ImageF64::new(guide.w, guide.h);
        for idx in 0..n {
            let mu = Vector3::new(mean_i[0].data[idx], mean_i[1].data[idx], mean_i[2].data[idx]);
            let mp = mean_p.data[idx];
            let cov = Vector3::new(
                cov_ip[0].data[idx] - mu[0] * mp,
                cov_ip[1].data[idx] - mu[1] * mp,
                cov_ip[2].data[idx] - mu[2] * mp,
            );
            let var = |p: usize| {
                let (i, j) = PAIRS[p];
                corr[p].data[idx] - mu[i] * mu[j]
            };
            #[rustfmt::skip]
            let sigma = Matrix3::new(
                var(0) + self.eps, var(1), var(2),
                var(1), var(3) + self.eps, var(4),
                var(2), var(4), var(5) + self.eps,
            );
            let coeff = sigma
                .try_inverse()
                .map(|inv| inv * cov)
                .unwrap_or_else(Vector3::zeros);
            for c in 0..3 {
                a[c].data[idx] = coeff[c];
            }
            b.data[idx] = mp - coeff.dot(&mu);
        }

        let mean_a = [mean(&a[0])?, mean(&a[1])?, mean(&a[2])?];
        let mean_b = mean(&b)?;
        let data = guide
            .data
            .iter()
            .enumerate()
            .map(|(idx, px)| {
                mean_a[0].data[idx] * px[0]
                    + mean_a[1].data[idx] * px[1]
                    + mean_a[2].data[idx] * px[2]
                    + mean_b.data[idx]
            })
            .collect();
        Ok(ImageF64 {
            w: transmission.w,
            h: transmission.h,
            data,
        })
    }

    fn name(&self) -> &'static str {
        "guided"
    }
}
