//! The two default workload generators, matching the trimodal Gaussian
//! mixtures hard-coded in `main()` of the original
//! `generate_multiqueue_data.cc`. They stand in for a real storage
//! working set: a few hot regions atop a uniform background of cold
//! blocks.

use smq_sampler::{constant_pdf, gaussian_pdf};

/// The primary workload: hot spots around 10%, 50% and 80% through the
/// address range, with a small constant background.
pub fn gen1(alpha: f64) -> f64 {
    gaussian_pdf(0.5, 0.02, alpha)
        + gaussian_pdf(0.1, 0.05, alpha)
        + gaussian_pdf(0.8, 0.1, alpha)
        + 0.01 * constant_pdf(alpha)
}

/// A second workload with different hot-spot weighting, used to
/// simulate a workload shift in the PDF-switching experiments.
pub fn gen2(alpha: f64) -> f64 {
    0.3 * gaussian_pdf(0.6, 0.02, alpha)
        + gaussian_pdf(0.3, 0.05, alpha)
        + 0.1 * gaussian_pdf(0.8, 0.1, alpha)
        + 0.01 * constant_pdf(alpha)
}
