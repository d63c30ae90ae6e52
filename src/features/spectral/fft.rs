//! In-place radix-2 Cooley-Tukey FFT over split real/imaginary arrays

use crate::error::AnalysisError;

/// Forward FFT, in place
///
/// `re` and `im` must have the same length, a power of two. Lengths 0 and 1
/// are rejected along with every other non-power-of-two size so that callers
/// never get a silently truncated transform.
///
/// # Example
///
/// ```
/// use tonescribe::features::spectral::fft::fft_in_place;
///
/// let mut re = vec![1.0, 0.0, 0.0, 0.0];
/// let mut im = vec![0.0; 4];
/// fft_in_place(&mut re, &mut im)?;
/// assert_eq!(re, vec![1.0; 4]);
/// # Ok::<(), tonescribe::AnalysisError>(())
/// ```
pub fn fft_in_place(re: &mut [f32], im: &mut [f32]) -> Result<(), AnalysisError> {
    let n = re.len();
    if im.len() != n {
        return Err(AnalysisError::InvalidInput(format!(
            "FFT real/imaginary length mismatch: {} vs {}",
            n,
            im.len()
        )));
    }
    if n < 2 || !n.is_power_of_two() {
        return Err(AnalysisError::InvalidInput(format!(
            "FFT size must be a power of two >= 2, got {}",
            n
        )));
    }

    bit_reverse_permute(re, im);

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let angle = -2.0 * std::f64::consts::PI / len as f64;
        let (wn_re, wn_im) = (angle.cos(), angle.sin());

        for start in (0..n).step_by(len) {
            // Twiddle recurrence in f64; the error grows with `half` otherwise
            let (mut w_re, mut w_im) = (1.0f64, 0.0f64);
            for k in 0..half {
                let a = start + k;
                let b = a + half;
                let (wr, wi) = (w_re as f32, w_im as f32);

                let t_re = re[b] * wr - im[b] * wi;
                let t_im = re[b] * wi + im[b] * wr;
                re[b] = re[a] - t_re;
                im[b] = im[a] - t_im;
                re[a] += t_re;
                im[a] += t_im;

                let next_re = w_re * wn_re - w_im * wn_im;
                w_im = w_re * wn_im + w_im * wn_re;
                w_re = next_re;
            }
        }

        len <<= 1;
    }

    Ok(())
}

fn bit_reverse_permute(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    let mut j = 0;
    for i in 0..n {
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
        let mut m = n >> 1;
        while m >= 1 && (j & m) != 0 {
            j ^= m;
            m >>= 1;
        }
        j |= m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::{num_complex::Complex32, FftPlanner};

    #[test]
    fn test_impulse_is_flat() {
        let mut re = vec![0.0f32; 8];
        let mut im = vec![0.0f32; 8];
        re[0] = 1.0;
        fft_in_place(&mut re, &mut im).unwrap();
        for k in 0..8 {
            assert!((re[k] - 1.0).abs() < 1e-6);
            assert!(im[k].abs() < 1e-6);
        }
    }

    #[test]
    fn test_bin_centered_cosine() {
        let n = 64;
        let bin = 5;
        let mut re: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / n as f32).cos())
            .collect();
        let mut im = vec![0.0f32; n];
        fft_in_place(&mut re, &mut im).unwrap();

        let mags: Vec<f32> = re.iter().zip(&im).map(|(r, i)| (r * r + i * i).sqrt()).collect();
        assert!((mags[bin] - n as f32 / 2.0).abs() < 1e-3, "got {}", mags[bin]);
        assert!((mags[n - bin] - n as f32 / 2.0).abs() < 1e-3);
        for (k, &m) in mags.iter().enumerate() {
            if k != bin && k != n - bin {
                assert!(m < 1e-3, "leakage at bin {}: {}", k, m);
            }
        }
    }

    #[test]
    fn test_matches_rustfft() {
        let n = 2048;
        let signal: Vec<f32> = (0..n)
            .map(|i| {
                let t = i as f32 / 44100.0;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin()
                    + 0.5 * (2.0 * std::f32::consts::PI * 1234.5 * t).cos()
                    + 0.1 * ((i * 7919) % 13) as f32 / 13.0
            })
            .collect();

        let mut re = signal.clone();
        let mut im = vec![0.0f32; n];
        fft_in_place(&mut re, &mut im).unwrap();

        let mut expected: Vec<Complex32> =
            signal.iter().map(|&s| Complex32::new(s, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(n).process(&mut expected);

        for k in 0..n {
            let tol = 1e-3 * (1.0 + expected[k].norm());
            assert!(
                (re[k] - expected[k].re).abs() < tol && (im[k] - expected[k].im).abs() < tol,
                "bin {}: got ({}, {}), expected ({}, {})",
                k,
                re[k],
                im[k],
                expected[k].re,
                expected[k].im
            );
        }
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let mut re = vec![0.0f32; 12];
        let mut im = vec![0.0f32; 12];
        assert!(matches!(
            fft_in_place(&mut re, &mut im),
            Err(AnalysisError::InvalidInput(_))
        ));

        let mut re = vec![0.0f32; 1];
        let mut im = vec![0.0f32; 1];
        assert!(fft_in_place(&mut re, &mut im).is_err());
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let mut re = vec![0.0f32; 8];
        let mut im = vec![0.0f32; 4];
        assert!(fft_in_place(&mut re, &mut im).is_err());
    }
}
