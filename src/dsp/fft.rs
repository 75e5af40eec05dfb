//! Iterative radix-2 FFT with per-length cached plans.

/*
Radix-2 Cooley-Tukey
====================

A length-N DFT splits into two length-N/2 DFTs (even and odd samples), which
recombine with one complex multiply per pair (the "butterfly"):

    X[k]       = E[k] + W^k · O[k]
    X[k + N/2] = E[k] - W^k · O[k]        W = e^(-2πi/N)

Done iteratively: permute the input into bit-reversed order, then run
log2(N) passes of butterflies with span 2, 4, 8, ... N. Each pass touches
every sample once, giving O(N log N).

Everything that depends only on N is computed once per plan:

  bit_reverse   input permutation, N entries
  twiddles      W^k for k in 0..N/2; a pass with span `size` reads every
                (N/size)-th entry

Plans are cached by length in `FftPlanner` and shared via `Arc`, so
analysing many tables of the same length only pays for the trig once.

Length must be a power of two. Anything else is rejected up front, never
truncated or padded.
*/

use std::{collections::HashMap, f64::consts::TAU, sync::Arc};

use num_complex::Complex64;

use crate::error::WavetableError;

/// A precomputed forward transform for one power-of-two length.
#[derive(Debug)]
pub struct Radix2Fft {
    len: usize,
    twiddles: Vec<Complex64>,
    bit_reverse: Vec<usize>,
}

impl Radix2Fft {
    pub fn new(len: usize) -> Result<Self, WavetableError> {
        if !len.is_power_of_two() {
            return Err(WavetableError::NotPowerOfTwo(len));
        }

        let twiddles = (0..len / 2)
            .map(|k| Complex64::from_polar(1.0, -TAU * k as f64 / len as f64))
            .collect();

        let bits = len.trailing_zeros();
        let bit_reverse = (0..len)
            .map(|i| {
                if bits == 0 {
                    0
                } else {
                    i.reverse_bits() >> (usize::BITS - bits)
                }
            })
            .collect();

        Ok(Self {
            len,
            twiddles,
            bit_reverse,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// In-place forward transform (no scaling).
    pub fn process(&self, buffer: &mut [Complex64]) -> Result<(), WavetableError> {
        let n = self.len;
        if buffer.len() != n {
            return Err(WavetableError::LengthMismatch {
                expected: n,
                got: buffer.len(),
            });
        }

        for (i, &j) in self.bit_reverse.iter().enumerate() {
            if j > i {
                buffer.swap(i, j);
            }
        }

        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = n / size;

            for block in buffer.chunks_exact_mut(size) {
                let (evens, odds) = block.split_at_mut(half);
                for (k, (even, odd)) in evens.iter_mut().zip(odds.iter_mut()).enumerate() {
                    let twisted = *odd * self.twiddles[k * stride];
                    let a = *even;
                    *even = a + twisted;
                    *odd = a - twisted;
                }
            }

            size *= 2;
        }

        Ok(())
    }

    /// Magnitudes of every bin of a real-valued input.
    pub fn magnitudes(&self, samples: &[f32]) -> Result<Vec<f64>, WavetableError> {
        let mut buffer: Vec<Complex64> = samples
            .iter()
            .map(|&s| Complex64::new(s as f64, 0.0))
            .collect();
        self.process(&mut buffer)?;
        Ok(buffer.iter().map(|c| c.norm()).collect())
    }
}

/// Hands out shared plans, building each length at most once.
#[derive(Debug, Default)]
pub struct FftPlanner {
    plans: HashMap<usize, Arc<Radix2Fft>>,
}

impl FftPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan_fft_forward(&mut self, len: usize) -> Result<Arc<Radix2Fft>, WavetableError> {
        if let Some(plan) = self.plans.get(&len) {
            return Ok(Arc::clone(plan));
        }

        let plan = Arc::new(Radix2Fft::new(len)?);
        self.plans.insert(len, Arc::clone(&plan));
        Ok(plan)
    }

    /// Number of distinct lengths planned so far.
    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }
}
