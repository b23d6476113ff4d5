//! ## qnetsim-core::network::loss
//! **Photon loss models for quantum channels**
//!
//! A loss model maps an attenuation coefficient and a channel length to the probability that a
//! photon never arrives. Models must be monotonic: a longer or more attenuating channel never
//! loses fewer photons.
//!
//! ### Models:
//! - `FiberLoss`: exponential attenuation with the coefficient in dB per metre.
//! - `NoLoss`: ideal channel.
//! - Any `Fn(f64, f64) -> f64` closure.

/// Trait for loss models.
pub trait LossModel: Send + Sync {
    /// Probability in `[0, 1]` that a photon is lost over `distance` metres.
    fn loss(&self, attenuation: f64, distance: f64) -> f64;
}

/// Exponential fibre attenuation: `1 - 10^(-attenuation * distance / 10)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiberLoss;

impl LossModel for FiberLoss {
    #[inline]
    fn loss(&self, attenuation: f64, distance: f64) -> f64 {
        1.0 - 10f64.powf(-attenuation * distance / 10.0)
    }
}

/// No-op loss model (ideal channel).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoss;

impl LossModel for NoLoss {
    #[inline]
    fn loss(&self, _attenuation: f64, _distance: f64) -> f64 {
        0.0
    }
}

impl<F> LossModel for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    #[inline]
    fn loss(&self, attenuation: f64, distance: f64) -> f64 {
        self(attenuation, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fiber_loss_reference_point() {
        // 0.2 dB/km over 20 km is 4 dB.
        let loss = FiberLoss.loss(2e-4, 2e4);
        assert!((loss - (1.0 - 10f64.powf(-0.4))).abs() < 1e-12);
    }

    #[test]
    fn test_fiber_loss_is_monotonic() {
        let mut previous = FiberLoss.loss(2e-4, 0.0);
        assert_eq!(previous, 0.0);
        for km in 1..50 {
            let current = FiberLoss.loss(2e-4, km as f64 * 1e3);
            assert!(current > previous);
            previous = current;
        }
        assert!(FiberLoss.loss(4e-4, 1e4) > FiberLoss.loss(2e-4, 1e4));
    }

    #[test]
    fn test_no_loss_model() {
        assert_eq!(NoLoss.loss(1.0, 1e6), 0.0);
    }

    #[test]
    fn test_closure_model() {
        let linear = |attenuation: f64, distance: f64| (attenuation * distance).min(1.0);
        assert!((linear.loss(0.1, 5.0) - 0.5).abs() < 1e-12);
        assert_eq!(linear.loss(1.0, 5.0), 1.0);
    }
}
