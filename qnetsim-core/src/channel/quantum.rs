use tracing::{debug, trace};

use super::{bind_once, check_distance, check_sender, ChannelEnds, Transmission};
use crate::error::SimulationError;
use crate::events::{EventPayload, Photon};
use crate::network::{propagation_delay, FiberLoss, LossModel};
use crate::time::{Scheduler, Time};
use crate::topology::NodeCore;

/// A lossy photon link.
///
/// `loss` is computed once at construction from the attenuation coefficient and the length
/// through a [`LossModel`]; each transmission then costs exactly one uniform draw from the
/// sender's stream.
#[derive(Debug, Clone)]
pub struct QuantumChannel {
    name: String,
    attenuation: f64,
    distance: f64,
    delay: Time,
    loss: f64,
    ends: Option<ChannelEnds>,
}

impl QuantumChannel {
    /// Fibre channel: `attenuation` in dB per metre, `distance` in metres.
    pub fn new(
        name: impl Into<String>,
        attenuation: f64,
        distance: f64,
    ) -> Result<Self, SimulationError> {
        Self::with_loss_model(name, attenuation, distance, &FiberLoss)
    }

    pub fn with_loss_model<M>(
        name: impl Into<String>,
        attenuation: f64,
        distance: f64,
        model: &M,
    ) -> Result<Self, SimulationError>
    where
        M: LossModel + ?Sized,
    {
        let name = name.into();
        check_distance(&name, distance)?;
        if !attenuation.is_finite() || attenuation < 0.0 {
            return Err(SimulationError::InvalidChannel {
                channel: name,
                reason: format!("attenuation must be finite and non-negative, got {attenuation}"),
            });
        }

        let loss = model.loss(attenuation, distance);
        if !(0.0..=1.0).contains(&loss) {
            return Err(SimulationError::InvalidChannel {
                channel: name,
                reason: format!("loss model returned {loss}, expected a probability"),
            });
        }

        Ok(Self {
            delay: propagation_delay(distance),
            name,
            attenuation,
            distance,
            loss,
            ends: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attenuation(&self) -> f64 {
        self.attenuation
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn delay(&self) -> Time {
        self.delay
    }

    /// Probability that a photon sent over this channel is never delivered.
    pub fn loss(&self) -> f64 {
        self.loss
    }

    pub fn ends(&self) -> Option<ChannelEnds> {
        self.ends
    }

    pub(crate) fn set_ends(&mut self, ends: ChannelEnds) -> Result<(), SimulationError> {
        bind_once(&mut self.ends, &self.name, ends)
    }

    /// Draws once from the sender's stream; a draw below `loss` drops the photon silently.
    pub(crate) fn transmit(
        &self,
        sender: &mut NodeCore,
        scheduler: &mut Scheduler,
        photon: Photon,
    ) -> Result<Transmission, SimulationError> {
        let ends = check_sender(&self.name, self.ends, sender)?;

        if sender.generator_mut().random() < self.loss {
            debug!(channel = %self.name, photon = photon.name(), "photon lost");
            scheduler.record_loss();
            return Ok(Transmission::Lost);
        }

        let at = scheduler.now().saturating_add(self.delay);
        trace!(channel = %self.name, at, photon = photon.name(), "photon in flight");
        scheduler.schedule(
            at,
            ends.receiver,
            EventPayload::Qubit {
                src: sender.name().to_owned(),
                photon,
            },
        )?;
        Ok(Transmission::Scheduled { at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NoLoss;

    #[test]
    fn fibre_loss_and_delay() {
        let channel = QuantumChannel::new("qc", 2e-4, 2e4).unwrap();
        assert_eq!(channel.delay(), 100_000_000);
        assert!((channel.loss() - (1.0 - 10f64.powf(-0.4))).abs() < 1e-12);
    }

    #[test]
    fn zero_attenuation_is_ideal() {
        let channel = QuantumChannel::new("qc", 0.0, 1e3).unwrap();
        assert_eq!(channel.loss(), 0.0);
    }

    #[test]
    fn custom_loss_model() {
        let channel = QuantumChannel::with_loss_model("qc", 5.0, 1e3, &NoLoss).unwrap();
        assert_eq!(channel.loss(), 0.0);

        let always = |_: f64, _: f64| 1.0;
        let channel = QuantumChannel::with_loss_model("qc", 0.0, 1.0, &always).unwrap();
        assert_eq!(channel.loss(), 1.0);
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(QuantumChannel::new("qc", -1e-4, 1e3).is_err());
        assert!(QuantumChannel::new("qc", 1e-4, f64::INFINITY).is_err());

        let broken = |_: f64, _: f64| 1.5;
        assert!(matches!(
            QuantumChannel::with_loss_model("qc", 0.0, 1.0, &broken),
            Err(SimulationError::InvalidChannel { .. })
        ));
    }
}
