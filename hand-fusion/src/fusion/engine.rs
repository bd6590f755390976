//! Fusion engine - owns per-device state and runs one tick at a time
//!
//! Devices are registered once at construction and every (device, side)
//! history is created up front. A tick:
//! 1. updates visibility and position history for every device frame
//! 2. scores each hand and its joints against that device's history
//! 3. hands all scored observations to the frame merger
//!
//! Exactly one caller runs `fuse` at a time, with frames already
//! snapshotted from the producers.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::{FusionConfig, FusionSetup};
use crate::confidence::{ConfidenceEstimator, JointOcclusion, TickClock};
use crate::error::{FusionError, Result};
use crate::history::DeviceHistory;
use crate::model::{Device, DeviceFrame, DeviceId, HandSide, MergedFrame};

use super::merger::{FrameMerger, ScoredHand};

pub struct FusionEngine {
    devices: Vec<Device>,
    slots: HashMap<DeviceId, usize>,
    histories: Vec<DeviceHistory>,
    estimator: ConfidenceEstimator,
    merger: FrameMerger,
    last_tick: Option<f64>,
}

impl FusionEngine {
    pub fn new(devices: Vec<Device>, config: FusionConfig) -> Result<Self> {
        config.validate()?;
        if devices.is_empty() {
            return Err(FusionError::NoDevices);
        }

        let mut slots = HashMap::with_capacity(devices.len());
        for (slot, device) in devices.iter().enumerate() {
            if slots.insert(device.id.clone(), slot).is_some() {
                return Err(FusionError::DuplicateDevice(device.id.clone()));
            }
        }

        let histories = devices
            .iter()
            .map(|_| DeviceHistory::new(&config.history))
            .collect();

        info!(
            devices = devices.len(),
            ignore_recent_new_hands = config.ignore_recent_new_hands,
            "hand fusion engine ready"
        );

        Ok(Self {
            devices,
            slots,
            histories,
            estimator: ConfidenceEstimator::new(config),
            merger: FrameMerger::new(),
            last_tick: None,
        })
    }

    pub fn from_setup(setup: &FusionSetup) -> Result<Self> {
        Self::new(setup.devices(), setup.fusion.clone())
    }

    pub fn with_occlusion(mut self, source: Box<dyn JointOcclusion>) -> Self {
        self.estimator.set_occlusion(Some(source));
        self
    }

    pub fn set_occlusion(&mut self, source: Option<Box<dyn JointOcclusion>>) {
        self.estimator.set_occlusion(source);
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.slots.get(id).map(|&slot| &self.devices[slot])
    }

    pub fn history(&self, id: &DeviceId) -> Option<&DeviceHistory> {
        self.slots.get(id).map(|&slot| &self.histories[slot])
    }

    pub fn config(&self) -> &FusionConfig {
        self.estimator.config()
    }

    /// Swap configuration between ticks
    ///
    /// History windows are resized in place, keeping their newest samples.
    pub fn set_config(&mut self, config: FusionConfig) -> Result<()> {
        config.validate()?;
        if config.history != self.config().history {
            self.histories
                .iter_mut()
                .for_each(|history| history.resize(&config.history));
        }
        info!(weights = ?config.weights, "fusion configuration updated");
        self.estimator.set_config(config);
        Ok(())
    }

    /// Forget all history and visibility, keeping the registered devices
    pub fn reset(&mut self) {
        self.histories.iter_mut().for_each(DeviceHistory::clear);
        self.last_tick = None;
        debug!("fusion history cleared");
    }

    /// Run one fusion tick over the latest frame of each device
    ///
    /// `now` is seconds on a monotonic clock shared by all ticks. Frames
    /// from unregistered devices are skipped; a registered device without a
    /// frame this tick counts as seeing no hands.
    pub fn fuse(&mut self, frames: &[DeviceFrame], now: f64) -> MergedFrame {
        let clock = self.advance_clock(now);
        let mut reported = vec![false; self.devices.len()];
        let mut scored = Vec::new();

        for frame in frames {
            let Some(&slot) = self.slots.get(&frame.device) else {
                warn!(device = %frame.device, "dropping frame from unregistered device");
                continue;
            };
            if reported[slot] {
                warn!(device = %frame.device, "dropping duplicate frame in one tick");
                continue;
            }
            reported[slot] = true;

            let device = &self.devices[slot];
            let history = &mut self.histories[slot];

            for side in HandSide::BOTH {
                history.side_mut(side).update_visibility(frame.sees(side), now);
            }
            for hand in &frame.hands {
                history.side_mut(hand.side).positions.record(hand.palm.position, now);
            }

            for hand in &frame.hands {
                let side_history = history.side_mut(hand.side);
                let confidence = self.estimator.hand_confidence(device, side_history, hand, &clock);
                let joint_confidences = self.estimator.joint_confidences(device, side_history, hand);
                scored.push(ScoredHand {
                    hand,
                    confidence,
                    joint_confidences,
                });
            }
        }

        for (history, _) in self.histories.iter_mut().zip(&reported).filter(|(_, seen)| !**seen) {
            for side in HandSide::BOTH {
                history.side_mut(side).update_visibility(false, now);
            }
        }

        debug!(
            frames = frames.len(),
            observations = scored.len(),
            interval = clock.interval,
            "fusion tick"
        );

        self.merger.merge(&scored)
    }

    /// Measured interval since the previous tick, nominal on the first one
    fn advance_clock(&mut self, now: f64) -> TickClock {
        let interval = match self.last_tick {
            Some(previous) if now > previous => now - previous,
            _ => self.config().nominal_tick_interval,
        };
        self.last_tick = Some(now);
        TickClock::new(now, interval)
    }
}
