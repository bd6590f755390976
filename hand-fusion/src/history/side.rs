//! Carried-forward state for one (device, hand side) pairing

use crate::config::HistoryConfig;
use crate::model::{HandSide, JointConfidences};

use super::buffer::HistoryBuffer;
use super::position::PositionHistory;

#[derive(Clone, Debug)]
pub struct SideHistory {
    pub positions: PositionHistory,
    pub hand_confidence: HistoryBuffer<f32>,
    pub joint_confidence: HistoryBuffer<JointConfidences>,
    /// When the hand became continuously visible, None while absent
    pub first_visible: Option<f64>,
}

impl SideHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            positions: PositionHistory::new(config.positions),
            hand_confidence: HistoryBuffer::new(config.hand_confidence),
            joint_confidence: HistoryBuffer::new(config.joint_confidence),
            first_visible: None,
        }
    }

    /// Track the absent -> present transition
    pub fn update_visibility(&mut self, visible: bool, now: f64) {
        if !visible {
            self.first_visible = None;
        } else if self.first_visible.is_none() {
            self.first_visible = Some(now);
        }
    }

    /// Seconds of continuous visibility, None when not visible
    pub fn time_visible(&self, now: f64) -> Option<f64> {
        self.first_visible.map(|since| (now - since).max(0.0))
    }

    pub fn resize(&mut self, config: &HistoryConfig) {
        self.positions.set_capacity(config.positions);
        self.hand_confidence.set_capacity(config.hand_confidence);
        self.joint_confidence.set_capacity(config.joint_confidence);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.hand_confidence.clear();
        self.joint_confidence.clear();
        self.first_visible = None;
    }
}

/// Left and right histories for one device
#[derive(Clone, Debug)]
pub struct DeviceHistory {
    sides: [SideHistory; 2],
}

impl DeviceHistory {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            sides: [SideHistory::new(config), SideHistory::new(config)],
        }
    }

    pub fn side(&self, side: HandSide) -> &SideHistory {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: HandSide) -> &mut SideHistory {
        &mut self.sides[side.index()]
    }

    pub fn resize(&mut self, config: &HistoryConfig) {
        self.sides.iter_mut().for_each(|side| side.resize(config));
    }

    pub fn clear(&mut self) {
        self.sides.iter_mut().for_each(SideHistory::clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_keeps_first_instant() {
        let mut history = SideHistory::new(&HistoryConfig::default());
        history.update_visibility(true, 1.0);
        history.update_visibility(true, 1.5);
        assert_eq!(history.first_visible, Some(1.0));
        assert_eq!(history.time_visible(2.0), Some(1.0));

        history.update_visibility(false, 2.0);
        assert_eq!(history.time_visible(2.0), None);

        history.update_visibility(true, 3.0);
        assert_eq!(history.first_visible, Some(3.0));
    }

    #[test]
    fn test_visible_from_time_zero() {
        let mut history = SideHistory::new(&HistoryConfig::default());
        history.update_visibility(true, 0.0);
        assert_eq!(history.time_visible(0.25), Some(0.25));
    }
}
