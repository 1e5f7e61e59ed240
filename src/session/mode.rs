// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::timing;
use std::time::Duration;

/// Operator-controlled flags that decide what the preview shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    /// Live feed replaced by the threshold preview
    pub calibrating: bool,
    /// Draw mode; raw frames are no longer pushed to the preview
    pub drawing: bool,
    /// Crosshair overlay enabled while drawing
    pub draw_overlay: bool,
}

/// The periodic task running in a given mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveTimer {
    Threshold,
    Interaction,
}

impl ActiveTimer {
    pub fn interval(self) -> Duration {
        match self {
            ActiveTimer::Threshold => timing::THRESHOLD_INTERVAL,
            ActiveTimer::Interaction => timing::INTERACTION_INTERVAL,
        }
    }
}

/// Status label cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Shown red
    Idle,
    /// Shown green
    Calibrating,
}

/// What woke the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTrigger {
    Frame,
    Tick(ActiveTimer),
}

/// How the preview is refreshed for one trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    Raw,
    Threshold,
    Crosshair,
    /// Leave whatever is on screen
    Hold,
}

impl ModeState {
    pub fn active_timer(&self) -> ActiveTimer {
        if self.calibrating {
            ActiveTimer::Threshold
        } else {
            ActiveTimer::Interaction
        }
    }

    pub fn indicator(&self) -> Indicator {
        if self.calibrating {
            Indicator::Calibrating
        } else {
            Indicator::Idle
        }
    }

    pub fn toggle_calibration(&mut self) {
        self.calibrating = !self.calibrating;
    }

    /// Pick the single rendering path for `trigger`
    ///
    /// Ticks from a timer that is not active for the current flags are held,
    /// so a tick already in flight when the mode changes draws nothing.
    pub fn render_path(&self, trigger: RenderTrigger) -> RenderPath {
        match trigger {
            RenderTrigger::Frame if !self.calibrating && !self.drawing => RenderPath::Raw,
            RenderTrigger::Tick(ActiveTimer::Threshold) if self.calibrating => {
                RenderPath::Threshold
            }
            RenderTrigger::Tick(ActiveTimer::Interaction)
                if !self.calibrating && self.drawing && self.draw_overlay =>
            {
                RenderPath::Crosshair
            }
            _ => RenderPath::Hold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(calibrating: bool, drawing: bool, draw_overlay: bool) -> ModeState {
        ModeState {
            calibrating,
            drawing,
            draw_overlay,
        }
    }

    #[test]
    fn test_raw_only_when_idle() {
        assert_eq!(
            mode(false, false, false).render_path(RenderTrigger::Frame),
            RenderPath::Raw
        );
        assert_eq!(
            mode(true, false, false).render_path(RenderTrigger::Frame),
            RenderPath::Hold
        );
        assert_eq!(
            mode(false, true, false).render_path(RenderTrigger::Frame),
            RenderPath::Hold
        );
    }

    #[test]
    fn test_crosshair_needs_both_flags() {
        let tick = RenderTrigger::Tick(ActiveTimer::Interaction);
        assert_eq!(mode(false, true, true).render_path(tick), RenderPath::Crosshair);
        assert_eq!(mode(false, true, false).render_path(tick), RenderPath::Hold);
        assert_eq!(mode(false, false, true).render_path(tick), RenderPath::Hold);
    }

    #[test]
    fn test_stale_ticks_are_held() {
        assert_eq!(
            mode(false, false, false).render_path(RenderTrigger::Tick(ActiveTimer::Threshold)),
            RenderPath::Hold
        );
        assert_eq!(
            mode(true, true, true).render_path(RenderTrigger::Tick(ActiveTimer::Interaction)),
            RenderPath::Hold
        );
    }

    #[test]
    fn test_exactly_one_timer() {
        let mut state = ModeState::default();
        assert_eq!(state.active_timer(), ActiveTimer::Interaction);
        state.toggle_calibration();
        assert_eq!(state.active_timer(), ActiveTimer::Threshold);
        assert_eq!(state.indicator(), Indicator::Calibrating);
        assert_eq!(ActiveTimer::Threshold.interval().as_millis(), 30);
    }
}
