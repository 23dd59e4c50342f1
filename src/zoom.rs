//! The shared zoom level.
//!
//! The value lives on a grid anchored at `min` with spacing `step`, like an
//! HTML range input. It is stored as a step index so repeated stepping never
//! accumulates float drift and "same value" comparisons are exact.

use crate::settings::ZoomSettings;
use crate::signal::Signal;
use std::sync::mpsc::Receiver;
use thiserror::Error;

/// Upper bound on the number of grid points between `min` and `max`.
const MAX_GRID_STEPS: f32 = 100_000.0;

/// Errors raised by zoom level construction and direct assignment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZoomError {
    #[error("zoom {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange { value: f32, min: f32, max: f32 },
    #[error("invalid zoom range [{min}, {max}]")]
    InvalidRange { min: f32, max: f32 },
    #[error("invalid zoom step {0}")]
    InvalidStep(f32),
}

/// Notification emitted after every successful change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomEvent {
    Changed { value: f32 },
}

/// A bounded, step-quantized scalar with change notification.
#[derive(Debug)]
pub struct ZoomLevel {
    min: f32,
    max: f32,
    step: f32,
    index: u32,
    max_index: u32,
    changed: Signal<ZoomEvent>,
}

impl ZoomLevel {
    /// Creates a zoom level; `initial` is clamped into range and snapped to
    /// the step grid.
    pub fn new(min: f32, max: f32, step: f32, initial: f32) -> Result<Self, ZoomError> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ZoomError::InvalidRange { min, max });
        }
        if !step.is_finite() || step <= 0.0 || (max - min) / step > MAX_GRID_STEPS {
            return Err(ZoomError::InvalidStep(step));
        }

        Ok(Self::build(min, max, step, initial))
    }

    fn build(min: f32, max: f32, step: f32, initial: f32) -> Self {
        // Tolerate float noise so a max that sits on the grid stays reachable.
        let max_index = ((max - min) / step + 1e-4).floor() as u32;

        let mut zoom = Self {
            min,
            max,
            step,
            index: 0,
            max_index,
            changed: Signal::new(),
        };
        let initial = if initial.is_finite() { initial } else { min };
        zoom.index = zoom.index_for(initial.clamp(min, max));
        zoom
    }

    pub fn from_settings(settings: &ZoomSettings) -> Result<Self, ZoomError> {
        Self::new(settings.min, settings.max, settings.step, settings.initial)
    }

    pub fn value(&self) -> f32 {
        self.value_at(self.index)
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn is_min(&self) -> bool {
        self.index == 0
    }

    pub fn is_max(&self) -> bool {
        self.index == self.max_index
    }

    /// Text shown next to the zoom controls, e.g. `x1.5`.
    pub fn label(&self) -> String {
        format!("x{:.1}", self.value())
    }

    pub fn subscribe(&mut self) -> Receiver<ZoomEvent> {
        self.changed.subscribe()
    }

    /// Assigns `value` directly. Values outside `[min, max]` are rejected;
    /// callers wanting saturation use [`Self::set_clamped`] or the step methods.
    ///
    /// Returns whether the value changed.
    pub fn set(&mut self, value: f32) -> Result<bool, ZoomError> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(ZoomError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self.set_index(self.index_for(value)))
    }

    /// Assigns `value` after clamping it into range.
    pub fn set_clamped(&mut self, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let index = self.index_for(value.clamp(self.min, self.max));
        self.set_index(index)
    }

    /// Adds one step, saturating at `max`.
    pub fn step_forward(&mut self) -> bool {
        let index = self.index.saturating_add(1).min(self.max_index);
        self.set_index(index)
    }

    /// Subtracts one step, saturating at `min`.
    pub fn step_back(&mut self) -> bool {
        let index = self.index.saturating_sub(1);
        self.set_index(index)
    }

    fn set_index(&mut self, index: u32) -> bool {
        if index == self.index {
            return false;
        }
        self.index = index;
        let value = self.value();
        log::debug!("zoom changed to {value}");
        self.changed.emit(ZoomEvent::Changed { value });
        true
    }

    fn index_for(&self, value: f32) -> u32 {
        let steps = ((value - self.min) / self.step).round().max(0.0) as u32;
        steps.min(self.max_index)
    }

    fn value_at(&self, index: u32) -> f32 {
        let value = f64::from(self.min) + f64::from(index) * f64::from(self.step);
        (value as f32).min(self.max)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        let ZoomSettings {
            min,
            max,
            step,
            initial,
        } = ZoomSettings::default();
        Self::build(min, max, step, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn zoom() -> ZoomLevel {
        ZoomLevel::new(0.1, 3.0, 0.1, 1.0).unwrap()
    }

    #[test]
    fn stepping_follows_the_grid() {
        let mut zoom = zoom();
        for _ in 0..5 {
            assert!(zoom.step_forward());
        }
        assert!((zoom.value() - 1.5).abs() < EPS);

        assert!(zoom.step_back());
        assert!((zoom.value() - 1.4).abs() < EPS);
    }

    #[test]
    fn steps_saturate_at_the_bounds() {
        let mut zoom = zoom();
        for _ in 0..100 {
            zoom.step_forward();
        }
        assert!(zoom.is_max());
        assert!((zoom.value() - 3.0).abs() < EPS);
        assert!(!zoom.step_forward());

        for _ in 0..100 {
            zoom.step_back();
        }
        assert!(zoom.is_min());
        assert!((zoom.value() - 0.1).abs() < EPS);
        assert!(!zoom.step_back());
    }

    #[test]
    fn mixed_sequences_stay_in_range() {
        let mut zoom = zoom();
        let ops: [fn(&mut ZoomLevel); 4] = [
            |z| {
                z.step_forward();
            },
            |z| {
                z.step_back();
            },
            |z| {
                z.set_clamped(7.0);
            },
            |z| {
                z.set_clamped(-2.0);
            },
        ];
        for i in 0..200 {
            ops[(i * 7 + i / 3) % ops.len()](&mut zoom);
            assert!(zoom.value() >= zoom.min() - EPS);
            assert!(zoom.value() <= zoom.max() + EPS);
        }
    }

    #[test]
    fn direct_set_rejects_out_of_range() {
        let mut zoom = zoom();
        assert_eq!(
            zoom.set(3.5),
            Err(ZoomError::OutOfRange {
                value: 3.5,
                min: 0.1,
                max: 3.0
            })
        );
        assert!(zoom.set(0.0).is_err());
        assert!(zoom.set(f32::NAN).is_err());
        assert!((zoom.value() - 1.0).abs() < EPS);
    }

    #[test]
    fn set_clamped_saturates() {
        let mut zoom = zoom();
        assert!(zoom.set_clamped(42.0));
        assert!(zoom.is_max());
        assert!(zoom.set_clamped(-1.0));
        assert!(zoom.is_min());
    }

    #[test]
    fn setting_current_value_does_not_notify() {
        let mut zoom = zoom();
        let rx = zoom.subscribe();

        assert_eq!(zoom.set(zoom.value()), Ok(false));
        assert!(!zoom.set_clamped(1.0));
        assert!(rx.try_recv().is_err());

        assert_eq!(zoom.set(2.0), Ok(true));
        let Ok(ZoomEvent::Changed { value }) = rx.try_recv() else {
            panic!("expected a change notification");
        };
        assert!((value - 2.0).abs() < EPS);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn saturated_step_does_not_notify() {
        let mut zoom = ZoomLevel::new(1.0, 2.0, 0.5, 2.0).unwrap();
        let rx = zoom.subscribe();
        assert!(!zoom.step_forward());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn off_grid_values_snap_to_nearest_step() {
        let mut zoom = zoom();
        assert_eq!(zoom.set(1.04), Ok(false));
        assert_eq!(zoom.set(1.26), Ok(true));
        assert!((zoom.value() - 1.3).abs() < EPS);
    }

    #[test]
    fn construction_validates_range_and_step() {
        assert_eq!(
            ZoomLevel::new(3.0, 1.0, 0.1, 1.0).unwrap_err(),
            ZoomError::InvalidRange { min: 3.0, max: 1.0 }
        );
        assert_eq!(
            ZoomLevel::new(0.1, 3.0, 0.0, 1.0).unwrap_err(),
            ZoomError::InvalidStep(0.0)
        );

        let zoom = ZoomLevel::new(0.1, 3.0, 0.1, 10.0).unwrap();
        assert!(zoom.is_max());
    }

    #[test]
    fn steps_too_fine_for_the_range_are_rejected() {
        assert_eq!(
            ZoomLevel::new(0.1, 3.0, 1e-10, 3.0).unwrap_err(),
            ZoomError::InvalidStep(1e-10)
        );

        let mut zoom = ZoomLevel::new(0.0, 1.0, 1e-4, 1.0).unwrap();
        assert!(zoom.is_max());
        assert!(!zoom.step_forward());
        assert!((zoom.value() - 1.0).abs() < EPS);

        // A degenerate range accepts any positive step.
        let mut zoom = ZoomLevel::new(2.0, 2.0, 1e-10, 2.0).unwrap();
        assert!(!zoom.step_forward());
        assert_eq!(zoom.value(), 2.0);
    }

    #[test]
    fn default_matches_default_settings() {
        let zoom = ZoomLevel::default();
        let settings = ZoomSettings::default();
        assert_eq!(zoom.min(), settings.min);
        assert_eq!(zoom.max(), settings.max);
        assert!((zoom.value() - settings.initial).abs() < EPS);
    }

    #[test]
    fn label_uses_one_decimal() {
        let mut zoom = zoom();
        assert_eq!(zoom.label(), "x1.0");
        zoom.step_forward();
        assert_eq!(zoom.label(), "x1.1");
    }
}
