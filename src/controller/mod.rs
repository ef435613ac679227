//! # Controller Module
//!
//! Hosts one virtual joystick and publishes its value.
//!
//! This module handles:
//! - Owning the stick model, the publisher, the publish timer and the buttons
//! - Starting and stopping publication when the rate or enable flag changes
//! - Keeping a textual readout of the stick value current
//!
//! ## Usage
//!
//! ```
//! use virtual_joy::config::Config;
//! use virtual_joy::controller::JoyController;
//! use virtual_joy::publisher::buttons::ButtonBank;
//!
//! let mut controller = JoyController::new(&Config::default(), ButtonBank::new())?;
//! assert!(controller.is_publishing());
//!
//! controller.set_publish_enabled(false);
//! assert!(!controller.is_publishing());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod status;

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::joystick::{JoystickModel, Shape, Vec2};
use crate::publisher::buttons::ButtonBank;
use crate::publisher::sink::JoySink;
use crate::publisher::timer::PublishTimer;
use crate::publisher::JoyPublisher;
use status::StatusReadout;

/// Virtual joystick host.
#[derive(Debug)]
pub struct JoyController {
    model: JoystickModel,
    publisher: JoyPublisher,
    timer: PublishTimer,
    buttons: ButtonBank,
    readout: StatusReadout,
    publish_enabled: bool,
    rate_hz: f64,
}

impl JoyController {
    /// Creates a controller from configuration.
    ///
    /// The stick rests at the origin of the pointer space. Publication
    /// starts immediately when enabled, but nothing is delivered until a
    /// transport is attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured range is invalid.
    pub fn new(config: &Config, buttons: ButtonBank) -> Result<Self> {
        let mut model =
            JoystickModel::with_config(Vec2::ZERO, config.joystick.range, config.joystick.shape)?;

        let readout = StatusReadout::new();
        readout.attach(&mut model);

        let publisher = JoyPublisher::new(config.publisher.topic.clone())
            .with_frame_id(config.publisher.frame_id.clone());

        let mut controller = Self {
            model,
            publisher,
            timer: PublishTimer::new(),
            buttons,
            readout,
            publish_enabled: config.publisher.enabled,
            rate_hz: config.publisher.rate_hz,
        };
        controller.update_publish_state();

        Ok(controller)
    }

    #[must_use]
    pub fn model(&self) -> &JoystickModel {
        &self.model
    }

    /// Mutable access for the input layer.
    pub fn model_mut(&mut self) -> &mut JoystickModel {
        &mut self.model
    }

    #[must_use]
    pub fn publisher(&self) -> &JoyPublisher {
        &self.publisher
    }

    #[must_use]
    pub fn buttons(&self) -> &ButtonBank {
        &self.buttons
    }

    /// Current readout text, `(forward,left)`.
    #[must_use]
    pub fn readout(&self) -> String {
        self.readout.text()
    }

    #[must_use]
    pub fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    /// Whether the publish timer is running.
    #[must_use]
    pub fn is_publishing(&self) -> bool {
        self.timer.is_running()
    }

    /// Attaches the message transport.
    pub fn attach_sink(&mut self, sink: Box<dyn JoySink>) {
        self.publisher.attach(sink);
    }

    pub fn set_publish_enabled(&mut self, enabled: bool) {
        self.publish_enabled = enabled;
        self.update_publish_state();
    }

    /// Changes the publish rate. A non-positive rate pauses publication.
    pub fn set_rate(&mut self, rate_hz: f64) {
        self.rate_hz = rate_hz;
        self.update_publish_state();
    }

    /// Moves publication to another topic.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or whitespace-containing name.
    pub fn set_topic(&mut self, topic: &str) -> Result<()> {
        self.publisher.set_topic(topic)
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.model.set_shape(shape);
    }

    /// Selects the shape by name; unknown names select a square.
    pub fn set_shape_name(&mut self, name: &str) {
        let shape = Shape::from_name(name);
        if shape == Shape::Square && !name.trim().eq_ignore_ascii_case("square") {
            warn!("Unknown joystick shape '{}', using square", name);
        }
        self.set_shape(shape);
    }

    /// Changes the stick range.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualJoyError::InvalidRange`](crate::error::VirtualJoyError::InvalidRange)
    /// for non-positive values.
    pub fn set_range(&mut self, range: f64) -> Result<()> {
        self.model.set_range(range)
    }

    /// Waits for the next publish tick. Never completes while paused.
    pub async fn tick(&mut self) {
        self.timer.tick().await;
    }

    /// Publishes the current stick value and button states.
    ///
    /// Returns whether the message was delivered.
    pub async fn on_timer(&mut self) -> bool {
        let value = self.model.current_value();
        let buttons = self.buttons.states();
        self.publisher.publish(value, &buttons).await
    }

    fn update_publish_state(&mut self) {
        if self.publish_enabled {
            if self.timer.start(self.rate_hz) {
                info!(
                    "Publishing on {} at {}Hz",
                    self.publisher.topic(),
                    self.rate_hz
                );
            } else {
                info!("Publishing paused (rate {}Hz)", self.rate_hz);
            }
        } else {
            self.timer.stop();
            info!("Publishing disabled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VirtualJoyError;
    use crate::publisher::sink::mocks::MockSink;
    use std::time::Duration;

    fn controller_with_sink(config: &Config, buttons: ButtonBank) -> (JoyController, MockSink) {
        let sink = MockSink::new();
        let mut controller = JoyController::new(config, buttons).unwrap();
        controller.attach_sink(Box::new(sink.clone()));
        (controller, sink)
    }

    // ==================== Lifecycle Tests ====================

    #[test]
    fn test_new_from_default_config() {
        let controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();

        assert!(controller.is_publishing());
        assert_eq!(controller.rate_hz(), 20.0);
        assert_eq!(controller.publisher().topic(), "/joy");
        assert_eq!(controller.model().shape(), Shape::Disk);
        assert_eq!(controller.readout(), "(0.00,0.00)");
    }

    #[test]
    fn test_new_disabled() {
        let mut config = Config::default();
        config.publisher.enabled = false;

        let controller = JoyController::new(&config, ButtonBank::new()).unwrap();

        assert!(!controller.is_publishing());
    }

    #[test]
    fn test_new_rejects_bad_range() {
        let mut config = Config::default();
        config.joystick.range = 0.0;

        let result = JoyController::new(&config, ButtonBank::new());

        assert!(matches!(result, Err(VirtualJoyError::InvalidRange(_))));
    }

    #[test]
    fn test_toggle_publishing() {
        let mut controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();

        controller.set_publish_enabled(false);
        assert!(!controller.is_publishing());

        controller.set_publish_enabled(true);
        assert!(controller.is_publishing());
    }

    #[test]
    fn test_zero_rate_pauses() {
        let mut controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();

        controller.set_rate(0.0);
        assert!(!controller.is_publishing());

        controller.set_rate(10.0);
        assert!(controller.is_publishing());
    }

    #[test]
    fn test_unrepresentable_rate_pauses() {
        let mut config = Config::default();
        config.publisher.rate_hz = 1e-300;

        let mut controller = JoyController::new(&config, ButtonBank::new()).unwrap();
        assert!(!controller.is_publishing());

        controller.set_rate(20.0);
        assert!(controller.is_publishing());

        controller.set_rate(f64::MIN_POSITIVE);
        assert!(!controller.is_publishing());
    }

    #[test]
    fn test_rate_change_while_disabled_stays_stopped() {
        let mut controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();
        controller.set_publish_enabled(false);

        controller.set_rate(50.0);

        assert!(!controller.is_publishing());
        assert_eq!(controller.rate_hz(), 50.0);
    }

    // ==================== Configuration Tests ====================

    #[test]
    fn test_set_shape_name() {
        let mut controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();

        controller.set_shape_name("square");
        assert_eq!(controller.model().shape(), Shape::Square);

        controller.set_shape_name("circle");
        assert_eq!(controller.model().shape(), Shape::Disk);

        controller.set_shape_name("blob");
        assert_eq!(controller.model().shape(), Shape::Square);
    }

    #[test]
    fn test_set_range_error_surfaces() {
        let mut controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();

        assert!(controller.set_range(-1.0).is_err());
        assert!(controller.set_range(40.0).is_ok());
        assert_eq!(controller.model().range(), 40.0);
    }

    #[test]
    fn test_set_topic() {
        let mut controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();

        controller.set_topic("/robot/joy").unwrap();
        assert_eq!(controller.publisher().topic(), "/robot/joy");
        assert!(controller.set_topic("").is_err());
    }

    // ==================== Publish Tests ====================

    #[tokio::test]
    async fn test_on_timer_publishes_value_and_buttons() {
        let (bank, handles) = ButtonBank::with_cells(3);
        let (mut controller, sink) = controller_with_sink(&Config::default(), bank);

        controller.model_mut().begin_drag(Vec2::ZERO);
        controller.model_mut().update_drag(Vec2::new(0.0, -40.0));
        handles[2].set(true);

        assert!(controller.on_timer().await);

        let sent = sink.get_sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "/joy");
        assert_eq!(sent[0].1.axes, vec![0.5, 0.0]);
        assert_eq!(sent[0].1.buttons, vec![0, 0, 1]);
        assert_eq!(controller.readout(), "(0.50,0.00)");
    }

    #[tokio::test]
    async fn test_on_timer_without_sink_does_not_fail() {
        let mut controller = JoyController::new(&Config::default(), ButtonBank::new()).unwrap();

        assert!(!controller.on_timer().await);
        assert_eq!(controller.publisher().failed_count(), 1);

        // Model untouched by the failure
        assert_eq!(controller.model().current_value(), (0.0, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_loop_publishes_at_rate() {
        let (mut controller, sink) = controller_with_sink(&Config::default(), ButtonBank::new());

        let deadline = tokio::time::Instant::now() + Duration::from_millis(1010);
        while tokio::time::Instant::now() < deadline {
            tokio::select! {
                _ = controller.tick() => { controller.on_timer().await; }
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }

        // 20 Hz for one second
        assert_eq!(sink.get_sent().len(), 20);
    }

    #[test]
    fn test_disabled_controller_tick_stays_pending() {
        let mut config = Config::default();
        config.publisher.enabled = false;
        let mut controller = JoyController::new(&config, ButtonBank::new()).unwrap();

        let mut tick = tokio_test::task::spawn(controller.tick());

        tokio_test::assert_pending!(tick.poll());
        tokio_test::assert_pending!(tick.poll());
    }
}
