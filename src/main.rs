//! # Virtual Joy
//!
//! Headless host for the virtual joystick.
//!
//! Reads UI events (pointer drags, buttons, settings) as JSON lines from
//! stdin and publishes joy messages as JSON lines on stdout at the
//! configured rate. Logs go to stderr. Publication continues after stdin
//! closes, until Ctrl+C.
//!
//! # Examples
//!
//! ```bash
//! printf '%s\n' \
//!   '{"type":"press","x":0,"y":0}' \
//!   '{"type":"move","x":0,"y":-40}' \
//!   | cargo run --release -- --rate 10 --type square
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use virtual_joy::config::{Config, Overrides};
use virtual_joy::controller::JoyController;
use virtual_joy::input::EventDispatcher;
use virtual_joy::joystick::Shape;
use virtual_joy::publisher::sink::JsonLinesSink;

/// Number of published messages between status log lines
const LOG_INTERVAL_MESSAGES: u64 = 200;

/// Virtual joystick publishing joy messages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Topic to publish on [default: /joy]
    #[arg(short, long)]
    topic: Option<String>,

    /// Publish rate in Hz [default: 20]
    #[arg(short, long)]
    rate: Option<f64>,

    /// Stick clamp shape
    #[arg(long = "type", value_parser = ["circle", "square"])]
    shape: Option<String>,

    /// Start with publishing disabled
    #[arg(long)]
    no_publish: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            topic: self.topic.clone(),
            rate_hz: self.rate,
            shape: self.shape.as_deref().map(Shape::from_name),
            publish: self.no_publish.then_some(false),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (stdout carries messages)
    let level = if args.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("Virtual Joy v{} starting...", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path))?,
        None => Config::default(),
    };
    let config = config.apply(args.overrides())?;
    info!(
        "Joystick: {} shape, range {}",
        config.joystick.shape, config.joystick.range
    );

    let (mut dispatcher, buttons) = EventDispatcher::new(config.publisher.button_count);
    let mut controller = JoyController::new(&config, buttons)?;
    controller.attach_sink(Box::new(JsonLinesSink::new(tokio::io::stdout())));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut last_log_count: u64 = 0;

    info!("Reading UI events from stdin, press Ctrl+C to exit");

    loop {
        tokio::select! {
            _ = controller.tick() => {
                controller.on_timer().await;

                let sent = controller.publisher().sent_count();
                if sent - last_log_count >= LOG_INTERVAL_MESSAGES {
                    info!("Published {} messages, stick {}", sent, controller.readout());
                    last_log_count = sent;
                }
            }

            line = lines.next_line(), if input_open => {
                match line {
                    Ok(Some(line)) => match EventDispatcher::parse_line(&line) {
                        Ok(Some(event)) => {
                            if let Err(e) = dispatcher.apply(&mut controller, event) {
                                warn!("Rejected event: {}", e);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => warn!("Skipping malformed event: {}", e),
                    },
                    Ok(None) => {
                        info!("Input closed, stick stays at rest until Ctrl+C");
                        input_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        input_open = false;
                    }
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!(
        "Total messages published: {} ({} failed)",
        controller.publisher().sent_count(),
        controller.publisher().failed_count()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["virtual-joy"]);
        assert!(!args.quiet);
        assert_eq!(args.overrides(), Overrides::default());
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "virtual-joy", "-q", "-t", "/robot/joy", "-r", "50", "--type", "square", "--no-publish",
        ]);

        let overrides = args.overrides();
        assert!(args.quiet);
        assert_eq!(overrides.topic.as_deref(), Some("/robot/joy"));
        assert_eq!(overrides.rate_hz, Some(50.0));
        assert_eq!(overrides.shape, Some(Shape::Square));
        assert_eq!(overrides.publish, Some(false));
    }

    #[test]
    fn test_args_reject_unknown_shape() {
        let result = Args::try_parse_from(["virtual-joy", "--type", "hexagon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_interval_constant() {
        // At the default 20Hz, 200 messages = 10 seconds
        let seconds = LOG_INTERVAL_MESSAGES as f64 / 20.0;
        assert_eq!(seconds, 10.0);
    }
}
