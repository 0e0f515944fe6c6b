//! Engine connection configuration.
//!
//! The whole connection bundle is one explicit struct — no process-wide
//! globals, no environment lookups at use sites.  It is constructed once at
//! startup and passed into
//! [`EngineSession::connect`][crate::EngineSession::connect].

use std::env;
use std::path::PathBuf;

use crate::{LinkError, LinkResult};

/// Environment variable naming the engine installation root.
pub const ENGINE_HOME_VAR: &str = "MICROSIM_HOME";

/// Binary names under `<home>/bin/`, headless and GUI flavors.
const HEADLESS_BINARY: &str = "microsim";
const GUI_BINARY:      &str = "microsim-gui";

/// Everything needed to launch and attach to one engine instance.
///
/// All fields are plain data; [`EngineConfig::command_args`] is the single
/// place where they are rendered into the engine's command line.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Engine installation root (`<home>/bin/` holds the binaries).
    pub home: PathBuf,

    /// Launch the GUI binary instead of the headless one.
    pub gui: bool,

    /// Scenario configuration file handed to the engine with `-c`.
    pub scenario: PathBuf,

    /// TCP control port the engine listens on.
    pub port: u16,

    /// Start computing immediately rather than waiting for a GUI click.
    pub auto_start: bool,

    /// Exit the engine process when the scenario ends or the control
    /// connection drops.
    pub quit_on_end: bool,

    /// Probability that a vehicle is equipped with automatic rerouting,
    /// in `0.0..=1.0`.
    pub reroute_probability: f64,

    /// Period of the automatic rerouting device, in ticks.
    pub reroute_period_ticks: u32,

    /// Where the engine writes its own error log.
    pub error_log: PathBuf,
}

impl EngineConfig {
    /// Config with the stock options for `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home:                 home.into(),
            gui:                  false,
            scenario:             PathBuf::from("map.simcfg"),
            port:                 8813,
            auto_start:           true,
            quit_on_end:          true,
            reroute_probability:  1.0,
            reroute_period_ticks: 30,
            error_log:            PathBuf::from("engine-errors.log"),
        }
    }

    /// Resolve the installation root from [`ENGINE_HOME_VAR`].
    ///
    /// Fails with an explanatory [`LinkError::Config`] when the variable is
    /// absent, so the binary can exit before touching anything else.
    pub fn from_env() -> LinkResult<Self> {
        match env::var_os(ENGINE_HOME_VAR) {
            Some(home) => Ok(Self::new(PathBuf::from(home))),
            None => Err(LinkError::Config(format!(
                "environment variable {ENGINE_HOME_VAR} is not set; \
                 point it at the engine installation root"
            ))),
        }
    }

    /// Check option values the engine would otherwise reject at launch.
    pub fn validate(&self) -> LinkResult<()> {
        if !(0.0..=1.0).contains(&self.reroute_probability) {
            return Err(LinkError::Config(format!(
                "rerouting probability {} is outside 0.0..=1.0",
                self.reroute_probability
            )));
        }
        if self.reroute_period_ticks == 0 {
            return Err(LinkError::Config(
                "rerouting period must be at least 1 tick".into(),
            ));
        }
        Ok(())
    }

    /// Full path of the binary to launch, honoring the GUI flag and the
    /// platform executable suffix.
    pub fn binary_path(&self) -> PathBuf {
        let name = if self.gui { GUI_BINARY } else { HEADLESS_BINARY };
        self.home
            .join("bin")
            .join(format!("{name}{}", env::consts::EXE_SUFFIX))
    }

    /// Render the engine command line.
    pub fn command_args(&self) -> Vec<String> {
        let mut args = vec![
            "-c".into(),
            self.scenario.display().to_string(),
            "--remote-port".into(),
            self.port.to_string(),
        ];
        if self.auto_start {
            args.push("--start".into());
        }
        if self.quit_on_end {
            args.push("--quit-on-end".into());
        }
        args.extend([
            "--device.rerouting.probability".into(),
            self.reroute_probability.to_string(),
            "--device.rerouting.period".into(),
            self.reroute_period_ticks.to_string(),
            "--error-log".into(),
            self.error_log.display().to_string(),
        ]);
        args
    }
}
