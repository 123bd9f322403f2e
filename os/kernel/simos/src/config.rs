//! Command-line configuration of the simulated machine.

use core::str::FromStr;
use log::LevelFilter;
use simos_info::sched::QUEUE_CAPACITY_LIMIT;
use simos_mm::{MemoryConfig, MemoryConfigError};
use simos_sched::SchedulerConfig;

pub const USAGE: &str = "\
Usage: simos [OPTIONS]

Options:
  --ram-size <BYTES>       Physical RAM, a multiple of the page size
  --queue-capacity <N>     Entries per scheduler queue
  --workers <N>            Worker threads running the demo workload
  --processes <N>          Processes spawned for the demo workload
  --bursts <N>             Dispatches per process before it finishes
  --log-level <LEVEL>      off, error, warn, info, debug or trace
  -h, --help               Print this help";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown option {0}")]
    UnknownOption(String),
    #[error("option {0} requires a value")]
    MissingValue(String),
    #[error("invalid value {value:?} for {option}")]
    InvalidValue { option: String, value: String },
    #[error(transparent)]
    Memory(#[from] MemoryConfigError),
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("{option} must not exceed {max}")]
    TooLarge { option: &'static str, max: usize },
    #[error("{processes} processes do not fit a scheduler queue of {capacity}")]
    TooManyProcesses { processes: usize, capacity: usize },
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(MachineConfig),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub memory: MemoryConfig,
    pub scheduler: SchedulerConfig,
    pub workers: usize,
    pub processes: usize,
    pub bursts: u32,
    pub log_level: LevelFilter,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory: MemoryConfig::default(),
            scheduler: SchedulerConfig::default(),
            workers: 4,
            processes: 6,
            bursts: 4,
            log_level: LevelFilter::Info,
        }
    }
}

impl MachineConfig {
    /// Parses command-line arguments, program name excluded.
    ///
    /// # Errors
    /// Unknown options, missing or malformed values, and combinations the
    /// machine cannot run.
    pub fn from_args<I>(args: I) -> Result<Invocation, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "--ram-size" => {
                    config.memory = MemoryConfig::new(value(&arg, args.next())?)?;
                }
                "--queue-capacity" => {
                    config.scheduler = SchedulerConfig::with_capacity(value(&arg, args.next())?);
                }
                "--workers" => config.workers = value(&arg, args.next())?,
                "--processes" => config.processes = value(&arg, args.next())?,
                "--bursts" => config.bursts = value(&arg, args.next())?,
                "--log-level" => config.log_level = value(&arg, args.next())?,
                _ => return Err(ConfigError::UnknownOption(arg)),
            }
        }
        config.validate()?;
        Ok(Invocation::Run(config))
    }

    /// Checks the combination of settings.
    ///
    /// # Errors
    /// See [`ConfigError`].
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.capacity == 0 {
            return Err(ConfigError::Zero("--queue-capacity"));
        }
        if self.scheduler.capacity > QUEUE_CAPACITY_LIMIT {
            return Err(ConfigError::TooLarge {
                option: "--queue-capacity",
                max: QUEUE_CAPACITY_LIMIT,
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::Zero("--workers"));
        }
        if self.processes > self.scheduler.capacity {
            return Err(ConfigError::TooManyProcesses {
                processes: self.processes,
                capacity: self.scheduler.capacity,
            });
        }
        Ok(())
    }
}

fn value<T: FromStr>(option: &str, raw: Option<String>) -> Result<T, ConfigError> {
    let raw = raw.ok_or_else(|| ConfigError::MissingValue(option.to_string()))?;
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        option: option.to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use simos_info::memory::PAGE_SIZE;

    fn parse(args: &[&str]) -> Result<Invocation, ConfigError> {
        MachineConfig::from_args(args.iter().map(ToString::to_string))
    }

    #[test]
    fn no_arguments_runs_the_defaults() {
        assert_eq!(parse(&[]), Ok(Invocation::Run(MachineConfig::default())));
    }

    #[test]
    fn every_option_is_applied() {
        let Ok(Invocation::Run(config)) = parse(&[
            "--ram-size",
            "8192",
            "--queue-capacity",
            "3",
            "--workers",
            "2",
            "--processes",
            "3",
            "--bursts",
            "7",
            "--log-level",
            "trace",
        ]) else {
            panic!("expected a run configuration");
        };
        assert_eq!(config.memory.frames(), 8192 / PAGE_SIZE as usize);
        assert_eq!(config.scheduler.capacity, 3);
        assert_eq!(config.workers, 2);
        assert_eq!(config.processes, 3);
        assert_eq!(config.bursts, 7);
        assert_eq!(config.log_level, LevelFilter::Trace);
    }

    #[test]
    fn help_wins_over_later_garbage() {
        assert_eq!(parse(&["--help", "--bogus"]), Ok(Invocation::Help));
    }

    #[test]
    fn malformed_input_is_reported() {
        assert_eq!(
            parse(&["--bogus"]),
            Err(ConfigError::UnknownOption("--bogus".into()))
        );
        assert_eq!(
            parse(&["--workers"]),
            Err(ConfigError::MissingValue("--workers".into()))
        );
        assert_eq!(
            parse(&["--workers", "many"]),
            Err(ConfigError::InvalidValue {
                option: "--workers".into(),
                value: "many".into()
            })
        );
        assert_eq!(
            parse(&["--ram-size", "1000"]),
            Err(ConfigError::Memory(MemoryConfigError::Unaligned(1000)))
        );
    }

    #[test]
    fn oversized_queues_are_rejected_before_allocation() {
        let huge = (QUEUE_CAPACITY_LIMIT + 1).to_string();
        assert_eq!(
            parse(&["--queue-capacity", &huge]),
            Err(ConfigError::TooLarge {
                option: "--queue-capacity",
                max: QUEUE_CAPACITY_LIMIT
            })
        );
        assert_eq!(
            parse(&["--queue-capacity", &usize::MAX.to_string()]),
            Err(ConfigError::TooLarge {
                option: "--queue-capacity",
                max: QUEUE_CAPACITY_LIMIT
            })
        );
        let limit = QUEUE_CAPACITY_LIMIT.to_string();
        assert!(matches!(
            parse(&["--queue-capacity", &limit]),
            Ok(Invocation::Run(_))
        ));
    }

    #[test]
    fn unrunnable_combinations_are_rejected() {
        assert_eq!(parse(&["--workers", "0"]), Err(ConfigError::Zero("--workers")));
        assert_eq!(
            parse(&["--queue-capacity", "2", "--processes", "3"]),
            Err(ConfigError::TooManyProcesses {
                processes: 3,
                capacity: 2
            })
        );
    }
}
