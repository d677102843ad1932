//! Horde Sim headless runner
//!
//! Drives the simulation with an autopilot at a fixed 60 Hz timestep for soak
//! and stress testing. Logging goes through `env_logger` (`RUST_LOG=info`);
//! the final run summary is printed to stdout as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;
    use glam::Vec2;
    use horde_sim::consts::{DEFAULT_SEED, SIM_DT};
    use horde_sim::sim::{GameState, TickInput, tick};
    use horde_sim::{SimConfig, SimResult, StressPreset, direction_from_angle};

    /// Log a summary every this many ticks (10 s of simulated time)
    const SUMMARY_EVERY: u64 = 600;

    /// Headless horde simulation with an autopilot player
    #[derive(Debug, Clone, PartialEq, Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Seed for the simulation RNG.
        #[arg(long, value_name = "SEED", default_value_t = DEFAULT_SEED)]
        pub seed: u64,
        /// Number of 60 Hz ticks to simulate.
        #[arg(
            long,
            value_name = "COUNT",
            default_value_t = 60 * 60 * 5,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        pub ticks: u64,
        /// Stress preset: off, busy, swarm or meltdown.
        #[arg(long, value_name = "NAME", default_value = "off", value_parser = StressPreset::parse)]
        pub preset: StressPreset,
        /// JSON tuning file; omitted keys keep their defaults.
        #[arg(long, value_name = "PATH")]
        pub config: Option<PathBuf>,
    }

    /// Circle the arena; resolve prompts as soon as they appear
    fn autopilot(state: &mut GameState) -> SimResult<TickInput> {
        if let Some(&id) = state.upgrade_choices().and_then(|choices| choices.first()) {
            state.select_upgrade(id)?;
        }
        if state.relic_reveal().is_some() {
            state.skip_relic_reveal()?;
            let relic = state.claim_relic()?;
            log::info!("Autopilot claimed relic {relic}");
        }
        let t = state.clock.now();
        let heading = direction_from_angle(t * 0.35) + Vec2::new((t * 1.3).sin() * 0.3, 0.0);
        Ok(TickInput {
            movement: heading,
            pause: false,
        })
    }

    pub fn run(args: &Args) -> SimResult<()> {
        let config = match &args.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        let mut state = GameState::new(config, args.seed);
        if args.preset != StressPreset::Off {
            state.set_stress_preset(args.preset);
        }
        log::info!(
            "Running {} ticks, seed {}, preset {}",
            args.ticks,
            args.seed,
            args.preset.as_str()
        );

        for frame in 1..=args.ticks {
            let input = autopilot(&mut state)?;
            tick(&mut state, &input, SIM_DT);
            if frame % SUMMARY_EVERY == 0 {
                let s = state.summary();
                log::info!(
                    "t={:.0}s level={} hp={:.0} enemies={} projectiles={} orbs={} kills={}",
                    s.sim_secs,
                    s.level,
                    s.health,
                    s.enemies,
                    s.projectiles,
                    s.orbs,
                    s.kills
                );
            }
            if state.is_game_over() {
                break;
            }
        }

        let summary = state.summary();
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    pub fn main() -> ExitCode {
        env_logger::init();
        let args = match Args::try_parse() {
            Ok(args) => args,
            Err(e) => {
                // Usage errors exit with 2; --help and --version with 0
                let _ = e.print();
                return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
            }
        };
        match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("Run failed: {e}");
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Result<Args, clap::Error> {
            Args::try_parse_from(std::iter::once("horde-sim").chain(list.iter().copied()))
        }

        #[test]
        fn defaults_without_flags() {
            let parsed = args(&[]).unwrap();
            assert_eq!(parsed.seed, DEFAULT_SEED);
            assert_eq!(parsed.ticks, 60 * 60 * 5);
            assert_eq!(parsed.preset, StressPreset::Off);
            assert!(parsed.config.is_none());
        }

        #[test]
        fn parses_all_flags() {
            let parsed = args(&["--seed", "7", "--ticks", "100", "--preset", "swarm", "--config", "a.json"])
                .unwrap();
            assert_eq!(parsed.seed, 7);
            assert_eq!(parsed.ticks, 100);
            assert_eq!(parsed.preset, StressPreset::Swarm);
            assert_eq!(parsed.config, Some(PathBuf::from("a.json")));
        }

        #[test]
        fn rejects_bad_input() {
            assert!(args(&["--ticks"]).is_err());
            assert!(args(&["--ticks", "0"]).is_err());
            assert!(args(&["--seed", "abc"]).is_err());
            assert!(args(&["--preset", "apocalypse"]).is_err());
            assert!(args(&["--bogus"]).is_err());
        }

        #[test]
        fn short_autopilot_run_succeeds() {
            let parsed = args(&["--ticks", "600"]).unwrap();
            run(&parsed).unwrap();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    runner::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless runner is native only
}
