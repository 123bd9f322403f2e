use log::{error, info};
use simos::{Invocation, Machine, MachineConfig, StderrLogger, config::USAGE};
use simos_sched::Priority;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match MachineConfig::from_args(env::args().skip(1)) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = StderrLogger::new(config.log_level).init() {
        eprintln!("error: cannot install logger: {e}");
        return ExitCode::FAILURE;
    }

    let machine = Machine::new(&config);
    for i in 0..config.processes {
        let priority = Priority::new(u32::try_from(i % 4).unwrap_or(0));
        if let Err(e) = machine.spawn(priority) {
            error!("cannot spawn process {i}: {e}");
            return ExitCode::FAILURE;
        }
    }

    let report = machine.run_workers(config.workers, config.bursts);
    info!(
        "{} dispatches, {} allocations ({} refused), {} releases",
        report.dispatches, report.allocations, report.failed_allocations, report.releases
    );

    print!("{}", machine.dump_state());

    let freed = machine.terminate_all();
    info!("{freed} frames freed, {} free", machine.memory().free_frames());

    if report.crashed_workers > 0 {
        error!("{} workers panicked", report.crashed_workers);
        return ExitCode::FAILURE;
    }
    if report.mismatches > 0 {
        error!("{} bytes did not read back as written", report.mismatches);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
