use simos_info::Pid;

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcError {
    #[error("no process ids left")]
    PidsExhausted,
    #[error("no process with pid {0}")]
    UnknownPid(Pid),
}
