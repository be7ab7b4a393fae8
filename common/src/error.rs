use thiserror::Error;

/// Fatal input problems. These are detected before any search iteration
/// runs and are never recovered from.
#[derive(Debug, Error, PartialEq)]
pub enum DesignError {
    #[error("duplicate component id {0}")]
    DuplicateId(u32),
    #[error("component {id} has unsupported terminal count {terminals} (expected 2 or 3)")]
    BadTerminalCount { id: u32, terminals: u8 },
    #[error("component {0} connection table does not match its terminal count")]
    ConnectionShape(u32),
    #[error("connection references unknown terminal {0}")]
    DanglingTerminal(String),
    #[error("terminal {0} is connected to itself")]
    SelfLoop(String),
    #[error("terminal {0} participates in more than one net")]
    SharedTerminal(String),
    #[error("design needs {needed} terminal cells but the {core}x{core} core holds only {capacity}")]
    DoesNotFit {
        needed: usize,
        core: u32,
        capacity: usize,
    },
    #[error("core grid must be at least 2x2 (got {0})")]
    CoreTooSmall(u32),
}

/// A single placement attempt ran out of resamples. Recoverable: the
/// search loop rejects the attempt and draws a fresh seed.
#[derive(Debug, Error, PartialEq)]
#[error("no legal position for component {component} after {attempts} samples")]
pub struct PlacementError {
    pub component: u32,
    pub attempts: usize,
}

/// A routing attempt failed even after reordering the nets. Recoverable:
/// the search loop rejects the attempt.
#[derive(Debug, Error, PartialEq)]
#[error("net {net} unroutable after {reshuffles} net-order reshuffles")]
pub struct RouteError {
    pub net: u32,
    pub reshuffles: usize,
}

/// Aggregate outcome of the whole synthesis run.
#[derive(Debug, Error, PartialEq)]
pub enum SynthError {
    #[error(transparent)]
    InvalidDesign(#[from] DesignError),
    #[error("no routable layout found in {iterations} iterations")]
    NoLayoutFound { iterations: usize },
}
