//! Stateful services built on the pure calculations and a [`TimeStore`].
//!
//! [`TimeStore`]: crate::store::TimeStore

mod auto_close;
mod balance;
mod punch_writer;

pub use auto_close::{
    AutoCloseFailure, AutoCloseReport, AutoCloser, AutoCloserState, CloseAction, plan_close,
};
pub use balance::{BalanceAccumulator, DayBalance, EmployeeGuard};
pub use punch_writer::{PunchWriter, WriteOutcome};
