mod menu_vm;
mod session_vm;
mod summary_vm;
mod time_fmt;

pub use menu_vm::{MenuAction, MenuVm};
pub use session_vm::{ChoiceMark, SessionIntent, SessionPhase, SessionVm};
pub use summary_vm::SummaryVm;
pub use time_fmt::{format_duration, format_minutes};

#[cfg(test)]
pub(crate) use session_vm::test_support;
