//! Running an agent against the shared arena: the tick loop and the
//! messages it sends to teams.

mod notify;
mod session;

pub use notify::{LogNotifier, Notifier, RecordingNotifier};
pub use session::{Session, SessionEnd};
