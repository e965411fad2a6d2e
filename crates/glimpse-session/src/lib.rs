//! Glimpse session crate - extraction session, phase state machine, and presentation.
//!
//! The `ExtractionSession` owns the three pieces of session state (image
//! reference, recognition result, extracted fields), drives them through the
//! phase machine Idle -> Loading -> Success / NoMatch / Error, raises
//! user-visible notices, and publishes a `SessionEvent` after every
//! transition so a front end can re-render from a fresh snapshot.

pub mod clipboard;
pub mod notice;
pub mod session;
pub mod state;
pub mod view;

pub use clipboard::{Clipboard, CommandClipboard, DemoLinkHelper, MockClipboard};
pub use notice::{Notifier, RecordingNotifier};
pub use session::{ConvertOutcome, ExtractionSession, SessionState};
pub use state::{PhaseMachine, SessionPhase};
pub use view::{Panel, View};
