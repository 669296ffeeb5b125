//! Kiosk session logic for Lobby.
//!
//! Everything the tablet's screens need, with the screens themselves left
//! to the front end: the check-in, check-out, and preregistered one-tap
//! workflows, the live visitor-board projection, employee search, the
//! hidden-admin tap gate, and the admin authorization gate. All of it is
//! driven by the store and auth traits from `lobby-core`, so every piece
//! is testable with in-memory fakes.

pub mod board;
pub mod check_in;
pub mod check_out;
pub mod form;
pub mod gate;
pub mod notifier;
pub mod prereg;
pub mod tap;

pub use board::{BoardFeed, VisitorRow, filter_employees, project};
pub use check_in::{CheckInError, CheckInOutcome, CheckInWorkflow};
pub use check_out::CheckOutWorkflow;
pub use form::{CheckInInput, Guest, GuestForm};
pub use gate::{AdminGate, DirectoryState};
pub use notifier::HttpNotifier;
pub use prereg::{PreregCheckInError, PreregError, PreregOutcome, PreregWorkflow};
pub use tap::{NavTarget, TapGate};
