//! Manual targeting.
//!
//! `TargetingSession` collects picks from external input (a click or tap
//! handler) and hands the finished list back to whoever opened it, tagged
//! with the `SessionTicket` of the request.

mod session;

pub use session::{
    filter_by_pos_hit, ManualRequest, Picks, RejectReason, Selection, SessionTicket,
    TargetingSession,
};
