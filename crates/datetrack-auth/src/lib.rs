pub mod storage;

pub use storage::{Profile, Session, SessionStorage, CALENDAR_SCOPE};
