pub mod driver;
pub mod schedule;
pub mod team;

pub use driver::{DriverEvent, DriverRoundResult, DriverStanding};
pub use schedule::ScheduleEntry;
pub use team::{TeamEvent, TeamStanding, normalize_color};
