pub mod driver;
pub mod schedule;
pub mod team;

pub use driver::DriverRepository;
pub use schedule::ScheduleRepository;
pub use team::TeamRepository;
