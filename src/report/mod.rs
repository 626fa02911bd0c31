//! View models composed from the calendar and finance layers, plus their
//! terminal rendering.

pub mod dashboard;
pub mod render;
pub mod schedule;
pub mod table;

pub use dashboard::{DashboardReport, ReportRequest};
pub use render::render_text;
pub use schedule::{DayCell, SchedulePage};
