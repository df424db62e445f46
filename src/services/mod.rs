pub mod calendar;
pub mod recommendations;

pub use calendar::{CalendarProvider, StaticCalendar};
pub use recommendations::{CurationRules, RecommendationEngine, Shuffler};
