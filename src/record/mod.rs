pub mod payload;
pub mod player;

pub use payload::{BootstrapStatic, WeekSnapshot};
pub use player::{records_from_array, PlayerRecord};
