pub mod date_item;
pub mod macros;
pub mod schedule;
pub mod schedule_list;
pub mod subject;
pub mod time;

pub use date_item::*;
pub use schedule::*;
pub use schedule_list::*;
pub use subject::*;
pub use time::*;
