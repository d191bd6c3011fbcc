pub mod class_entry;
pub mod class_type;
pub mod day;
pub mod room;
pub mod teacher;
pub mod time_slot;
