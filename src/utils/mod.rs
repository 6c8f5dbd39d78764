//! Small shared helpers.

mod class_list;

pub use class_list::{class_list, filter_join};
