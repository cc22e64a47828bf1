mod catalog;
mod collect;
mod parse;
mod record;
mod window;

pub use catalog::{detail_embeds, load_categories};
pub use collect::load_category;
pub use record::{Dataset, Record, TopicId};
#[cfg(test)]
pub(crate) use record::test_record;
#[cfg(test)]
pub(crate) use window::periods;
pub use window::{N_MAX, WINDOW_SPAN, WindowEntry, select_window, window_of};
