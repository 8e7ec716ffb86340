mod payload;
mod query;
mod settings;
mod task;
mod threshold;
mod title;

pub use crate::{payload::*, query::*, settings::*, task::*, threshold::*, title::*};
