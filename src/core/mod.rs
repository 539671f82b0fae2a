mod error;
mod record;

pub use error::{MirrorError, Result};
pub use record::Record;
