pub mod spec;

pub(crate) use spec::{load_document, write_document};
