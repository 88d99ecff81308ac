pub mod dereference;
pub mod merge;
pub mod upgrade;

pub use dereference::dereference_document;
pub use merge::merge_documents;
pub use upgrade::upgrade_document;
