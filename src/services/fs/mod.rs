pub mod copy;
pub mod listing;
pub mod owners;
pub mod reverse;
