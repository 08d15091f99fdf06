pub mod errors;
pub mod events;
pub mod logging;
pub mod timeline;
