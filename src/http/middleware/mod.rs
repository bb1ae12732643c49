//! Request pipeline middleware.

pub mod html_fallback;
pub mod memory_files;
pub mod root_guard;

pub use html_fallback::html_fallback_middleware;
pub use memory_files::memory_files_middleware;
pub use root_guard::root_guard_middleware;
