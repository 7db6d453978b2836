//! Where profile HTML comes from.
//!
//! - [`source::HtmlSource`]: anything that can hand over the experience markup
//! - [`source::FileSource`]: a saved page on disk
//! - [`browser::linkedin::LinkedInCapturer`]: a live, logged-in WebDriver session
//! - [`browser::driver::FolioDriver`]: the `fantoccini` session wrapper both use
pub mod browser;
pub mod source;

pub use browser::driver::FolioDriver;
pub use browser::linkedin::LinkedInCapturer;
pub use source::{FileSource, HtmlSource};
