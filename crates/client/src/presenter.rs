//! Presentation sink.

use tankstellen_core::Street;

/// Receives everything the sync controller wants to show.
///
/// Implementations decide how rows, notices and errors are displayed; the
/// controller never formats output itself.
pub trait Presenter {
    /// Show the current view of the listing, already filtered and sorted.
    fn render(&mut self, streets: &[Street]);

    /// Show a success notice.
    fn notify(&mut self, message: &str);

    /// Show a failure.
    fn report_error(&mut self, message: &str);
}
