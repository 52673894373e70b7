use log::info;

/// Sink for human-readable status lines emitted while a search runs. Reporting is
/// best-effort: it cannot fail from the search's point of view, so a sink backed by
/// something fallible has to deal with its own errors.
pub trait ProgressReporter {
    fn report(&mut self, status: &str);
}

impl<F> ProgressReporter for F
where
    F: FnMut(&str),
{
    fn report(&mut self, status: &str) {
        self(status)
    }
}

/// Forwards every status to the [log] facade at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report(&mut self, status: &str) {
        info!("{}", status);
    }
}
