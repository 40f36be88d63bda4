use std::io;

use indicatif::{MultiProgress, ProgressBar, ProgressState, ProgressStyle};

use crate::cli::color::{GREEN, RED};

impl super::Cli {
    /// Creates a progress spinner that plays nicely with logging. Hidden when
    /// stderr is not a terminal.
    pub(crate) fn new_spinner(&self) -> ProgressBar {
        fn elapsed_decimal(state: &ProgressState, w: &mut dyn std::fmt::Write) {
            let secs = state.elapsed().as_secs_f64();
            write!(w, "[{secs:.1}s]").unwrap()
        }
        fn current_timestamp(_state: &ProgressState, w: &mut dyn std::fmt::Write) {
            write!(w, "{}", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")).unwrap();
        }

        // This format aligns with the log output.
        let progress = ProgressBar::new_spinner().with_style(
            ProgressStyle::with_template(
                "{current_timestamp:.dim} {elapsed_decimal:<8.dim} {msg:.blue} {spinner:.cyan/blue}",
            )
            .unwrap()
            .with_key("elapsed_decimal", elapsed_decimal)
            .with_key("current_timestamp", current_timestamp)
            .tick_strings(&["⠋", "⠙", "⠚", "⠞", "⠖", "⠦", "⠴", "⠲", "⠳", "⠓", ""]),
        );

        self.multiprogress.add(progress)
    }
}

pub(crate) trait ProgressExt {
    fn finish_with_failed(&self);
    fn finish_with_done(&self);
    fn finish_with_append(&self, msg: impl std::fmt::Display);
}

impl ProgressExt for ProgressBar {
    fn finish_with_failed(&self) {
        self.finish_with_append(format_args!("{RED}failed{RED:#}"))
    }

    fn finish_with_done(&self) {
        self.finish_with_append(format_args!("{GREEN}done{GREEN:#}"))
    }

    fn finish_with_append(&self, msg: impl std::fmt::Display) {
        self.finish_with_message(format!("{} {msg}", self.message()));
    }
}

/// A log writer that hides any active spinners while a line is written, so
/// the two don't garble each other.
#[derive(Clone)]
pub(crate) struct SuspendingWriter(MultiProgress);

impl SuspendingWriter {
    pub(crate) fn new(multiprogress: MultiProgress) -> Self {
        Self(multiprogress)
    }
}

impl io::Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.suspend(|| io::stderr().lock().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SuspendingWriter {
    type Writer = SuspendingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
