// Script console: options, timed logging, timers and reports

use crate::error::{ConsoleError, Result};
use crate::options::{self, ArgValue};
use handlebars::Handlebars;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Timer started when the console is created and stopped by [`Console::end`]
pub const SCRIPT_TIMER: &str = "__scriptbegin__";

/// Help file looked up when `--help` is given
pub const DEFAULT_README: &str = "readme.txt";

/// Shown when there is no help file
pub const NO_HELP_MESSAGE: &str = "No help is available for this script";

/// A named timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub start: Instant,
    pub end: Option<Instant>,
}

impl Timer {
    fn started() -> Self {
        Self {
            start: Instant::now(),
            end: None,
        }
    }

    /// Elapsed time between start and stop, `None` while running
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end.duration_since(self.start))
    }
}

/// Builder for [`Console`]
pub struct ConsoleBuilder {
    name: String,
    short: String,
    long: Vec<String>,
    defaults: Vec<(String, ArgValue)>,
    readme: PathBuf,
    writer: Option<Box<dyn Write + Send>>,
}

impl ConsoleBuilder {
    fn new() -> Self {
        Self {
            name: "script".to_string(),
            short: String::new(),
            long: Vec::new(),
            defaults: Vec::new(),
            readme: PathBuf::from(DEFAULT_README),
            writer: None,
        }
    }

    /// Name used in usage errors
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Short options, e.g. `"ab:c::"`
    pub fn short_options(mut self, spec: impl Into<String>) -> Self {
        self.short = spec.into();
        self
    }

    /// Long options, e.g. `["verbose", "file:", "level::"]`
    pub fn long_options<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.long.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Value used when the option is not given
    pub fn default(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.defaults.push((name.into(), value.into()));
        self
    }

    /// Default flag used when the option is not given
    pub fn default_flag(mut self, name: impl Into<String>) -> Self {
        self.defaults.push((name.into(), ArgValue::Flag));
        self
    }

    /// Help file printed for `--help`
    pub fn readme(mut self, path: impl Into<PathBuf>) -> Self {
        self.readme = path.into();
        self
    }

    /// Destination of log output (stdout by default)
    pub fn writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Parse the process arguments
    pub fn parse(self) -> Result<Console> {
        self.parse_from(std::env::args_os())
    }

    /// Parse `args`; the first item is the program name
    pub fn parse_from<I, T>(self, args: I) -> Result<Console>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut long = self.long;
        if !long.iter().any(|l| l.trim_end_matches(':') == "help") {
            long.push("help::".to_string());
        }

        let defs = options::parse_specs(&self.short, &long)?;
        let matches = options::build_command(&self.name, &defs).try_get_matches_from(args)?;

        let mut args: HashMap<String, ArgValue> = self.defaults.into_iter().collect();
        args.extend(options::collect_args(&defs, &matches));
        debug!("Parsed {} console arguments", args.len());

        let mut console = Console {
            args,
            operands: options::collect_operands(&matches),
            last_log: Instant::now(),
            timers: BTreeMap::new(),
            writer: self
                .writer
                .unwrap_or_else(|| Box::new(io::stdout()) as Box<dyn Write + Send>),
            readme: self.readme,
            help_shown: false,
        };
        console.timer_start(SCRIPT_TIMER);

        if console.is_arg_set("help") {
            console.show_help()?;
            console.end(false)?;
        }

        Ok(console)
    }
}

/// Helper for command-line scripts
///
/// ```no_run
/// use fieldwork_console::Console;
///
/// let mut console = Console::builder()
///     .short_options("v")
///     .long_options(["input:"])
///     .default("input", "data.csv")
///     .parse()?;
///
/// let input = console.get_arg("input").and_then(|v| v.as_str()).unwrap_or_default().to_string();
/// console.log(format!("Reading {}", input), true)?;
/// console.end(true)?;
/// # Ok::<(), fieldwork_console::ConsoleError>(())
/// ```
pub struct Console {
    args: HashMap<String, ArgValue>,
    operands: Vec<String>,
    last_log: Instant,
    timers: BTreeMap<String, Timer>,
    writer: Box<dyn Write + Send>,
    readme: PathBuf,
    help_shown: bool,
}

impl Console {
    pub fn builder() -> ConsoleBuilder {
        ConsoleBuilder::new()
    }

    /// Value of an option, given or defaulted
    pub fn get_arg(&self, name: &str) -> Option<&ArgValue> {
        self.args.get(name)
    }

    pub fn is_arg_set(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    pub fn args(&self) -> &HashMap<String, ArgValue> {
        &self.args
    }

    /// Positional arguments
    pub fn operands(&self) -> &[String] {
        &self.operands
    }

    /// Whether `--help` was handled while parsing
    pub fn help_shown(&self) -> bool {
        self.help_shown
    }

    /// Print the help file, or a notice when there is none
    pub fn show_help(&mut self) -> Result<()> {
        self.help_shown = true;
        match fs::read_to_string(&self.readme) {
            Ok(help) => self.log(help, false),
            Err(e) => {
                trace!("No help file at {}: {}", self.readme.display(), e);
                self.log(NO_HELP_MESSAGE, true)
            }
        }
    }

    /// Write a line, optionally followed by ` [s.ss]` seconds since the previous timed line
    pub fn log(&mut self, msg: impl fmt::Display, show_time_diff: bool) -> Result<()> {
        if show_time_diff {
            let now = Instant::now();
            let diff = now.duration_since(self.last_log).as_secs_f64();
            self.last_log = now;
            writeln!(self.writer, "{} [{:.2}]", msg, diff)?;
        } else {
            writeln!(self.writer, "{}", msg)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// Start (or restart) a named timer
    pub fn timer_start(&mut self, name: impl Into<String>) {
        let name = name.into();
        trace!("Starting timer {}", name);
        self.timers.insert(name, Timer::started());
    }

    /// Stop a named timer and return its duration
    pub fn timer_stop(&mut self, name: &str) -> Result<Duration> {
        let timer = self
            .timers
            .get_mut(name)
            .ok_or_else(|| ConsoleError::UnknownTimer(name.to_string()))?;
        let end = Instant::now();
        timer.end = Some(end);
        Ok(end.duration_since(timer.start))
    }

    pub fn timers(&self) -> &BTreeMap<String, Timer> {
        &self.timers
    }

    /// Stop the script timer, optionally logging `Completed in N seconds`
    pub fn end(&mut self, show_duration: bool) -> Result<Duration> {
        let duration = self.timer_stop(SCRIPT_TIMER)?;
        if show_duration {
            self.log(
                format!("Completed in {} seconds", duration.as_secs_f64()),
                true,
            )?;
        }
        Ok(duration)
    }

    /// Render the handlebars template at `template` with `data` and write it to `location`
    pub fn generate_report<T, P, Q>(&self, data: &T, template: P, location: Q) -> Result<()>
    where
        T: Serialize,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let source = fs::read_to_string(template.as_ref())?;
        let hbs = Handlebars::new();
        let rendered = hbs.render_template(&source, data)?;
        fs::write(location.as_ref(), rendered)?;
        debug!(
            "Report {} written to {}",
            template.as_ref().display(),
            location.as_ref().display()
        );
        Ok(())
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("args", &self.args)
            .field("operands", &self.operands)
            .field("timers", &self.timers.keys().collect::<Vec<_>>())
            .field("help_shown", &self.help_shown)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn console(argv: &[&str], out: &Captured) -> Console {
        Console::builder()
            .short_options("ab:")
            .long_options(["level::"])
            .readme("/nonexistent/readme.txt")
            .writer(Box::new(out.clone()))
            .parse_from(argv)
            .unwrap()
    }

    #[test]
    fn test_defaults_are_overridden() {
        let out = Captured::default();
        let console = Console::builder()
            .short_options("b:")
            .default("b", "fallback")
            .default("mode", "fast")
            .writer(Box::new(out.clone()))
            .parse_from(["script", "-b", "given"])
            .unwrap();

        assert_eq!(console.get_arg("b"), Some(&ArgValue::from("given")));
        assert_eq!(console.get_arg("mode"), Some(&ArgValue::from("fast")));
        assert_eq!(console.get_arg("missing"), None);
        assert!(!console.is_arg_set("missing"));
    }

    #[test]
    fn test_log_time_diff_suffix() {
        let out = Captured::default();
        let mut console = console(&["script"], &out);

        console.log("first", true).unwrap();
        console.log("second", false).unwrap();

        let text = out.text();
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("first ["));
        assert!(lines[0].ends_with(']'));
        assert_eq!(lines[1], "second");
    }

    #[test]
    fn test_help_without_readme() {
        let out = Captured::default();
        let console = console(&["script", "--help"], &out);

        assert!(console.help_shown());
        assert!(out.text().starts_with(NO_HELP_MESSAGE));
        assert!(console.timers()[SCRIPT_TIMER].duration().is_some());
    }

    #[test]
    fn test_timers() {
        let out = Captured::default();
        let mut console = console(&["script"], &out);

        console.timer_start("load");
        assert!(console.timers()["load"].duration().is_none());
        console.timer_stop("load").unwrap();
        assert!(console.timers()["load"].duration().is_some());

        assert!(matches!(
            console.timer_stop("never"),
            Err(ConsoleError::UnknownTimer(_))
        ));
    }

    #[test]
    fn test_end_logs_completion() {
        let out = Captured::default();
        let mut console = console(&["script"], &out);

        console.end(true).unwrap();
        assert!(out.text().starts_with("Completed in "));
    }
}
