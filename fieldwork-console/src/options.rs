//! getopt-style option specs.
//!
//! Short options are a string of letters where a trailing `:` marks a
//! required value and `::` an optional one (`"ab:c::"`). Long options are
//! names with the same suffixes (`"file:"`, `"level::"`). The specs are
//! turned into a clap [`Command`] so parsing, bundling (`-ab`) and usage
//! errors come from clap.

use crate::error::{ConsoleError, Result};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashMap;

/// Id of the positional arguments left after the options
pub(crate) const OPERANDS_ID: &str = "__operands__";

/// Whether an option takes a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// `a`, `verbose`
    None,
    /// `b:`, `file:`
    Required,
    /// `c::`, `level::`
    Optional,
}

impl ValueMode {
    fn from_colons(colons: usize, name: &str) -> Result<Self> {
        match colons {
            0 => Ok(ValueMode::None),
            1 => Ok(ValueMode::Required),
            2 => Ok(ValueMode::Optional),
            _ => Err(ConsoleError::InvalidSpec(format!(
                "'{}' has too many ':' suffixes",
                name
            ))),
        }
    }
}

/// A single declared option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    pub name: String,
    pub short: Option<char>,
    pub long: bool,
    pub mode: ValueMode,
}

/// Value of a parsed option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Present without a value
    Flag,
    /// Present with a value
    Value(String),
}

impl ArgValue {
    /// The value, if the option carried one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Flag => None,
            ArgValue::Value(v) => Some(v),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Value(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Value(value)
    }
}

/// Parse a short option string such as `"ab:c::"`
pub fn parse_short_spec(spec: &str) -> Result<Vec<OptionDef>> {
    let chars: Vec<char> = spec.chars().collect();
    let mut defs = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !c.is_ascii_alphanumeric() {
            return Err(ConsoleError::InvalidSpec(format!(
                "'{}' is not a valid short option in \"{}\"",
                c, spec
            )));
        }

        let mut colons = 0;
        while i + 1 + colons < chars.len() && chars[i + 1 + colons] == ':' {
            colons += 1;
        }

        let name = c.to_string();
        defs.push(OptionDef {
            mode: ValueMode::from_colons(colons, &name)?,
            name,
            short: Some(c),
            long: false,
        });
        i += 1 + colons;
    }

    Ok(defs)
}

/// Parse one long option such as `"file:"`
pub fn parse_long_spec(spec: &str) -> Result<OptionDef> {
    let name = spec.trim_end_matches(':');
    let colons = spec.len() - name.len();

    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConsoleError::InvalidSpec(format!(
            "\"{}\" is not a valid long option",
            spec
        )));
    }

    Ok(OptionDef {
        name: name.to_string(),
        short: None,
        long: true,
        mode: ValueMode::from_colons(colons, name)?,
    })
}

/// Parse both specs, merging a long option into a short one of the same name
pub fn parse_specs<S: AsRef<str>>(short: &str, long: &[S]) -> Result<Vec<OptionDef>> {
    let mut defs = parse_short_spec(short)?;

    for spec in long {
        let def = parse_long_spec(spec.as_ref())?;
        match defs.iter_mut().find(|d| d.name == def.name) {
            Some(existing) => {
                existing.long = true;
                if existing.mode == ValueMode::None {
                    existing.mode = def.mode;
                }
            }
            None => defs.push(def),
        }
    }

    Ok(defs)
}

/// Build the clap command for a set of option definitions
pub fn build_command(name: &str, defs: &[OptionDef]) -> Command {
    let mut cmd = Command::new(name.to_string())
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new(OPERANDS_ID)
                .num_args(0..)
                .action(ArgAction::Append)
                .hide(true),
        );

    for def in defs {
        let mut arg = Arg::new(def.name.clone());
        if let Some(c) = def.short {
            arg = arg.short(c);
        }
        if def.long {
            arg = arg.long(def.name.clone());
        }

        arg = match def.mode {
            ValueMode::None => arg.action(ArgAction::SetTrue),
            ValueMode::Required => arg.action(ArgAction::Set).num_args(1),
            ValueMode::Optional => {
                let arg = arg
                    .action(ArgAction::Set)
                    .num_args(0..=1)
                    .default_missing_value("");
                // --level value would otherwise eat the next operand
                if def.short.is_none() {
                    arg.require_equals(true)
                } else {
                    arg
                }
            }
        };

        cmd = cmd.arg(arg);
    }

    cmd
}

/// Collect the options given on the command line
pub fn collect_args(defs: &[OptionDef], matches: &ArgMatches) -> HashMap<String, ArgValue> {
    let mut args = HashMap::new();

    for def in defs {
        if matches.value_source(&def.name) != Some(ValueSource::CommandLine) {
            continue;
        }

        let value = match def.mode {
            ValueMode::None => ArgValue::Flag,
            _ => match matches.get_one::<String>(&def.name) {
                Some(v) if !v.is_empty() => ArgValue::Value(v.clone()),
                _ => ArgValue::Flag,
            },
        };
        args.insert(def.name.clone(), value);
    }

    args
}

/// Positional arguments after the options
pub fn collect_operands(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(OPERANDS_ID)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
