//! Section/option configuration file reader.
//!
//! Wraps an INI document parsed by `rust-ini` and exposes typed lookups that
//! fall back to a caller supplied default when the section or option is absent.
//! Values are kept raw: no quote stripping and no escape processing. Section and
//! option names are matched verbatim, so lookups are case-sensitive.

use crate::backup::function_path;
use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::{WithDebugObjectAndFnName, WithMsg};
use function_name::named;
use ini::{Ini, ParseOption};
use itertools::Itertools;
use std::fmt::{Debug, Formatter};
use std::path::Path;

const TRUE_VALUES: [&str; 4] = ["1", "yes", "true", "on"];
const FALSE_VALUES: [&str; 4] = ["0", "no", "false", "off"];

/// Conversion from a raw option string into a typed value.
pub trait FromConfigValue: Sized {
    fn from_config_value(raw: &str) -> Result<Self>;
}

impl FromConfigValue for String {
    fn from_config_value(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

macro_rules! from_config_value_via_from_str {
    ($($t:ty),*) => {
        $(
            impl FromConfigValue for $t {
                fn from_config_value(raw: &str) -> Result<Self> {
                    raw.trim().parse::<$t>().map_err(Error::from)
                }
            }
        )*
    };
}

from_config_value_via_from_str!(i32, i64, u32, u64, f64);

impl FromConfigValue for bool {
    fn from_config_value(raw: &str) -> Result<Self> {
        parse_bool(raw).ok_or_else(|| Error::InvalidBool(raw.to_string()))
    }
}

/// Accepts `1/yes/true/on` and `0/no/false/off`, ignoring case and surrounding whitespace.
pub fn parse_bool(raw: &str) -> Option<bool> {
    let lowered = raw.trim().to_ascii_lowercase();
    if TRUE_VALUES.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_VALUES.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn raw_parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

pub struct Configuration {
    ini: Ini,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ini::load_from_file_opt(path, raw_parse_option())
            .map(|ini| Self { ini })
            .map_err(Error::from)
            .with_msg(format!("Read configuration file failed: {:?}", path))
    }

    pub fn parse<S: AsRef<str>>(text: S) -> Result<Self> {
        Ini::load_from_str_opt(text.as_ref(), raw_parse_option())
            .map(|ini| Self { ini })
            .map_err(|e| Error::from(ini::Error::Parse(e)))
    }

    /// Named sections in file order. Options written before the first
    /// section header are not reachable through a section name.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.ini.sections().flatten()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.ini.section(Some(section)).is_some()
    }

    pub fn contains(&self, section: &str, option: &str) -> bool {
        self.get_raw(section, option).is_some()
    }

    /// Option/value pairs of a section in file order, empty when the section is missing.
    pub fn options(&self, section: &str) -> Vec<(&str, &str)> {
        self.ini
            .section(Some(section))
            .map(|props| props.iter().collect_vec())
            .unwrap_or_default()
    }

    pub fn get_raw(&self, section: &str, option: &str) -> Option<&str> {
        self.ini.section(Some(section))?.get(option)
    }

    /// Typed lookup. A missing section or option yields `default` as is;
    /// a present value that does not convert is an error.
    #[named]
    pub fn get<T: FromConfigValue>(&self, section: &str, option: &str, default: T) -> Result<T> {
        match self.get_raw(section, option) {
            None => Ok(default),
            Some(raw) => T::from_config_value(raw).with_debug_object_and_fn_name(
                format!("[{section}] {option} = {raw:?}"),
                function_path!(),
            ),
        }
    }

    pub fn log_contents(&self) {
        for section in self.sections() {
            tracing::debug!("[{}]", section);
            for (option, value) in self.options(section) {
                tracing::debug!("  {} = {}", option, value);
            }
        }
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("sections", &self.sections().collect_vec())
            .finish()
    }
}
