//! Tokenising of `--name=value` style options.
//!
//! Accepted prefixes are `--`, `-`, and `/`; a value may follow `=` or `:`.

use super::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawOption<'a> {
    /// Prefix and name exactly as written, without any inline value.
    pub(crate) flag: &'a str,
    pub(crate) name: &'a str,
    pub(crate) value: Option<&'a str>,
}

pub(crate) fn split_option(arg: &str) -> Option<RawOption<'_>> {
    let prefix_len = if arg.starts_with("--") {
        2
    } else if arg.starts_with('-') || arg.starts_with('/') {
        1
    } else {
        return None;
    };
    let body = &arg[prefix_len..];
    if body.is_empty() {
        return None;
    }
    let (name, value) = match body.find(['=', ':']) {
        Some(split) => (&body[..split], Some(&body[split + 1..])),
        None => (body, None),
    };
    if name.is_empty() {
        return None;
    }
    Some(RawOption {
        flag: &arg[..prefix_len + name.len()],
        name,
        value,
    })
}

/// Resolve the value of an option that requires one, taking the next argument
/// when no inline value was given.
pub(crate) fn required_value<I>(option: &RawOption<'_>, rest: &mut I) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    let value = match option.value {
        Some(inline) => Some(inline.to_string()),
        None => rest.next(),
    };
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            CliError::new(format!(
                "missing required value for option '{}'",
                option.flag
            ))
        })
}

pub(crate) fn reject_value(option: &RawOption<'_>) -> Result<(), CliError> {
    match option.value {
        Some(_) => Err(CliError::new(format!(
            "option '{}' does not take a value",
            option.flag
        ))),
        None => Ok(()),
    }
}
