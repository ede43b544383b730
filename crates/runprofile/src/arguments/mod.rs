//! Parsing of free-text runner arguments against the runner's option
//! grammar. Nothing here executes the runner.

pub mod grammar;

pub use grammar::{LongMatch, OptionGrammar, OptionSpec};

/// Returned by [`crate::profile::RunProfile::validate_arguments`] when the
/// arguments would make the runner exit before running tests.
pub const DOES_NOT_EXECUTE: &str = "Does not execute - help or version option given";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// Malformed arguments; the message is shown to the user as is.
    #[error("{0}")]
    Data(String),
    /// A help or version option was given.
    #[error("help or version option given")]
    Information,
}

/// An option recognized by the grammar. Negated flags carry the `no` prefix
/// in `name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedOption {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    pub options: Vec<ParsedOption>,
    /// Unknown options and stray positional tokens, in input order.
    pub invalid: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ArgumentParser {
    grammar: OptionGrammar,
}

impl ArgumentParser {
    #[must_use]
    pub fn new(grammar: OptionGrammar) -> Self {
        Self { grammar }
    }

    /// Splits `text` on whitespace and parses the tokens.
    pub fn parse_str(&self, text: &str) -> Result<ParsedArguments, ArgumentError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        self.parse(&tokens)
    }

    /// Parses argument tokens. Syntax errors are returned immediately; a
    /// help or version option is reported only after all tokens parsed
    /// cleanly.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ParsedArguments, ArgumentError> {
        let mut parsed = ParsedArguments::default();
        let mut exits = false;
        let mut iter = tokens.iter().map(AsRef::<str>::as_ref);
        while let Some(token) = iter.next() {
            if token == "--" {
                parsed.invalid.extend(iter.by_ref().map(str::to_string));
                break;
            }
            let spec = if let Some(body) = token.strip_prefix("--") {
                self.parse_long(token, body, &mut iter, &mut parsed)?
            } else if let Some(body) = token.strip_prefix('-').filter(|b| !b.is_empty()) {
                self.parse_short(token, body, &mut iter, &mut parsed)?
            } else {
                parsed.invalid.push(token.to_string());
                None
            };
            exits |= spec.is_some_and(OptionSpec::exits_without_running);
        }
        if exits {
            return Err(ArgumentError::Information);
        }
        Ok(parsed)
    }

    fn parse_long<'t>(
        &self,
        token: &str,
        body: &str,
        rest: &mut impl Iterator<Item = &'t str>,
        parsed: &mut ParsedArguments,
    ) -> Result<Option<&OptionSpec>, ArgumentError> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        match self.grammar.long(name) {
            LongMatch::Unknown => {
                parsed.invalid.push(token.to_string());
                Ok(None)
            }
            LongMatch::Ambiguous => Err(ArgumentError::Data(format!(
                "option --{name} not a unique prefix"
            ))),
            LongMatch::Negated(spec) => {
                if inline.is_some() {
                    return Err(must_not_have_argument(&format!("--{name}")));
                }
                parsed.options.push(ParsedOption {
                    name: format!("no{}", spec.long),
                    value: None,
                });
                Ok(None)
            }
            LongMatch::Option(spec) => {
                let value = if spec.takes_value {
                    let value = inline
                        .or_else(|| rest.next())
                        .ok_or_else(|| requires_argument(&format!("--{name}")))?;
                    Some(value.to_string())
                } else if inline.is_some() {
                    return Err(must_not_have_argument(&format!("--{name}")));
                } else {
                    None
                };
                parsed.options.push(ParsedOption {
                    name: spec.long.to_string(),
                    value,
                });
                Ok(Some(spec))
            }
        }
    }

    fn parse_short<'t>(
        &self,
        token: &str,
        body: &str,
        rest: &mut impl Iterator<Item = &'t str>,
        parsed: &mut ParsedArguments,
    ) -> Result<Option<&OptionSpec>, ArgumentError> {
        let mut chars = body.chars();
        let Some(ch) = chars.next() else {
            parsed.invalid.push(token.to_string());
            return Ok(None);
        };
        let attached = chars.as_str();
        let Some(spec) = self.grammar.short(ch) else {
            parsed.invalid.push(token.to_string());
            return Ok(None);
        };
        let value = if spec.takes_value {
            let value = if attached.is_empty() {
                rest.next()
                    .ok_or_else(|| requires_argument(&format!("-{ch}")))?
            } else {
                attached
            };
            Some(value.to_string())
        } else if attached.is_empty() {
            None
        } else {
            // Grouped short flags are not supported.
            parsed.invalid.push(token.to_string());
            return Ok(None);
        };
        parsed.options.push(ParsedOption {
            name: spec.long.to_string(),
            value,
        });
        Ok(Some(spec))
    }
}

fn requires_argument(option: &str) -> ArgumentError {
    ArgumentError::Data(format!("option {option} requires argument"))
}

fn must_not_have_argument(option: &str) -> ArgumentError {
    ArgumentError::Data(format!("option {option} must not have an argument"))
}

/// Validation message for `text`, or `None` when every token is accepted.
#[must_use]
pub fn invalid_message(parser: &ArgumentParser, text: &str) -> Option<String> {
    match parser.parse_str(text) {
        Ok(parsed) if parsed.invalid.is_empty() => None,
        Ok(parsed) => Some(format!("Unknown option(s): {}", parsed.invalid.join(" "))),
        Err(ArgumentError::Information) => Some(DOES_NOT_EXECUTE.to_string()),
        Err(err @ ArgumentError::Data(_)) => Some(err.to_string()),
    }
}
