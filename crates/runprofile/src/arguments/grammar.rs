/// One option accepted by the runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    pub long: &'static str,
    /// Single-character aliases, usually zero or one.
    pub short: &'static str,
    pub takes_value: bool,
}

impl OptionSpec {
    #[must_use]
    pub const fn value(long: &'static str, short: &'static str) -> Self {
        Self {
            long,
            short,
            takes_value: true,
        }
    }

    #[must_use]
    pub const fn flag(long: &'static str, short: &'static str) -> Self {
        Self {
            long,
            short,
            takes_value: false,
        }
    }

    /// Options that make the runner print something and exit without
    /// executing tests.
    #[must_use]
    pub fn exits_without_running(&self) -> bool {
        matches!(self.long, "help" | "version")
    }
}

/// Options understood by `robot`/`pybot`.
const ROBOT_OPTIONS: &[OptionSpec] = &[
    OptionSpec::flag("rpa", ""),
    OptionSpec::value("language", ""),
    OptionSpec::value("extension", "F"),
    OptionSpec::value("parser", ""),
    OptionSpec::value("name", "N"),
    OptionSpec::value("doc", "D"),
    OptionSpec::value("metadata", "M"),
    OptionSpec::value("settag", "G"),
    OptionSpec::value("test", "t"),
    OptionSpec::value("task", ""),
    OptionSpec::value("suite", "s"),
    OptionSpec::value("include", "i"),
    OptionSpec::value("exclude", "e"),
    OptionSpec::value("critical", "c"),
    OptionSpec::value("noncritical", "n"),
    OptionSpec::value("skip", ""),
    OptionSpec::value("skiponfailure", ""),
    OptionSpec::value("variable", "v"),
    OptionSpec::value("variablefile", "V"),
    OptionSpec::value("outputdir", "d"),
    OptionSpec::value("output", "o"),
    OptionSpec::value("log", "l"),
    OptionSpec::value("report", "r"),
    OptionSpec::value("xunit", "x"),
    OptionSpec::flag("xunitskipnoncritical", ""),
    OptionSpec::value("debugfile", "b"),
    OptionSpec::flag("timestampoutputs", "T"),
    OptionSpec::flag("splitlog", ""),
    OptionSpec::value("logtitle", ""),
    OptionSpec::value("reporttitle", ""),
    OptionSpec::value("reportbackground", ""),
    OptionSpec::value("maxerrorlines", ""),
    OptionSpec::value("maxassignlength", ""),
    OptionSpec::value("loglevel", "L"),
    OptionSpec::value("suitestatlevel", ""),
    OptionSpec::value("tagstatinclude", ""),
    OptionSpec::value("tagstatexclude", ""),
    OptionSpec::value("tagstatcombine", ""),
    OptionSpec::value("tagdoc", ""),
    OptionSpec::value("tagstatlink", ""),
    OptionSpec::value("expandkeywords", ""),
    OptionSpec::value("removekeywords", ""),
    OptionSpec::value("flattenkeywords", ""),
    OptionSpec::value("listener", ""),
    OptionSpec::flag("nostatusrc", ""),
    OptionSpec::flag("warnonskippedfiles", ""),
    OptionSpec::flag("dryrun", ""),
    OptionSpec::flag("exitonfailure", "X"),
    OptionSpec::flag("exitonerror", ""),
    OptionSpec::flag("skipteardownonexit", ""),
    OptionSpec::value("randomize", ""),
    OptionSpec::flag("runemptysuite", ""),
    OptionSpec::value("rerunfailed", "R"),
    OptionSpec::value("rerunfailedsuites", "S"),
    OptionSpec::value("prerunmodifier", ""),
    OptionSpec::value("prerebotmodifier", ""),
    OptionSpec::value("console", ""),
    OptionSpec::flag("dotted", "."),
    OptionSpec::flag("quiet", ""),
    OptionSpec::value("consolewidth", "W"),
    OptionSpec::value("consolecolors", "C"),
    OptionSpec::value("consolemarkers", "K"),
    OptionSpec::value("monitorwidth", ""),
    OptionSpec::value("monitorcolors", ""),
    OptionSpec::value("monitormarkers", ""),
    OptionSpec::value("pythonpath", "P"),
    OptionSpec::value("argumentfile", "A"),
    OptionSpec::value("escape", "E"),
    OptionSpec::flag("help", "h?"),
    OptionSpec::flag("version", ""),
];

/// How a long option name matched the grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LongMatch<'a> {
    Option(&'a OptionSpec),
    /// `--no<flag>` turning a flag off.
    Negated(&'a OptionSpec),
    Ambiguous,
    Unknown,
}

/// The set of options a runner accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionGrammar {
    options: Vec<OptionSpec>,
}

impl OptionGrammar {
    #[must_use]
    pub fn new(options: Vec<OptionSpec>) -> Self {
        Self { options }
    }

    /// Grammar of the Robot Framework test runner.
    #[must_use]
    pub fn robot() -> Self {
        Self::new(ROBOT_OPTIONS.to_vec())
    }

    #[must_use]
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    #[must_use]
    pub fn short(&self, ch: char) -> Option<&OptionSpec> {
        self.options.iter().find(|spec| spec.short.contains(ch))
    }

    /// Resolves a long option name. Exact names win, then `no`-negated
    /// flags, then unique prefixes.
    #[must_use]
    pub fn long(&self, name: &str) -> LongMatch<'_> {
        if name.is_empty() {
            return LongMatch::Unknown;
        }
        if let Some(spec) = self.options.iter().find(|spec| spec.long == name) {
            return LongMatch::Option(spec);
        }
        if let Some(flag) = name.strip_prefix("no") {
            if let Some(spec) = self
                .options
                .iter()
                .find(|spec| !spec.takes_value && spec.long == flag)
            {
                return LongMatch::Negated(spec);
            }
        }
        let mut candidates = self
            .options
            .iter()
            .filter(|spec| spec.long.starts_with(name));
        match (candidates.next(), candidates.next()) {
            (Some(spec), None) => LongMatch::Option(spec),
            (Some(_), Some(_)) => LongMatch::Ambiguous,
            (None, _) => LongMatch::Unknown,
        }
    }
}

impl Default for OptionGrammar {
    fn default() -> Self {
        Self::robot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_resolve_exact_before_prefix() {
        let grammar = OptionGrammar::robot();
        assert!(matches!(grammar.long("output"), LongMatch::Option(s) if s.long == "output"));
        assert!(matches!(grammar.long("outputd"), LongMatch::Option(s) if s.long == "outputdir"));
        assert_eq!(grammar.long("re"), LongMatch::Ambiguous);
        assert_eq!(grammar.long("bogus"), LongMatch::Unknown);
    }

    #[test]
    fn flags_can_be_negated() {
        let grammar = OptionGrammar::robot();
        assert!(matches!(grammar.long("nodryrun"), LongMatch::Negated(s) if s.long == "dryrun"));
        assert!(matches!(grammar.long("nostatusrc"), LongMatch::Option(s) if s.long == "nostatusrc"));
        assert_eq!(grammar.long("noinclude"), LongMatch::Unknown);
    }

    #[test]
    fn help_has_two_short_aliases() {
        let grammar = OptionGrammar::robot();
        assert_eq!(grammar.short('h').map(|s| s.long), Some("help"));
        assert_eq!(grammar.short('?').map(|s| s.long), Some("help"));
        assert_eq!(grammar.short('q'), None);
    }
}
