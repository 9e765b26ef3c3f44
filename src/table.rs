// Copyright (c) 2021 James O. D. Hunt.
//
// SPDX-License-Identifier: Apache-2.0
//

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::debug;

use crate::error::{Error, Result};

pub(crate) const OPT_PREFIX: char = '-';

/// Special argument that is silently consumed and used to denote the end of
/// all options; all arguments that follow are considered to be positional
/// arguments (even if they start with `-`!)
///
/// See: `getopt(3)`.
pub(crate) const END_OF_OPTIONS: &str = "--";
pub(crate) const LONG_OPT_PREFIX: &str = END_OF_OPTIONS;

/// Separates a long option name from an inline value (`--count=5`).
pub(crate) const LONG_VALUE_SEPARATOR: char = '=';

/// Leading descriptor character marking an option as hidden.
const HIDDEN_PREFIX: char = '-';

/// Value name used when a descriptor doesn't specify one.
pub const DEFAULT_VALUE_NAME: &str = "value";

/// Used to specify how many values an option takes.
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum Need {
    /// Option is stand-alone (no argument required). Descriptor character `|`.
    Nothing,
    /// Option may take a value, but only in the same token
    /// (`-sfoo`, `--size=foo`). Descriptor character `?`.
    Optional,
    /// Option needs an argument. Descriptor character `:`.
    Argument,
    /// Option takes any number of values. Descriptor character `*`.
    ZeroOrMore,
    /// Option takes at least one value. Descriptor character `+`.
    OneOrMore,
}

impl Default for Need {
    fn default() -> Self {
        Need::Nothing
    }
}

impl Need {
    /// Create a new default requirement.
    pub fn new() -> Self {
        Need::default()
    }

    /// Map a descriptor policy character to a requirement.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '|' => Some(Need::Nothing),
            '?' => Some(Need::Optional),
            ':' => Some(Need::Argument),
            '*' => Some(Need::ZeroOrMore),
            '+' => Some(Need::OneOrMore),
            _ => None,
        }
    }

    /// Returns `true` for the multi-valued requirements.
    pub fn takes_many(self) -> bool {
        matches!(self, Need::ZeroOrMore | Need::OneOrMore)
    }
}

/// Returns `true` if `c` can be typed as a short option. Whitespace and
/// control characters are used as "no short form" sentinels.
pub fn is_printable(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}

/// A single compiled option descriptor.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct OptionDefinition {
    short: char,
    needs: Need,
    long: String,
    value_name: String,
    hidden: bool,
}

impl OptionDefinition {
    /// Compile a single descriptor string.
    ///
    /// The format is `[-]<short>[<policy>[<long>[ <value name>]]]` where:
    ///
    /// - A leading `-` hides the option from usage output.
    /// - `<short>` is the short option character. Use a whitespace or control
    ///   character for a long-only option.
    /// - `<policy>` is one of `|?:*+` (see [Need]).
    /// - A single space may follow the policy character.
    fn compile(descriptor: &str) -> Result<Self> {
        let malformed = |reason| Error::Malformed {
            descriptor: descriptor.into(),
            reason,
        };

        let mut chars = descriptor.chars();

        let mut hidden = false;
        let mut short = chars.next().ok_or_else(|| malformed("empty descriptor"))?;

        if short == HIDDEN_PREFIX {
            hidden = true;
            short = chars.next().ok_or_else(|| malformed("missing short option"))?;
        }

        if short == OPT_PREFIX {
            return Err(malformed("'-' cannot be used as a short option"));
        }

        let mut def = OptionDefinition {
            short,
            needs: Need::Nothing,
            long: String::new(),
            value_name: DEFAULT_VALUE_NAME.into(),
            hidden,
        };

        let policy = match chars.next() {
            Some(policy) => policy,
            None => return Ok(def),
        };

        def.needs = Need::from_char(policy).ok_or_else(|| Error::BadPolicy {
            descriptor: descriptor.into(),
            policy,
        })?;

        let rest = chars.as_str();
        let rest = rest.strip_prefix(' ').unwrap_or(rest);

        let (long, value_name) = match rest.find(char::is_whitespace) {
            Some(i) => (&rest[..i], rest[i..].trim()),
            None => (rest, ""),
        };

        def.long = long.into();

        if !value_name.is_empty() {
            def.value_name = value_name.into();
        }

        Ok(def)
    }

    /// The short option character. Only meaningful if [Self::has_short()].
    pub fn short(&self) -> char {
        self.short
    }

    /// Returns `true` if the option can be specified as `-<short>`.
    pub fn has_short(&self) -> bool {
        is_printable(self.short)
    }

    /// The value requirement of the option.
    pub fn needs(&self) -> Need {
        self.needs
    }

    /// The long option name; empty if the option has no long form.
    pub fn long(&self) -> &str {
        &self.long
    }

    /// Returns `true` if the option can be specified as `--<long>`.
    pub fn has_long(&self) -> bool {
        !self.long.is_empty()
    }

    /// Name of the option's value, for usage output.
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Returns `true` if the option should not be shown in usage output.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl fmt::Display for OptionDefinition {
    /// Shows how the option is specified, preferring the long form
    /// (`--count`, or `-c` for a short-only option).
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.has_long() {
            write!(f, "{}{}", LONG_OPT_PREFIX, self.long)
        } else {
            write!(f, "{}{}", OPT_PREFIX, self.short)
        }
    }
}

/// The compiled set of options a program accepts.
///
/// A table is immutable once built and can be shared by any number of
/// [crate::Parser]s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Table {
    /// Definitions in declaration order.
    entries: Vec<OptionDefinition>,

    /// Printable short option to index into `entries`.
    shorts: HashMap<char, usize>,

    /// Lower-cased long name to index into `entries`. Sorted, so all names
    /// sharing a prefix are adjacent.
    longs: BTreeMap<String, usize>,
}

impl Table {
    /// Compile a set of option descriptors (see [OptionDefinition]).
    ///
    /// Stops at the first invalid descriptor.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tabopt::{Need, Table};
    /// let table = Table::new(&["v|verbose", "c:count n", "- |debug"]).unwrap();
    ///
    /// assert_eq!(table.find_short('c').unwrap().needs(), Need::Argument);
    /// assert_eq!(table.find_long("VERB").unwrap().short(), 'v');
    /// assert_eq!(table.visible().count(), 2);
    /// ```
    pub fn new<I, S>(descriptors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Table::default();

        for descriptor in descriptors {
            table.add(descriptor.as_ref())?;
        }

        Ok(table)
    }

    fn add(&mut self, descriptor: &str) -> Result<()> {
        let def = OptionDefinition::compile(descriptor)?;
        let index = self.entries.len();

        if def.has_short() && self.shorts.contains_key(&def.short) {
            return Err(Error::DuplicateShort {
                descriptor: descriptor.into(),
                option: def.short,
            });
        }

        let key = fold_case(&def.long);

        if def.has_long() && self.longs.contains_key(&key) {
            return Err(Error::DuplicateLong {
                descriptor: descriptor.into(),
                name: def.long.clone(),
            });
        }

        debug!(
            short = ?def.short,
            long = %def.long,
            needs = ?def.needs,
            hidden = def.hidden,
            "compiled option descriptor"
        );

        if def.has_short() {
            self.shorts.insert(def.short, index);
        }

        if def.has_long() {
            self.longs.insert(key, index);
        }

        self.entries.push(def);

        Ok(())
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All definitions, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.entries.iter()
    }

    /// Definitions that should appear in usage output, in declaration order.
    pub fn visible(&self) -> impl Iterator<Item = &OptionDefinition> {
        self.entries.iter().filter(|def| !def.hidden)
    }

    /// Returns the definition for the specified short option.
    pub fn find_short(&self, option: char) -> Option<&OptionDefinition> {
        self.shorts.get(&option).map(|&i| &self.entries[i])
    }

    /// Returns the definition for the specified long option name, which may
    /// be abbreviated to any prefix that identifies a single option.
    /// Matching ignores case and an exact name always wins.
    ///
    /// # Errors
    ///
    /// - [Error::UnknownOpt] if nothing matches (or `name` is empty).
    /// - [Error::AmbiguousOpt] if `name` is a prefix of more than one name.
    pub fn find_long(&self, name: &str) -> Result<&OptionDefinition> {
        let token = format!("{}{}", LONG_OPT_PREFIX, name);

        if name.is_empty() {
            return Err(Error::UnknownOpt(token));
        }

        let key = fold_case(name);

        if let Some(&i) = self.longs.get(&key) {
            return Ok(&self.entries[i]);
        }

        let found: Vec<usize> = self
            .longs
            .range(key.clone()..)
            .take_while(|(k, _)| k.starts_with(&key))
            .map(|(_, &i)| i)
            .collect();

        match found.as_slice() {
            [] => Err(Error::UnknownOpt(token)),
            [i] => Ok(&self.entries[*i]),
            _ => Err(Error::AmbiguousOpt {
                token,
                candidates: found
                    .iter()
                    .map(|&i| format!("{}{}", LONG_OPT_PREFIX, self.entries[i].long))
                    .collect(),
            }),
        }
    }

    /// Returns `true` if `token` would be treated as an option (or the
    /// end-of-options marker) rather than as a value:
    ///
    /// - `--`
    /// - `--name` or `--name=value` where `name` is a prefix of at least one
    ///   long option (ambiguous prefixes count).
    /// - `-c...` where `c` is a registered short option.
    pub fn looks_like_option(&self, token: &str) -> bool {
        if token == END_OF_OPTIONS {
            return true;
        }

        if let Some(rest) = token.strip_prefix(LONG_OPT_PREFIX) {
            let name = match rest.split_once(LONG_VALUE_SEPARATOR) {
                Some((name, _)) => name,
                None => rest,
            };

            return !matches!(self.find_long(name), Err(Error::UnknownOpt(_)));
        }

        token
            .strip_prefix(OPT_PREFIX)
            .and_then(|rest| rest.chars().next())
            .map_or(false, |c| self.find_short(c).is_some())
    }
}

/// Lower-case one character at a time, so a prefix always folds to a
/// prefix of the folded name (unlike `str::to_lowercase()`, whose final
/// sigma rule depends on what follows).
fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(short: char, needs: Need, long: &str, value_name: &str, hidden: bool) -> OptionDefinition {
        OptionDefinition {
            short,
            needs,
            long: long.into(),
            value_name: value_name.into(),
            hidden,
        }
    }

    #[test]
    fn test_need() {
        let n1 = Need::new();
        let n2 = Need::default();

        assert_eq!(n1, Need::Nothing);
        assert_eq!(n1, n2);

        assert_eq!(Need::from_char('|'), Some(Need::Nothing));
        assert_eq!(Need::from_char('?'), Some(Need::Optional));
        assert_eq!(Need::from_char(':'), Some(Need::Argument));
        assert_eq!(Need::from_char('*'), Some(Need::ZeroOrMore));
        assert_eq!(Need::from_char('+'), Some(Need::OneOrMore));
        assert_eq!(Need::from_char('!'), None);

        assert!(Need::ZeroOrMore.takes_many());
        assert!(Need::OneOrMore.takes_many());
        assert!(!Need::Argument.takes_many());
    }

    #[test]
    fn test_compile() {
        #[derive(Debug)]
        struct TestData<'a> {
            descriptor: &'a str,
            result: Result<OptionDefinition>,
        }

        let tests = &[
            TestData {
                descriptor: "a",
                result: Ok(def('a', Need::Nothing, "", DEFAULT_VALUE_NAME, false)),
            },
            TestData {
                descriptor: "-a",
                result: Ok(def('a', Need::Nothing, "", DEFAULT_VALUE_NAME, true)),
            },
            TestData {
                descriptor: "v|verbose",
                result: Ok(def('v', Need::Nothing, "verbose", DEFAULT_VALUE_NAME, false)),
            },
            TestData {
                descriptor: "c:count",
                result: Ok(def('c', Need::Argument, "count", DEFAULT_VALUE_NAME, false)),
            },
            TestData {
                descriptor: "c: count n",
                result: Ok(def('c', Need::Argument, "count", "n", false)),
            },
            TestData {
                descriptor: "s?size   bytes ",
                result: Ok(def('s', Need::Optional, "size", "bytes", false)),
            },
            TestData {
                descriptor: "g+groups group name",
                result: Ok(def('g', Need::OneOrMore, "groups", "group name", false)),
            },
            TestData {
                descriptor: "-z*zeds",
                result: Ok(def('z', Need::ZeroOrMore, "zeds", DEFAULT_VALUE_NAME, true)),
            },
            TestData {
                // Only a single leading space is skipped, so this has no
                // long name but does have a value name.
                descriptor: "x:  file",
                result: Ok(def('x', Need::Argument, "", "file", false)),
            },
            TestData {
                descriptor: "x: ",
                result: Ok(def('x', Need::Argument, "", DEFAULT_VALUE_NAME, false)),
            },
            TestData {
                descriptor: " |debug",
                result: Ok(def(' ', Need::Nothing, "debug", DEFAULT_VALUE_NAME, false)),
            },
            TestData {
                descriptor: "人|person",
                result: Ok(def('人', Need::Nothing, "person", DEFAULT_VALUE_NAME, false)),
            },
            TestData {
                descriptor: "",
                result: Err(Error::Malformed {
                    descriptor: "".into(),
                    reason: "empty descriptor",
                }),
            },
            TestData {
                descriptor: "-",
                result: Err(Error::Malformed {
                    descriptor: "-".into(),
                    reason: "missing short option",
                }),
            },
            TestData {
                descriptor: "--|dash",
                result: Err(Error::Malformed {
                    descriptor: "--|dash".into(),
                    reason: "'-' cannot be used as a short option",
                }),
            },
            TestData {
                descriptor: "c!count",
                result: Err(Error::BadPolicy {
                    descriptor: "c!count".into(),
                    policy: '!',
                }),
            },
            TestData {
                descriptor: "cc",
                result: Err(Error::BadPolicy {
                    descriptor: "cc".into(),
                    policy: 'c',
                }),
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = OptionDefinition::compile(d.descriptor);

            let msg = format!("{}, result: {:?}", msg, result);

            assert_eq!(result, d.result, "{}", msg);
        }
    }

    #[test]
    fn test_table_errors() {
        #[derive(Debug)]
        struct TestData<'a> {
            descriptors: Vec<&'a str>,
            result: Result<()>,
        }

        let tests = &[
            TestData {
                descriptors: vec![],
                result: Ok(()),
            },
            TestData {
                descriptors: vec!["a|all", "b|ball", " |call", " |dall"],
                result: Ok(()),
            },
            TestData {
                descriptors: vec!["a|all", "a|again"],
                result: Err(Error::DuplicateShort {
                    descriptor: "a|again".into(),
                    option: 'a',
                }),
            },
            TestData {
                // Hidden options still occupy their short option.
                descriptors: vec!["-a", "a"],
                result: Err(Error::DuplicateShort {
                    descriptor: "a".into(),
                    option: 'a',
                }),
            },
            TestData {
                descriptors: vec!["c:count", "C:COUNT"],
                result: Err(Error::DuplicateLong {
                    descriptor: "C:COUNT".into(),
                    name: "COUNT".into(),
                }),
            },
            TestData {
                descriptors: vec![" |debug", "\t|Debug"],
                result: Err(Error::DuplicateLong {
                    descriptor: "\t|Debug".into(),
                    name: "Debug".into(),
                }),
            },
            TestData {
                // Compilation stops at the first error.
                descriptors: vec!["a", "b!", "a"],
                result: Err(Error::BadPolicy {
                    descriptor: "b!".into(),
                    policy: '!',
                }),
            },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            let result = Table::new(&d.descriptors).map(|_| ());

            let msg = format!("{}, result: {:?}", msg, result);

            assert_eq!(result, d.result, "{}", msg);
        }
    }

    #[test]
    fn test_lookup_every_short_and_prefix() {
        let descriptors = [
            "a|all",
            "b:ball",
            "c?call",
            "d*dall",
            "e+eall",
            "-f|fall",
            "g|all-in",
            "h|Ballroom",
            " |deep",
            "\u{1}|dee",
        ];

        let table = Table::new(&descriptors).unwrap();

        assert_eq!(table.len(), descriptors.len());

        let lowered: Vec<String> = table.iter().map(|d| d.long().to_lowercase()).collect();

        for (i, expected) in table.iter().enumerate() {
            if expected.has_short() {
                let found = table.find_short(expected.short());
                assert_eq!(found, Some(expected), "short {:?}", expected.short());
            }

            let name = expected.long();

            for end in 1..=name.len() {
                let prefix = &name[..end];
                let lower = prefix.to_lowercase();

                let exact = lowered[i] == lower;
                let sharing = lowered.iter().filter(|n| n.starts_with(&lower)).count();

                if !exact && sharing > 1 {
                    continue;
                }

                let msg = format!("prefix {:?} of {:?}", prefix, name);

                assert_eq!(table.find_long(prefix), Ok(expected), "{}", msg);
                assert_eq!(
                    table.find_long(&prefix.to_uppercase()),
                    Ok(expected),
                    "{} (upper)",
                    msg
                );
            }
        }

        assert_eq!(table.find_short(' '), None);
        assert_eq!(table.find_short('\u{1}'), None);
        assert_eq!(table.find_short('z'), None);
    }

    #[test]
    fn test_find_long() {
        let table = Table::new(&["c:count", "o|colour", "C|co", "x|exact", "y|exactly"]).unwrap();

        // Exact match wins even though "co" prefixes other names.
        assert_eq!(table.find_long("co").unwrap().short(), 'C');
        assert_eq!(table.find_long("CO").unwrap().short(), 'C');
        assert_eq!(table.find_long("exact").unwrap().short(), 'x');
        assert_eq!(table.find_long("exactl").unwrap().short(), 'y');
        assert_eq!(table.find_long("cou").unwrap().short(), 'c');

        assert_eq!(
            table.find_long("e"),
            Err(Error::AmbiguousOpt {
                token: "--e".into(),
                candidates: vec!["--exact".into(), "--exactly".into()],
            })
        );

        assert_eq!(
            table.find_long("c"),
            Err(Error::AmbiguousOpt {
                token: "--c".into(),
                candidates: vec!["--co".into(), "--colour".into(), "--count".into()],
            })
        );

        assert_eq!(table.find_long("counts"), Err(Error::UnknownOpt("--counts".into())));
        assert_eq!(table.find_long("z"), Err(Error::UnknownOpt("--z".into())));
        assert_eq!(table.find_long(""), Err(Error::UnknownOpt("--".into())));
    }

    #[test]
    fn test_find_long_non_ascii() {
        let table = Table::new(&["a|ΑΣΑ", "b|βήτα"]).unwrap();

        assert_eq!(table.find_long("ΑΣΑ").unwrap().short(), 'a');
        assert_eq!(table.find_long("ασα").unwrap().short(), 'a');
        assert_eq!(table.find_long("ΑΣ").unwrap().short(), 'a');
        assert_eq!(table.find_long("Ασ").unwrap().short(), 'a');
        assert_eq!(table.find_long("Β").unwrap().short(), 'b');

        assert_eq!(table.find_long("ΑΒ"), Err(Error::UnknownOpt("--ΑΒ".into())));

        assert_eq!(
            Table::new(&["a|ΑΣ", "b|ασ"]),
            Err(Error::DuplicateLong {
                descriptor: "b|ασ".into(),
                name: "ασ".into(),
            })
        );
    }

    #[test]
    fn test_looks_like_option() {
        let table = Table::new(&["x|extra", "e|exclude", "c:count"]).unwrap();

        #[derive(Debug)]
        struct TestData<'a> {
            token: &'a str,
            result: bool,
        }

        let tests = &[
            TestData { token: "--", result: true },
            TestData { token: "-x", result: true },
            TestData { token: "-xc", result: true },
            TestData { token: "-cx", result: true },
            TestData { token: "--count", result: true },
            TestData { token: "--COU=3", result: true },
            // Ambiguous, but still an option.
            TestData { token: "--e", result: true },
            TestData { token: "-", result: false },
            TestData { token: "-5", result: false },
            TestData { token: "-z", result: false },
            TestData { token: "--bogus", result: false },
            TestData { token: "--=x", result: false },
            TestData { token: "x", result: false },
            TestData { token: "", result: false },
        ];

        for (i, d) in tests.iter().enumerate() {
            let msg = format!("test[{}]: {:?}", i, d);

            assert_eq!(table.looks_like_option(d.token), d.result, "{}", msg);
        }
    }

    #[test]
    fn test_visible() {
        let table = Table::new(&["a", "-b", "c:count", "- |secret"]).unwrap();

        let visible: Vec<char> = table.visible().map(|d| d.short()).collect();

        assert_eq!(visible, vec!['a', 'c']);
        assert_eq!(table.len(), 4);

        // Hidden options are still matchable.
        assert!(table.find_short('b').unwrap().is_hidden());
        assert!(table.find_long("sec").unwrap().is_hidden());
    }

    #[test]
    fn test_display() {
        let table = Table::new(&["a", "c:count", " |debug"]).unwrap();

        let shown: Vec<String> = table.iter().map(|d| d.to_string()).collect();

        assert_eq!(shown, vec!["-a", "--count", "--debug"]);
    }
}
