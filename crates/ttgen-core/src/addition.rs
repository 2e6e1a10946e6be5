//! Addition directives and root naming.
//!
//! An addition grafts a named interface onto the generated tree:
//!
//! ```text
//! <path>:<property>:<name>
//! ```
//!
//! sets `<property>` on the module at `<path>` to the interface `<name>`.
//! A leading `/` stands for the root module, so `/:plugin:PluginApi` adds
//! `<root>/plugin`.

use crate::error::{Error, Result};

/// A parsed addition directive with its path already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    /// Joined module path the addition attaches to.
    pub path: String,
    /// Property (and path segment) name of the grafted module.
    pub property: String,
    /// Interface whose body becomes the grafted module.
    pub interface: String,
}

impl Addition {
    /// Parse `<path>:<property>:<name>`, expanding the root shorthand against `root`.
    pub fn parse(input: &str, root: &str) -> Result<Self> {
        let fields: Vec<&str> = input.split(':').collect();
        let [path, property, interface] = fields.as_slice() else {
            return Err(Error::MalformedAddition {
                input: input.to_string(),
            });
        };
        Ok(Self {
            path: normalize_path(path, root),
            property: property.to_string(),
            interface: interface.to_string(),
        })
    }
}

/// Parse every directive, failing on the first malformed one.
pub fn parse_additions<I, S>(inputs: I, root: &str) -> Result<Vec<Addition>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|input| Addition::parse(input.as_ref(), root))
        .collect()
}

/// Replace a leading `/` with `<root>/`, then drop one trailing `/`.
fn normalize_path(path: &str, root: &str) -> String {
    let expanded = match path.strip_prefix('/') {
        Some(rest) => format!("{}/{}", root, rest),
        None => path.to_string(),
    };
    match expanded.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => expanded,
    }
}

/// Default root module name: `@` followed by the kebab-cased interface name.
pub fn default_root(interface: &str) -> String {
    format!("@{}", kebab_case(interface))
}

/// `VendettaObject` -> `vendetta-object`, `HTTPServer` -> `http-server`.
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '_' | ' ' | '.' | '/') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}
