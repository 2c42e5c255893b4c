use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::stream::{StreamDefinition, is_valid_endpoint};

static LISTEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*listen\s+(\S+);").unwrap());

static PROXY_PASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*proxy_pass\s+(\S+);").unwrap());

/// Render a stream definition into an nginx `stream` server block.
///
/// Pure and deterministic: identical input yields byte-identical output,
/// which is what lets [`parse`] recover the definition from disk.
pub fn render(def: &StreamDefinition) -> String {
    format!(
        "server {{\n    listen {};\n    proxy_pass {};\n}}\n",
        def.listen, def.target
    )
}

/// Recover a stream definition from a rendered fragment. The name comes
/// from the fragment's file stem; listen/target come from the directives.
/// Returns `None` for text that is not one of our rendered blocks.
pub fn parse(name: &str, fragment: &str) -> Option<StreamDefinition> {
    let listen = LISTEN_RE.captures(fragment)?.get(1)?.as_str();
    let target = PROXY_PASS_RE.captures(fragment)?.get(1)?.as_str();
    if !is_valid_endpoint(listen) || !is_valid_endpoint(target) {
        return None;
    }
    Some(StreamDefinition {
        name: name.to_string(),
        listen: listen.to_string(),
        target: target.to_string(),
    })
}
