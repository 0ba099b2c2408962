//! Display-math normalization for align-like environments
//!
//! Pandoc wants `align`, `gather` and `multline` (starred or not) as bare
//! environments, while Obsidian renders them only inside `$$ ... $$`.
//! [`strip_math_delimiters`] removes the wrapper, [`restore_math_blocks`] puts
//! it back.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{DISPLAY_MATH_DELIMITER, MATH_ENV_PATTERN};

static BEGIN_ENV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\\begin\{{({})\}}", MATH_ENV_PATTERN)).expect("begin pattern is valid")
});

static WRAPPED_BEGIN_ENV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\$\$\s*\\begin\{{({})\}}", MATH_ENV_PATTERN))
        .expect("wrapped begin pattern is valid")
});

static CLOSING_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\$\$").expect("closing delimiter pattern is valid"));

fn end_marker(env: &str) -> String {
    format!("\\end{{{}}}", env)
}

/// Wrap every align-like environment in `$$` lines.
///
/// The first matching `\end{env}` closes an environment; the body is kept
/// verbatim. An environment without a closing marker is left alone.
pub fn restore_math_blocks(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    let mut search_from = 0;

    while let Some(caps) = BEGIN_ENV.captures_at(input, search_from) {
        let (begin, env) = match (caps.get(0), caps.get(1)) {
            (Some(begin), Some(env)) => (begin, env.as_str()),
            _ => break,
        };

        let end = end_marker(env);
        let Some(offset) = input[begin.end()..].find(&end) else {
            search_from = begin.end();
            continue;
        };
        let block_end = begin.end() + offset + end.len();

        output.push_str(&input[cursor..begin.start()]);
        output.push_str(DISPLAY_MATH_DELIMITER);
        output.push('\n');
        output.push_str(&input[begin.start()..block_end]);
        output.push('\n');
        output.push_str(DISPLAY_MATH_DELIMITER);

        cursor = block_end;
        search_from = block_end;
    }

    output.push_str(&input[cursor..]);
    output
}

/// Remove a `$$` pair wrapped directly around an align-like environment,
/// along with the whitespace between delimiter and environment.
pub fn strip_math_delimiters(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    let mut search_from = 0;

    while let Some(caps) = WRAPPED_BEGIN_ENV.captures_at(input, search_from) {
        let (opening, env) = match (caps.get(0), caps.get(1)) {
            (Some(opening), Some(env)) => (opening, env.as_str()),
            _ => break,
        };
        let begin_start = opening.end() - format!("\\begin{{{}}}", env).len();

        match find_wrapped_end(input, opening.end(), env) {
            Some((env_end, closing_end)) => {
                output.push_str(&input[cursor..opening.start()]);
                output.push_str(&input[begin_start..env_end]);
                cursor = closing_end;
                search_from = closing_end;
            }
            // No match at this `$`; try from the next character
            None => search_from = opening.start() + 1,
        }
    }

    output.push_str(&input[cursor..]);
    output
}

/// Earliest `\end{env}` after `from` that is followed by optional whitespace
/// and `$$`. Returns the end of the marker and the end of the closing `$$`.
fn find_wrapped_end(input: &str, from: usize, env: &str) -> Option<(usize, usize)> {
    let end = end_marker(env);
    let mut pos = from;
    while let Some(offset) = input[pos..].find(&end) {
        let env_end = pos + offset + end.len();
        if let Some(closing) = CLOSING_DELIMITER.find(&input[env_end..]) {
            return Some((env_end, env_end + closing.end()));
        }
        pos = env_end;
    }
    None
}
