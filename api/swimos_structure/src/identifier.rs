// Copyright 2015-2024 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rules for bare identifiers in the textual rendering of values.

use std::borrow::Cow;
use std::fmt::{Formatter, Write};

/// Determine if a character may start a bare identifier.
///
/// ```
/// use swimos_structure::identifier::is_identifier_start;
///
/// assert!(is_identifier_start('a'));
/// assert!(is_identifier_start('_'));
/// assert!(!is_identifier_start('2'));
/// assert!(!is_identifier_start('@'));
/// ```
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c == '_'
        || c == '\u{b7}'
        || ('\u{c0}'..='\u{d6}').contains(&c)
        || ('\u{d8}'..='\u{f6}').contains(&c)
        || ('\u{f8}'..='\u{37d}').contains(&c)
        || ('\u{37f}'..='\u{1fff}').contains(&c)
        || ('\u{200c}'..='\u{200d}').contains(&c)
        || ('\u{203f}'..='\u{2040}').contains(&c)
        || ('\u{2070}'..='\u{218f}').contains(&c)
        || ('\u{2c00}'..='\u{2fef}').contains(&c)
        || ('\u{3001}'..='\u{d7ff}').contains(&c)
        || ('\u{f900}'..='\u{fdcf}').contains(&c)
        || ('\u{fdf0}'..='\u{fffd}').contains(&c)
        || ('\u{10000}'..='\u{effff}').contains(&c)
}

/// Determine if a character may continue a bare identifier.
pub fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c == '-' || c.is_ascii_digit()
}

/// Determine if a string can be written without quotes. The boolean literals are excluded.
///
/// ```
/// use swimos_structure::identifier::is_identifier;
///
/// assert!(is_identifier("name"));
/// assert!(is_identifier("two_parts"));
/// assert!(!is_identifier("2morrow"));
/// assert!(!is_identifier("true"));
/// ```
pub fn is_identifier(name: &str) -> bool {
    if name == "true" || name == "false" {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_char),
        _ => false,
    }
}

/// Write a string as a bare identifier where possible and as a quoted, escaped literal otherwise.
pub fn write_string_literal(literal: &str, f: &mut Formatter<'_>) -> std::fmt::Result {
    if is_identifier(literal) {
        f.write_str(literal)
    } else {
        write!(f, "\"{}\"", escape_if_needed(literal))
    }
}

pub fn escape_if_needed(text: &str) -> Cow<'_, str> {
    if text.chars().any(|c| c < '\u{20}' || c == '"' || c == '\\') {
        Cow::Owned(escape_text(text))
    } else {
        Cow::Borrowed(text)
    }
}

fn escape_text(text: &str) -> String {
    let mut output = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\r' => output.push_str("\\r"),
            '\n' => output.push_str("\\n"),
            '\t' => output.push_str("\\t"),
            '\u{08}' => output.push_str("\\b"),
            '\u{0c}' => output.push_str("\\f"),
            cp if cp < '\u{20}' => {
                let _ = write!(output, "\\u{:04x}", cp as u32);
            }
            _ => output.push(c),
        }
    }
    output
}
