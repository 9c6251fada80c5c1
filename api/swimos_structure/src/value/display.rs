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

use std::fmt::{Display, Formatter};

use crate::identifier::write_string_literal;
use crate::item::Item;
use crate::record::Record;
use crate::value::Value;

/// Write items separated by commas.
pub(crate) fn write_items(items: &[Item], f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut first = true;
    for item in items {
        if !first {
            f.write_str(",")?;
        }
        first = false;
        Display::fmt(item, f)?;
    }
    Ok(())
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Absent | Value::Extant => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Num(n) => write!(f, "{}", n),
            Value::Text(text) => write_string_literal(text, f),
            Value::Data(data) => write!(f, "{}", data),
            Value::Record(record) => write!(f, "{}", record),
            Value::Expression(expr) => write!(f, "{}", expr),
            Value::Func(func) => write!(f, "{}", func),
        }
    }
}

/// Leading attributes are written before the body, which is enclosed in braces.
impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let items = self.items();
        let header_len = items.iter().take_while(|item| item.is_attr()).count();
        let (header, body) = items.split_at(header_len);
        for attr in header {
            Display::fmt(attr, f)?;
        }
        if header.is_empty() || !body.is_empty() {
            f.write_str("{")?;
            write_items(body, f)?;
            f.write_str("}")?;
        }
        Ok(())
    }
}
