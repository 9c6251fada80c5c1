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


use swimos_structure::{Item, Value};

use crate::Form;

/// JSON documents, using the mapping of `From<serde_json::Value>` and [`Value::to_json`].
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonForm;

impl Form for JsonForm {
    type Target = serde_json::Value;

    fn name(&self) -> &'static str {
        "JSON"
    }

    fn mold(&self, object: &serde_json::Value) -> Item {
        Item::ValueItem(Value::from(object.clone()))
    }

    fn cast(&self, item: &Item) -> Option<serde_json::Value> {
        item.is_defined().then(|| item.value().to_json())
    }
}
