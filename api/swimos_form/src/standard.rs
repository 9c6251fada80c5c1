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


use std::any::Any;

use swimos_structure::{Item, Num, Value};

use crate::Form;

/// Text, or the textual form of any scalar.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringForm;

impl Form for StringForm {
    type Target = String;

    fn name(&self) -> &'static str {
        "Text"
    }

    fn mold(&self, object: &String) -> Item {
        Item::of(object.as_str())
    }

    fn cast(&self, item: &Item) -> Option<String> {
        item.value().string_value()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NumForm;

impl Form for NumForm {
    type Target = Num;

    fn name(&self) -> &'static str {
        "Num"
    }

    fn mold(&self, object: &Num) -> Item {
        Item::of(*object)
    }

    fn cast(&self, item: &Item) -> Option<Num> {
        item.value().number_value()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BoolForm;

impl Form for BoolForm {
    type Target = bool;

    fn name(&self) -> &'static str {
        "Bool"
    }

    fn mold(&self, object: &bool) -> Item {
        Item::of(*object)
    }

    fn cast(&self, item: &Item) -> Option<bool> {
        item.value().boolean_value()
    }
}

macro_rules! primitive_form {
    ($(#[$meta:meta])* $form:ident, $target:ty, $conv:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $form;

        impl Form for $form {
            type Target = $target;

            fn name(&self) -> &'static str {
                stringify!($target)
            }

            fn mold(&self, object: &$target) -> Item {
                Item::of(*object)
            }

            fn cast(&self, item: &Item) -> Option<$target> {
                item.value().$conv()
            }
        }
    };
}

primitive_form!(
    /// Numbers (or numeric text), truncated to `i32`.
    I32Form,
    i32,
    int_value
);
primitive_form!(I64Form, i64, long_value);
primitive_form!(U32Form, u32, uint32_value);
primitive_form!(U64Form, u64, uint64_value);
primitive_form!(F64Form, f64, float_value);

/// The value of any defined item. Fields cast to their values.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueForm;

impl Form for ValueForm {
    type Target = Value;

    fn name(&self) -> &'static str {
        "Value"
    }

    fn mold(&self, object: &Value) -> Item {
        Item::ValueItem(object.clone())
    }

    fn cast(&self, item: &Item) -> Option<Value> {
        item.is_defined().then(|| item.to_value())
    }
}

/// Any defined item, unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct ItemForm;

impl Form for ItemForm {
    type Target = Item;

    fn name(&self) -> &'static str {
        "Item"
    }

    fn mold(&self, object: &Item) -> Item {
        object.clone()
    }

    fn cast(&self, item: &Item) -> Option<Item> {
        item.is_defined().then(|| item.clone())
    }
}

/// Type-erased native values. Molding uses [`Item::from_dyn`] and produces an absent item for
/// types with no structural representation. Casting yields the boxed [`Value`] of the item.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnyForm;

impl Form for AnyForm {
    type Target = Box<dyn Any>;

    fn name(&self) -> &'static str {
        "Any"
    }

    fn mold(&self, object: &Box<dyn Any>) -> Item {
        Item::from_dyn(object.as_ref()).unwrap_or_default()
    }

    fn cast(&self, item: &Item) -> Option<Box<dyn Any>> {
        item.is_defined()
            .then(|| Box::new(item.to_value()) as Box<dyn Any>)
    }
}
