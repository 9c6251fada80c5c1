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


use swimos_structure::{Attr, Item, Record, Text, Value};
use tracing::trace;

use crate::{Form, FormError};

/// Discriminates records by a leading attribute. Molding prepends `@tag` to the record produced
/// by the inner form and casting requires it, passing the remainder of the record to the inner
/// form.
#[derive(Clone, Debug)]
pub struct TagForm<F> {
    tag: Text,
    form: F,
}

impl<F> TagForm<F> {
    pub fn new(tag: impl Into<Text>, form: F) -> Self {
        TagForm {
            tag: tag.into(),
            form,
        }
    }

    pub fn inner(&self) -> &F {
        &self.form
    }
}

impl<F: Form> Form for TagForm<F> {
    type Target = F::Target;

    fn name(&self) -> &'static str {
        self.form.name()
    }

    fn tag(&self) -> Option<&str> {
        Some(self.tag.as_str())
    }

    fn unit(&self) -> Option<F::Target> {
        self.form.unit()
    }

    fn mold(&self, object: &F::Target) -> Item {
        let body = match self.form.mold(object) {
            Item::ValueItem(Value::Extant) => Record::new(),
            Item::ValueItem(value) => value.unflattened(),
            field => Record::of([field]),
        };
        Item::ValueItem(Value::Record(body.prepended(Attr::of(self.tag.clone()))))
    }

    fn cast(&self, item: &Item) -> Option<F::Target> {
        self.try_cast(item).ok()
    }

    fn try_cast(&self, item: &Item) -> Result<F::Target, FormError> {
        let value = item.value();
        match value.tag() {
            Some(tag) if tag == self.tag => self.form.try_cast(&Item::ValueItem(value.body())),
            found => {
                trace!(expected = %self.tag, found = ?found, "Record tag did not match form.");
                Err(FormError::MismatchedTag {
                    expected: self.tag.to_string(),
                })
            }
        }
    }
}

/// Supplies a default for absent and extant items that the inner form cannot cast.
#[derive(Clone, Debug)]
pub struct UnitForm<F: Form> {
    form: F,
    unit: F::Target,
}

impl<F: Form> UnitForm<F> {
    pub fn new(form: F, unit: F::Target) -> Self {
        UnitForm { form, unit }
    }
}

impl<F> Form for UnitForm<F>
where
    F: Form,
    F::Target: Clone,
{
    type Target = F::Target;

    fn name(&self) -> &'static str {
        self.form.name()
    }

    fn tag(&self) -> Option<&str> {
        self.form.tag()
    }

    fn unit(&self) -> Option<F::Target> {
        Some(self.unit.clone())
    }

    fn mold(&self, object: &F::Target) -> Item {
        self.form.mold(object)
    }

    fn cast(&self, item: &Item) -> Option<F::Target> {
        self.form
            .cast(item)
            .or_else(|| (!item.is_distinct()).then(|| self.unit.clone()))
    }

    fn try_cast(&self, item: &Item) -> Result<F::Target, FormError> {
        match self.form.try_cast(item) {
            Err(_) if !item.is_distinct() => Ok(self.unit.clone()),
            result => result,
        }
    }
}
