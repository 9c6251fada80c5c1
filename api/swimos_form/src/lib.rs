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


//! # SwimOS Forms
//!
//! A [`Form`] converts between native Rust values and the structural [`Item`]s of
//! `swimos_structure`. Forms are provided for the standard scalar types, for raw values and
//! items and (with the `json` feature) for JSON documents. The [`TagForm`] and [`UnitForm`]
//! combinators wrap another form to discriminate records by a leading attribute and to supply a
//! default for missing values.

use swimos_structure::{Item, Text, Value};

mod combinators;
#[cfg(feature = "json")]
mod json;
mod standard;

#[cfg(test)]
mod tests;

pub use combinators::{TagForm, UnitForm};
#[cfg(feature = "json")]
pub use json::JsonForm;
pub use standard::{
    AnyForm, BoolForm, F64Form, I32Form, I64Form, ItemForm, NumForm, StringForm, U32Form, U64Form,
    ValueForm,
};

#[doc(hidden)]
pub use swimos_structure as structure;

/// Errors produced when a structural item cannot be cast by a form.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A tagged form was applied to a record without the expected leading attribute.
    #[error("Expected a record tagged with @{expected}.")]
    MismatchedTag { expected: String },
    /// The item did not have a representation as the target type.
    #[error("Expected {expected} but found {found}.")]
    IncorrectType {
        expected: &'static str,
        found: &'static str,
    },
}

/// A bidirectional conversion between a native type and structural items.
///
/// `mold` always succeeds. `cast` returns `None` when the item has no representation as the
/// target; [`Form::try_cast`] reports the reason.
pub trait Form {
    type Target;

    /// The name of the target type, used in error messages.
    fn name(&self) -> &'static str;

    /// The key of the attribute that discriminates records produced by this form.
    fn tag(&self) -> Option<&str> {
        None
    }

    /// The value substituted for a missing item.
    fn unit(&self) -> Option<Self::Target> {
        None
    }

    fn mold(&self, object: &Self::Target) -> Item;

    fn cast(&self, item: &Item) -> Option<Self::Target>;

    fn try_cast(&self, item: &Item) -> Result<Self::Target, FormError> {
        self.cast(item).ok_or_else(|| FormError::IncorrectType {
            expected: self.name(),
            found: item.value().kind().name(),
        })
    }

    /// Wraps this form so that molded records lead with an attribute named `tag` and only records
    /// that do are cast.
    fn tagged(self, tag: impl Into<Text>) -> TagForm<Self>
    where
        Self: Sized,
    {
        TagForm::new(tag, self)
    }

    /// Wraps this form so that absent and extant items cast to `unit`.
    fn with_unit(self, unit: Self::Target) -> UnitForm<Self>
    where
        Self: Sized,
    {
        UnitForm::new(self, unit)
    }
}

impl<F: Form + ?Sized> Form for &F {
    type Target = F::Target;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn tag(&self) -> Option<&str> {
        (**self).tag()
    }

    fn unit(&self) -> Option<Self::Target> {
        (**self).unit()
    }

    fn mold(&self, object: &Self::Target) -> Item {
        (**self).mold(object)
    }

    fn cast(&self, item: &Item) -> Option<Self::Target> {
        (**self).cast(item)
    }

    fn try_cast(&self, item: &Item) -> Result<Self::Target, FormError> {
        (**self).try_cast(item)
    }
}

/// Casting of structural items and values through a [`Form`].
///
/// ```
/// use swimos_form::{Cast, I32Form, StringForm};
/// use swimos_structure::Value;
///
/// let value = Value::text("42");
/// assert_eq!(value.cast(&I32Form), Some(42));
/// assert_eq!(Value::from(7).cast(&StringForm), Some("7".to_string()));
/// ```
pub trait Cast {
    fn cast<F: Form>(&self, form: &F) -> Option<F::Target>;

    fn try_cast<F: Form>(&self, form: &F) -> Result<F::Target, FormError>;
}

impl Cast for Item {
    fn cast<F: Form>(&self, form: &F) -> Option<F::Target> {
        form.cast(self)
    }

    fn try_cast<F: Form>(&self, form: &F) -> Result<F::Target, FormError> {
        form.try_cast(self)
    }
}

impl Cast for Value {
    fn cast<F: Form>(&self, form: &F) -> Option<F::Target> {
        form.cast(&Item::ValueItem(self.clone()))
    }

    fn try_cast<F: Form>(&self, form: &F) -> Result<F::Target, FormError> {
        form.try_cast(&Item::ValueItem(self.clone()))
    }
}
