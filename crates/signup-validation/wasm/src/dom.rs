//! DOM-backed error slots and field reading

use chrono::NaiveDate;
use signup_validation_core::{DomConfig, ErrorSlots, FieldName, FormValues};
use wasm_bindgen::JsValue;
use web_sys::{console, Document, Element};

/// Error slots living in the page.
///
/// Field `x` is the element with id `x`; its message goes into the element
/// with id `<error_prefix>x`.
pub struct DomSlots {
    document: Document,
    dom: DomConfig,
}

impl DomSlots {
    pub fn new(document: Document, dom: DomConfig) -> Self {
        Self { document, dom }
    }

    fn input(&self, field: FieldName) -> Option<Element> {
        self.document.get_element_by_id(field.as_str())
    }

    fn error_slot(&self, field: FieldName) -> Option<Element> {
        let id = self.dom.error_slot_id(field);
        let slot = self.document.get_element_by_id(&id);
        if slot.is_none() {
            console::warn_1(&format!("No error element #{} in the page", id).into());
        }
        slot
    }
}

impl ErrorSlots for DomSlots {
    fn show(&mut self, field: FieldName, message: &str) {
        if let Some(input) = self.input(field) {
            if let Err(err) = input.class_list().add_1(&self.dom.invalid_class) {
                warn_class_error(field, &err);
            }
        }
        if let Some(slot) = self.error_slot(field) {
            slot.set_text_content(Some(message));
        }
    }

    fn clear(&mut self, field: FieldName) {
        if let Some(input) = self.input(field) {
            if let Err(err) = input.class_list().remove_1(&self.dom.invalid_class) {
                warn_class_error(field, &err);
            }
        }
        if let Some(slot) = self.error_slot(field) {
            slot.set_text_content(Some(""));
        }
    }
}

fn warn_class_error(field: FieldName, err: &JsValue) {
    console::warn_2(&format!("Could not update the class list of #{}:", field).into(), err);
}

/// Current value of every field present in the page
pub fn read_values(document: &Document) -> FormValues {
    FieldName::ALL
        .into_iter()
        .filter_map(|field| {
            let element = document.get_element_by_id(field.as_str())?;
            // inputs, textareas and selects all expose `value`
            let value = js_sys::Reflect::get(&element, &JsValue::from_str("value"))
                .ok()?
                .as_string()?;
            Some((field, value))
        })
        .collect()
}

/// Today on the browser's local calendar
pub fn browser_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}
