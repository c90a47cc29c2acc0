//! Signup Validation WASM
//!
//! WebAssembly bindings for the registration form.
//! Runs the same rule table as the command line checker, against the live page.

mod dom;

use dom::{browser_today, read_values, DomSlots};
use serde::Serialize;
use signup_validation_core::{Config, FieldName, FormController, FormValues, Validator};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Event};

/// Set panic hook for better error messages in the browser
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn load_config(config_toml: Option<String>) -> Result<Config, JsValue> {
    match config_toml {
        Some(content) => Config::from_toml_str(&content)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {:#}", e))),
        None => Ok(Config::default()),
    }
}

fn build_validator(config: &Config) -> Result<Validator, JsValue> {
    let rules = config
        .rule_set()
        .map_err(|e| JsValue::from_str(&format!("Invalid rules: {}", e)))?;
    Ok(Validator::new(rules))
}

/// Wire validation into the first `<form>` of the page
///
/// Submitting runs every rule and cancels the submission when a field fails;
/// typing into a field clears that field's message.
///
/// # Example (JavaScript)
/// ```javascript
/// import init, { attachRegistrationForm } from './signup_validation_wasm.js';
/// await init();
/// attachRegistrationForm();            // stock rules
/// attachRegistrationForm(configToml);  // with signup.toml overrides
/// ```
#[wasm_bindgen(js_name = attachRegistrationForm)]
pub fn attach_registration_form(config_toml: Option<String>) -> Result<(), JsValue> {
    let config = load_config(config_toml)?;
    let validator = build_validator(&config)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let form = document
        .query_selector("form")?
        .ok_or_else(|| JsValue::from_str("No <form> element in the page"))?;

    let controller = Rc::new(RefCell::new(FormController::new(
        validator,
        DomSlots::new(document.clone(), config.dom.clone()),
    )));

    let on_submit = {
        let controller = Rc::clone(&controller);
        let document = document.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(today) = browser_today() else {
                console::error_1(&"Browser clock gave an invalid date".into());
                event.prevent_default();
                return;
            };
            let values = read_values(&document);
            let submission = controller.borrow_mut().submit_on(&values, today);
            if submission.is_cancelled() {
                event.prevent_default();
            }
        })
    };
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    // listeners live as long as the page
    on_submit.forget();

    for field in FieldName::ALL {
        let Some(input) = document.get_element_by_id(field.as_str()) else {
            console::warn_1(&format!("No input #{} in the page", field).into());
            continue;
        };
        let controller = Rc::clone(&controller);
        let on_input = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            controller.borrow_mut().input_changed(field);
        });
        input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
        on_input.forget();
    }

    Ok(())
}

/// Validate a set of values without touching the page
///
/// # Returns
/// `{ submittable, outcomes: { <field>: { status: "ok" } | { status: "fail", kind, message } } }`
///
/// # Example (JavaScript)
/// ```javascript
/// const report = validateForm({ fullname: 'Jo', email: 'ana@example.com' });
/// report.outcomes.fullname.kind; // "length_out_of_bounds"
/// ```
#[wasm_bindgen(js_name = validateForm)]
pub fn validate_form(values: JsValue, config_toml: Option<String>) -> Result<JsValue, JsValue> {
    let values: FormValues = serde_wasm_bindgen::from_value(values)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse values: {}", e)))?;
    let validator = build_validator(&load_config(config_toml)?)?;
    let today = browser_today().ok_or_else(|| JsValue::from_str("Browser clock gave an invalid date"))?;

    let report = validator.validate_on(&values, today);
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    Ok(report.serialize(&serializer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signup_validation_core::{DomConfig, ErrorSlots};
    use wasm_bindgen_test::*;
    use web_sys::{Document, Element, EventInit, HtmlInputElement};

    wasm_bindgen_test_configure!(run_in_browser);

    const FORM_HTML: &str = r#"
        <input id="fullname"><div id="error-fullname"></div>
        <input id="username"><div id="error-username"></div>
        <input id="email"><div id="error-email"></div>
        <input id="password" type="password"><div id="error-password"></div>
        <input id="confirmPassword" type="password"><div id="error-confirmPassword"></div>
        <input id="birthdate" type="date"><div id="error-birthdate"></div>
        <input id="address"><div id="error-address"></div>
    "#;

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn mount_form(document: &Document) -> Element {
        let form = document.create_element("form").unwrap();
        form.set_inner_html(FORM_HTML);
        document.body().unwrap().append_child(&form).unwrap();
        form
    }

    fn slot_text(document: &Document, field: FieldName) -> String {
        document
            .get_element_by_id(&format!("error-{}", field))
            .and_then(|slot| slot.text_content())
            .unwrap_or_default()
    }

    fn is_invalid(document: &Document, field: FieldName) -> bool {
        document
            .get_element_by_id(field.as_str())
            .is_some_and(|input| input.class_list().contains("is-invalid"))
    }

    fn dispatch(target: &Element, kind: &str) -> Event {
        let init = EventInit::new();
        init.set_cancelable(true);
        let event = Event::new_with_event_init_dict(kind, &init).unwrap();
        target.dispatch_event(&event).unwrap();
        event
    }

    fn outcome(report: &JsValue, field: &str, key: &str) -> JsValue {
        let outcomes = js_sys::Reflect::get(report, &"outcomes".into()).unwrap();
        let field = js_sys::Reflect::get(&outcomes, &field.into()).unwrap();
        js_sys::Reflect::get(&field, &key.into()).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_validate_form_reports_failures() {
        let values = FormValues::new()
            .with(FieldName::Fullname, "Jo")
            .with(FieldName::Email, "ana@example.com");
        let js_values = serde_wasm_bindgen::to_value(&values).unwrap();

        let report = validate_form(js_values, None).unwrap();

        let submittable = js_sys::Reflect::get(&report, &"submittable".into()).unwrap();
        assert_eq!(submittable.as_bool(), Some(false));
        assert_eq!(
            outcome(&report, "fullname", "kind").as_string().as_deref(),
            Some("length_out_of_bounds")
        );
        assert_eq!(outcome(&report, "email", "status").as_string().as_deref(), Some("ok"));
        assert_eq!(outcome(&report, "address", "status").as_string().as_deref(), Some("ok"));
    }

    #[wasm_bindgen_test]
    fn test_validate_form_rejects_unknown_fields() {
        let values = js_sys::Object::new();
        js_sys::Reflect::set(&values, &"phone".into(), &"123".into()).unwrap();
        assert!(validate_form(values.into(), None).is_err());
    }

    #[wasm_bindgen_test]
    fn test_bad_config_is_reported() {
        let values = serde_wasm_bindgen::to_value(&FormValues::new()).unwrap();
        assert!(validate_form(values, Some("[rules]\nminimum_age = \"x\"".to_string())).is_err());
    }

    #[wasm_bindgen_test]
    fn test_attached_form_cancels_and_clears_on_input() {
        let document = document();
        let form = mount_form(&document);
        attach_registration_form(None).unwrap();

        let fullname: HtmlInputElement = document
            .get_element_by_id("fullname")
            .unwrap()
            .dyn_into()
            .unwrap();
        fullname.set_value("Jo");

        let submit = dispatch(&form, "submit");
        assert!(submit.default_prevented());
        assert_eq!(
            slot_text(&document, FieldName::Fullname),
            "El nombre debe tener entre 3 y 50 caracteres."
        );
        assert!(is_invalid(&document, FieldName::Fullname));
        assert_eq!(slot_text(&document, FieldName::Email), "El correo electrónico es obligatorio.");
        assert!(is_invalid(&document, FieldName::Email));
        assert_eq!(slot_text(&document, FieldName::Address), "");
        assert!(!is_invalid(&document, FieldName::Address));

        dispatch(&fullname, "input");
        assert_eq!(slot_text(&document, FieldName::Fullname), "");
        assert!(!is_invalid(&document, FieldName::Fullname));
        assert_eq!(slot_text(&document, FieldName::Email), "El correo electrónico es obligatorio.");
        assert!(is_invalid(&document, FieldName::Email));

        form.remove();
    }

    #[wasm_bindgen_test]
    fn test_dom_slots_survive_a_bad_class_name() {
        let document = document();
        let form = mount_form(&document);
        let dom = DomConfig {
            invalid_class: String::new(),
            ..DomConfig::default()
        };
        let mut slots = DomSlots::new(document.clone(), dom);

        // an empty token makes the class list throw; the message still shows
        slots.show(FieldName::Email, "bad");
        assert_eq!(slot_text(&document, FieldName::Email), "bad");
        slots.clear(FieldName::Email);
        assert_eq!(slot_text(&document, FieldName::Email), "");

        form.remove();
    }

    #[wasm_bindgen_test]
    fn test_browser_today_is_a_real_date() {
        assert!(browser_today().is_some());
    }
}
