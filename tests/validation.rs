//! Integration tests for `#[derive(Validate)]`. These live outside `src/`
//! because the macro expands to `impl ::junction::validator::Validate`,
//! which only resolves once `junction` is depended on under its own name,
//! exactly the shape a downstream crate's code is in, unlike an inline
//! `#[cfg(test)]` module compiled as part of the `junction` crate itself.

use junction::prelude::*;

#[derive(Validate)]
struct SignupForm {
    #[validate(minlength = 3, maxlength = 32)]
    name: String,

    #[validate(min = 18.0, max = 120.0)]
    age: u32,

    #[validate(format = "email")]
    email: String,

    #[validate(omitempty)]
    referral_code: String,
}

#[test]
fn three_simultaneous_violations_join_with_semicolon_space_in_field_order() {
    let form = SignupForm {
        name: "Na".into(),
        age: 10,
        email: "bogus".into(),
        referral_code: String::new(),
    };

    let err = form.validate().unwrap_err();
    let messages: Vec<&str> = err.to_string().split("; ").collect();

    assert_eq!(messages.len(), 3);
    assert!(messages[0].contains("name") && messages[0].contains("3"));
    assert!(messages[1].contains("age") && messages[1].contains("18"));
    assert!(messages[2].contains("email"));
}

#[test]
fn valid_struct_has_no_errors() {
    let form = SignupForm {
        name: "Ada".into(),
        age: 30,
        email: "ada@example.com".into(),
        referral_code: String::new(),
    };
    assert!(form.validate().is_ok());
}

#[derive(Validate)]
struct RequiredFields {
    #[validate(omitempty)]
    nickname: String,
    display_name: String,
}

#[test]
fn omitempty_field_at_zero_value_is_not_a_violation_but_required_field_is() {
    let value = RequiredFields {
        nickname: String::new(),
        display_name: String::new(),
    };
    let err = value.validate().unwrap_err();
    assert_eq!(err.to_string(), "display_name is required");
}

#[derive(Validate)]
struct Preferences {
    #[validate(enumerate = "light|dark|auto")]
    theme: String,

    #[validate(multiple_of = 5.0)]
    batch_size: u32,

    #[validate(min_items = 1, max_items = 3, unique_items)]
    tags: Vec<String>,
}

#[test]
fn enum_multiple_of_and_item_count_rules_all_fire_together() {
    let value = Preferences {
        theme: "purple".into(),
        batch_size: 7,
        tags: vec!["a".into(), "a".into(), "b".into(), "c".into(), "d".into()],
    };
    let err = value.validate().unwrap_err();
    let errors = err.to_string();
    assert!(errors.contains("theme"));
    assert!(errors.contains("batch_size"));
    // tags violates both max_items (5 > 3) and unique_items (duplicate "a")
    assert!(errors.matches("tags").count() >= 2);
}

#[derive(Validate)]
struct WithCustomError {
    #[validate(minlength = 8, error = "password is too short")]
    password: String,
}

#[test]
fn custom_error_overrides_default_localized_message() {
    let value = WithCustomError { password: "short".into() };
    let err = value.validate().unwrap_err();
    assert_eq!(err.to_string(), "password is too short");
}

#[derive(Validate)]
struct Address {
    #[validate(minlength = 1)]
    city: String,
}

#[derive(Validate)]
struct Profile {
    #[validate(minlength = 1)]
    handle: String,

    #[validate(nested)]
    address: Address,

    #[validate(dive, min_items = 0)]
    past_addresses: Vec<Address>,
}

#[test]
fn nested_struct_and_dive_slice_errors_are_prefixed_with_field_path() {
    let value = Profile {
        handle: "ok".into(),
        address: Address { city: String::new() },
        past_addresses: vec![Address { city: String::new() }],
    };
    let err = value.validate().unwrap_err();
    let joined = err.to_string();
    assert!(joined.contains("address.city"));
    assert!(joined.contains("past_addresses[0].city"));
}

#[test]
fn spanish_locale_is_used_when_requested() {
    let value = RequiredFields {
        nickname: String::new(),
        display_name: String::new(),
    };
    let err = value.validate_locale("es").unwrap_err();
    assert_eq!(err.to_string(), "display_name es obligatorio");
}
