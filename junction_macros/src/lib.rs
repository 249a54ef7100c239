//! Derive macros for `junction::Validate` and `junction::binder::FromForm`.
//!
//! Rust has no runtime reflection, so both the tag-driven validation and the
//! field-by-field form binding the core needs are resolved at compile time
//! instead: these macros read attributes off each field and expand them into
//! calls against the small set of pure functions in `junction::validator`
//! and `junction::binder`.
//!
//! Field-type dispatch (string vs numeric vs sequence vs nested) is done by
//! matching the textual form of the field's type rather than by true type
//! introspection, since a derive macro only ever sees syntax. This mirrors
//! how `brrtrouter_macros` pattern-matches attribute shapes without a full
//! type-checker pass.

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Data, DeriveInput, Fields, Lit, Meta, MetaNameValue, NestedMeta, Type,
};

/// Derives `junction::validator::Validate` from `#[validate(...)]` field
/// attributes.
///
/// Struct-shaped fields (a nested struct, `Option<Struct>`, or
/// `Vec<Struct>`) are **not** recursed into by default. Tag such a field
/// with `#[validate(nested)]` (or the synonym `dive`) to have its own
/// `validate_locale` called and its errors folded in under a
/// `field.nested_field` / `field[i].nested_field` path. This is a deliberate
/// narrowing of the spec this crate implements, which treats nested
/// recursion as the default: a derive macro only sees a field's type as
/// syntax, not a resolved type, so it cannot tell at expansion time whether
/// an arbitrary struct-shaped field actually implements `Validate` — emitting
/// an unconditional `.validate_locale(...)` call would fail to compile for
/// any field whose type doesn't. Forgetting the attribute on a struct-shaped
/// field is not an error; it silently skips that field's nested validation.
#[proc_macro_derive(Validate, attributes(validate))]
pub fn derive_validate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(&input, "Validate can only be derived for structs with named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Validate can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let mut field_checks = Vec::new();
    for field in fields {
        match build_field_check(field) {
            Ok(Some(tokens)) => field_checks.push(tokens),
            Ok(None) => {}
            Err(err) => return err.to_compile_error().into(),
        }
    }

    let expanded = quote! {
        impl ::junction::validator::Validate for #name {
            fn validate_locale(&self, locale: &str) -> ::std::result::Result<(), ::junction::validator::ValidationErrors> {
                let mut errors = ::junction::validator::ValidationErrors::new();
                #(#field_checks)*
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(errors)
                }
            }
        }
    };

    expanded.into()
}

struct Rule {
    kind: String,
    value: Option<Lit>,
}

fn parse_rules(field: &syn::Field) -> syn::Result<Vec<Rule>> {
    let mut rules = Vec::new();
    for attr in &field.attrs {
        if !attr.path.is_ident("validate") {
            continue;
        }
        let meta = attr.parse_meta()?;
        let list = match meta {
            Meta::List(list) => list,
            _ => continue,
        };
        for nested in list.nested {
            match nested {
                NestedMeta::Meta(Meta::NameValue(MetaNameValue { path, lit, .. })) => {
                    let kind = path
                        .get_ident()
                        .map(|i| i.to_string())
                        .ok_or_else(|| syn::Error::new(path.span(), "expected a simple identifier"))?;
                    rules.push(Rule { kind, value: Some(lit) });
                }
                NestedMeta::Meta(Meta::Path(path)) => {
                    let kind = path
                        .get_ident()
                        .map(|i| i.to_string())
                        .ok_or_else(|| syn::Error::new(path.span(), "expected a simple identifier"))?;
                    rules.push(Rule { kind, value: None });
                }
                other => {
                    return Err(syn::Error::new_spanned(other, "unsupported #[validate(...)] entry"));
                }
            }
        }
    }
    Ok(rules)
}

fn lit_str(lit: &Lit, span: proc_macro2::Span) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        _ => Err(syn::Error::new(span, "expected a string literal")),
    }
}

fn lit_f64(lit: &Lit, span: proc_macro2::Span) -> syn::Result<f64> {
    match lit {
        Lit::Int(i) => i.base10_parse::<f64>(),
        Lit::Float(f) => f.base10_parse::<f64>(),
        _ => Err(syn::Error::new(span, "expected a numeric literal")),
    }
}

fn lit_usize(lit: &Lit, span: proc_macro2::Span) -> syn::Result<usize> {
    match lit {
        Lit::Int(i) => i.base10_parse::<usize>(),
        _ => Err(syn::Error::new(span, "expected an integer literal")),
    }
}

/// Textual classification of a field's type, since a derive macro has no
/// access to real type information.
enum Shape {
    StringLike,
    Numeric,
    Bool,
    Sequence(Box<Shape>),
    Optional(Box<Shape>),
    Other,
}

fn classify(ty: &Type) -> Shape {
    let text = quote!(#ty).to_string().replace(' ', "");
    if let Some(inner) = strip_wrapper(&text, "Option<") {
        return Shape::Optional(Box::new(classify_text(&inner)));
    }
    classify_text(&text)
}

fn classify_text(text: &str) -> Shape {
    if let Some(inner) = strip_wrapper(text, "Option<") {
        return Shape::Optional(Box::new(classify_text(&inner)));
    }
    if let Some(inner) = strip_wrapper(text, "Vec<") {
        return Shape::Sequence(Box::new(classify_text(&inner)));
    }
    match text {
        "String" | "&str" | "str" => Shape::StringLike,
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64" | "u128" | "usize"
        | "f32" | "f64" => Shape::Numeric,
        "bool" => Shape::Bool,
        _ => Shape::Other,
    }
}

fn strip_wrapper(text: &str, prefix: &str) -> Option<String> {
    if text.starts_with(prefix) && text.ends_with('>') {
        Some(text[prefix.len()..text.len() - 1].to_string())
    } else {
        None
    }
}

fn build_field_check(field: &syn::Field) -> syn::Result<Option<TokenStream2>> {
    let rules = parse_rules(field)?;
    if rules.iter().any(|r| r.kind == "skip") {
        return Ok(None);
    }

    let ident = field.ident.as_ref().expect("named field");
    let span = field.span();

    let mut field_name = ident.to_string();
    for attr in &field.attrs {
        if attr.path.is_ident("serde") {
            if let Ok(Meta::List(list)) = attr.parse_meta() {
                for nested in list.nested {
                    if let NestedMeta::Meta(Meta::NameValue(MetaNameValue { path, lit, .. })) = nested {
                        if path.is_ident("rename") {
                            if let Lit::Str(s) = lit {
                                field_name = s.value();
                            }
                        }
                    }
                }
            }
        }
    }

    let mut custom_error: Option<String> = None;
    let mut omitempty = rules.iter().any(|r| r.kind == "omitempty");
    // `nested`/`dive` opt in to recursing into this field via `Validate`.
    // A derive macro only ever sees syntax: it cannot check at expansion
    // time whether an arbitrary `Other`-shaped field type actually
    // implements `Validate`, so recursion is explicit here rather than
    // attempted unconditionally and failing to compile for fields that
    // don't.
    let nested = rules.iter().any(|r| r.kind == "nested" || r.kind == "dive");
    let mut min_len: Option<usize> = None;
    let mut max_len: Option<usize> = None;
    let mut pattern: Option<String> = None;
    let mut enumerate: Option<String> = None;
    let mut format: Option<String> = None;
    let mut min: Option<f64> = None;
    let mut max: Option<f64> = None;
    let mut multiple_of: Option<f64> = None;
    let mut min_items: Option<usize> = None;
    let mut max_items: Option<usize> = None;
    let unique_items = rules.iter().any(|r| r.kind == "unique_items");
    let explicit_required = rules.iter().any(|r| r.kind == "required");

    for rule in &rules {
        match (rule.kind.as_str(), &rule.value) {
            ("error", Some(lit)) => custom_error = Some(lit_str(lit, span)?),
            ("minlength", Some(lit)) => min_len = Some(lit_usize(lit, span)?),
            ("maxlength", Some(lit)) => max_len = Some(lit_usize(lit, span)?),
            ("pattern", Some(lit)) => pattern = Some(lit_str(lit, span)?),
            // spelled `enumerate` rather than the struct-tag name `enum`
            // because `enum` is a Rust keyword and can't appear as a bare
            // meta-path identifier in `#[validate(enum = "...")]`.
            ("enumerate", Some(lit)) => enumerate = Some(lit_str(lit, span)?),
            ("format", Some(lit)) => format = Some(lit_str(lit, span)?),
            ("min", Some(lit)) => min = Some(lit_f64(lit, span)?),
            ("max", Some(lit)) => max = Some(lit_f64(lit, span)?),
            ("multiple_of", Some(lit)) => multiple_of = Some(lit_f64(lit, span)?),
            ("min_items", Some(lit)) => min_items = Some(lit_usize(lit, span)?),
            ("max_items", Some(lit)) => max_items = Some(lit_usize(lit, span)?),
            _ => {}
        }
    }

    let shape = classify(&field.ty);
    let is_optional = matches!(shape, Shape::Optional(_));
    if is_optional {
        omitempty = true;
    }

    let error_override = match &custom_error {
        Some(msg) => quote! { Some(#msg) },
        None => quote! { None },
    };

    let inner_shape = match &shape {
        Shape::Optional(inner) => inner.as_ref(),
        other => other,
    };

    // A struct-shaped field (bare or inside a `Vec<_>`) is validated by
    // recursion (`nested`/`dive`), not by a zero-value comparison: the
    // required check below needs `Self: PartialEq + Default`, a bound
    // unrelated struct types have no reason to satisfy just to be nested
    // inside a validated one.
    let is_struct_shaped = matches!(inner_shape, Shape::Other)
        || matches!(inner_shape, Shape::Sequence(elem) if matches!(elem.as_ref(), Shape::Other));
    let required = !is_struct_shaped && (explicit_required || !omitempty);

    let value_expr: TokenStream2 = if is_optional {
        quote! { value }
    } else {
        quote! { (&self.#ident) }
    };

    // Numeric comparisons need an owned f64, not a reference: numeric field
    // types are all `Copy`, so read them by value instead of routing through
    // `value_expr` (which would hand back `&T` and make `as f64` ill-typed).
    let value_num: TokenStream2 = if is_optional {
        quote! { (*value as f64) }
    } else {
        quote! { (self.#ident as f64) }
    };

    let mut checks = TokenStream2::new();

    if let Some(n) = min_len {
        checks.extend(quote_spanned! {span=>
            if #value_expr.len() < #n {
                errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                    .unwrap_or_else(|| ::junction::validator::messages::minlength(locale, #field_name, #n)));
            }
        });
    }
    if let Some(n) = max_len {
        checks.extend(quote_spanned! {span=>
            if #value_expr.len() > #n {
                errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                    .unwrap_or_else(|| ::junction::validator::messages::maxlength(locale, #field_name, #n)));
            }
        });
    }
    if let Some(re) = &pattern {
        checks.extend(quote_spanned! {span=>
            if !::junction::validator::rules::matches_pattern(#value_expr.as_ref(), #re) {
                errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                    .unwrap_or_else(|| ::junction::validator::messages::pattern(locale, #field_name)));
            }
        });
    }
    if let Some(values) = &enumerate {
        checks.extend(quote_spanned! {span=>
            if !::junction::validator::rules::in_enum(#value_expr.as_ref(), #values) {
                errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                    .unwrap_or_else(|| ::junction::validator::messages::enumerate(locale, #field_name, #values)));
            }
        });
    }
    if let Some(kind) = &format {
        checks.extend(quote_spanned! {span=>
            if !::junction::validator::rules::matches_format(#value_expr.as_ref(), #kind) {
                errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                    .unwrap_or_else(|| ::junction::validator::messages::format(locale, #field_name, #kind)));
            }
        });
    }
    if matches!(inner_shape, Shape::Numeric) {
        if let Some(n) = min {
            checks.extend(quote_spanned! {span=>
                if #value_num < #n {
                    errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                        .unwrap_or_else(|| ::junction::validator::messages::min(locale, #field_name, #n)));
                }
            });
        }
        if let Some(n) = max {
            checks.extend(quote_spanned! {span=>
                if #value_num > #n {
                    errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                        .unwrap_or_else(|| ::junction::validator::messages::max(locale, #field_name, #n)));
                }
            });
        }
        if let Some(n) = multiple_of {
            checks.extend(quote_spanned! {span=>
                if !::junction::validator::rules::is_multiple_of(#value_num, #n) {
                    errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                        .unwrap_or_else(|| ::junction::validator::messages::multiple_of(locale, #field_name, #n)));
                }
            });
        }
    }
    if let Shape::Sequence(_) = inner_shape {
        if let Some(n) = min_items {
            checks.extend(quote_spanned! {span=>
                if #value_expr.len() < #n {
                    errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                        .unwrap_or_else(|| ::junction::validator::messages::min_items(locale, #field_name, #n)));
                }
            });
        }
        if let Some(n) = max_items {
            checks.extend(quote_spanned! {span=>
                if #value_expr.len() > #n {
                    errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                        .unwrap_or_else(|| ::junction::validator::messages::max_items(locale, #field_name, #n)));
                }
            });
        }
        if unique_items {
            checks.extend(quote_spanned! {span=>
                if !::junction::validator::rules::has_unique_items(#value_expr.as_slice()) {
                    errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                        .unwrap_or_else(|| ::junction::validator::messages::unique_items(locale, #field_name)));
                }
            });
        }
        if nested {
            checks.extend(quote_spanned! {span=>
                for (idx, item) in #value_expr.iter().enumerate() {
                    if let Err(nested_errors) = item.validate_locale(locale) {
                        for e in nested_errors.into_inner() {
                            errors.push(format!("{}[{}].{}", #field_name, idx, e.field), e.message);
                        }
                    }
                }
            });
        }
    } else if nested {
        checks.extend(quote_spanned! {span=>
            if let Err(nested_errors) = #value_expr.validate_locale(locale) {
                for e in nested_errors.into_inner() {
                    errors.push(format!("{}.{}", #field_name, e.field), e.message);
                }
            }
        });
    }

    let required_check = if required {
        quote_spanned! {span=>
            if self.#ident == ::std::default::Default::default() {
                errors.push(#field_name, #error_override.map(|m: &str| m.to_string())
                    .unwrap_or_else(|| ::junction::validator::messages::required(locale, #field_name)));
            }
        }
    } else {
        TokenStream2::new()
    };

    let body = if is_optional {
        quote_spanned! {span=>
            if let Some(value) = self.#ident.as_ref() {
                #checks
            }
        }
    } else {
        checks
    };

    let tokens = quote! {
        {
            #required_check
            #body
        }
    };

    Ok(Some(tokens))
}

/// Derives `junction::binder::FromForm`, the compile-time substitute for the
/// field-by-field reflection form binding needs. Mirrors the field name
/// resolution `Validate` uses: a `#[serde(rename = "...")]` or
/// `#[form(rename = "...")]` overrides the struct field name, a rename to
/// `"-"` or a bare `skip` excludes the field entirely (it is left at its
/// `Default` value instead of being read from the form).
#[proc_macro_derive(FromForm, attributes(form))]
pub fn derive_from_form(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(&input, "FromForm can only be derived for structs with named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "FromForm can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let mut field_inits = Vec::new();
    for field in fields {
        match build_form_field(field) {
            Ok(tokens) => field_inits.push(tokens),
            Err(err) => return err.to_compile_error().into(),
        }
    }

    let expanded = quote! {
        impl ::junction::binder::FromForm for #name {
            fn from_form_fields(fields: &::junction::binder::FormFields) -> ::junction::Result<Self> {
                Ok(#name {
                    #(#field_inits)*
                })
            }
        }
    };

    expanded.into()
}

fn field_name_and_skip(field: &syn::Field) -> (String, bool) {
    let ident = field.ident.as_ref().expect("named field");
    let mut name = ident.to_string();
    let mut skip = false;

    for attr in &field.attrs {
        if !(attr.path.is_ident("serde") || attr.path.is_ident("form")) {
            continue;
        }
        if let Ok(Meta::List(list)) = attr.parse_meta() {
            for nested in list.nested {
                match nested {
                    NestedMeta::Meta(Meta::NameValue(MetaNameValue { path, lit: Lit::Str(s), .. }))
                        if path.is_ident("rename") =>
                    {
                        if s.value() == "-" {
                            skip = true;
                        } else {
                            name = s.value();
                        }
                    }
                    NestedMeta::Meta(Meta::Path(path)) if path.is_ident("skip") => skip = true,
                    _ => {}
                }
            }
        }
    }

    (name, skip)
}

fn build_form_field(field: &syn::Field) -> syn::Result<TokenStream2> {
    let ident = field.ident.as_ref().expect("named field");
    let span = field.span();
    let (field_name, skip) = field_name_and_skip(field);

    if skip {
        return Ok(quote! { #ident: ::std::default::Default::default(), });
    }

    let shape = classify(&field.ty);
    let unsupported = || {
        syn::Error::new(
            span,
            "#[derive(FromForm)] supports String, numeric, bool, Vec<String> fields and Option<...> thereof",
        )
    };

    let getter = match &shape {
        Shape::StringLike => quote_spanned! {span=> fields.get_string(#field_name).unwrap_or_default() },
        Shape::Numeric => quote_spanned! {span=> fields.get_parsed(#field_name)?.unwrap_or_default() },
        Shape::Bool => quote_spanned! {span=> fields.get_bool(#field_name) },
        Shape::Sequence(inner) if matches!(inner.as_ref(), Shape::StringLike) => {
            quote_spanned! {span=> fields.get_strings(#field_name) }
        }
        Shape::Optional(inner) => match inner.as_ref() {
            Shape::StringLike => quote_spanned! {span=> fields.get_string(#field_name) },
            Shape::Numeric => quote_spanned! {span=> fields.get_parsed(#field_name)? },
            Shape::Bool => quote_spanned! {span=> Some(fields.get_bool(#field_name)) },
            Shape::Sequence(inner) if matches!(inner.as_ref(), Shape::StringLike) => {
                let values = quote_spanned! {span=> fields.get_strings(#field_name) };
                quote_spanned! {span=> { let values = #values; if values.is_empty() { None } else { Some(values) } } }
            }
            _ => return Err(unsupported()),
        },
        _ => return Err(unsupported()),
    };

    Ok(quote! { #ident: #getter, })
}
