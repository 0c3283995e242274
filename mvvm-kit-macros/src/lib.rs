//! Procedural macros for mvvm-kit

use darling::{FromDeriveInput, FromField, FromMeta, FromVariant};
use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Convert PascalCase to snake_case
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// Convert PascalCase to camelCase
fn to_camel_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Naming convention applied to variant names by `#[property(rename_all = "...")]`
#[derive(Debug, Clone, Copy, Default, FromMeta)]
enum RenameRule {
    #[default]
    #[darling(rename = "PascalCase")]
    Pascal,
    #[darling(rename = "camelCase")]
    Camel,
    #[darling(rename = "snake_case")]
    Snake,
}

impl RenameRule {
    fn apply(self, name: &str) -> String {
        match self {
            RenameRule::Pascal => name.to_string(),
            RenameRule::Camel => to_camel_case(name),
            RenameRule::Snake => to_snake_case(name),
        }
    }
}

/// Container-level attributes for #[derive(PropertyKey)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(property), supports(enum_unit))]
struct PropertyKeyOpts {
    ident: Ident,
    data: darling::ast::Data<PropertyKeyVariant, ()>,

    /// Naming convention for all variants
    #[darling(default)]
    rename_all: RenameRule,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(property))]
struct PropertyKeyVariant {
    ident: Ident,

    /// Explicit property name override
    #[darling(default)]
    rename: Option<String>,
}

/// Derive macro for the PropertyKey trait
///
/// Generates `PropertyKey` (`name()`, `all()`) and `From<Self> for PropertyName`.
/// Property names default to the variant name; change that with
/// `#[property(rename_all = "snake_case" | "camelCase")]` on the enum or
/// `#[property(rename = "...")]` on a variant.
///
/// # Example
/// ```ignore
/// #[derive(PropertyKey, Clone, Copy, PartialEq, Debug)]
/// enum PersonProperty {
///     FirstName,
///     #[property(rename = "Age (years)")]
///     Age,
/// }
///
/// assert_eq!(PersonProperty::FirstName.name(), "FirstName");
/// observable.notify_changed(PersonProperty::Age);
/// ```
#[proc_macro_derive(PropertyKey, attributes(property))]
pub fn derive_property_key(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let opts = match PropertyKeyOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => unreachable!("darling only accepts unit enums"),
    };

    let variant_names: Vec<_> = variants.iter().map(|v| &v.ident).collect();
    let property_names: Vec<_> = variants
        .iter()
        .map(|v| {
            v.rename
                .clone()
                .unwrap_or_else(|| opts.rename_all.apply(&v.ident.to_string()))
        })
        .collect();

    let name_arms = variant_names
        .iter()
        .zip(property_names.iter())
        .map(|(v, s)| {
            quote! { #name::#v => #s }
        });

    let all_variants = variant_names.iter().map(|v| quote! { #name::#v });

    let expanded = quote! {
        impl mvvm_kit::PropertyKey for #name {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }

            fn all() -> &'static [Self] {
                static ALL: &[#name] = &[#(#all_variants),*];
                ALL
            }
        }

        impl ::core::convert::From<#name> for mvvm_kit::PropertyName {
            fn from(key: #name) -> Self {
                mvvm_kit::PropertyName::new(<#name as mvvm_kit::PropertyKey>::name(&key))
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for the CommandParameter trait
///
/// Marks a type as a non-nullable command parameter. Use `Option<T>` as the
/// command's parameter type when absence is meaningful.
///
/// # Example
/// ```ignore
/// #[derive(CommandParameter, Clone, Debug)]
/// struct RowId(u32);
///
/// let delete = TypedRelayCommand::<RowId>::new(|row| remove_row(row));
/// ```
#[proc_macro_derive(CommandParameter)]
pub fn derive_command_parameter(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics mvvm_kit::CommandParameter for #name #ty_generics #where_clause {}
    };

    TokenStream::from(expanded)
}

/// Container-level options for #[derive(NotifyPropertyChanged)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(notify), supports(struct_named))]
struct NotifyOpts {
    ident: Ident,
    generics: syn::Generics,
    data: darling::ast::Data<(), NotifyField>,
}

/// Field-level attributes
#[derive(Debug, FromField)]
#[darling(attributes(notify))]
struct NotifyField {
    ident: Option<Ident>,

    /// Marks the embedded `ObservableObject`
    #[darling(default)]
    source: bool,
}

/// Derive macro for the NotifyPropertyChanged trait
///
/// Points the trait at the embedded `ObservableObject`: the field marked
/// `#[notify(source)]`, or else the field named `observable`.
///
/// # Example
/// ```ignore
/// #[derive(NotifyPropertyChanged)]
/// struct PersonViewModel {
///     #[notify(source)]
///     changes: ObservableObject,
///     name: String,
/// }
/// ```
#[proc_macro_derive(NotifyPropertyChanged, attributes(notify))]
pub fn derive_notify_property_changed(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let opts = match NotifyOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let fields = match &opts.data {
        darling::ast::Data::Struct(fields) => &fields.fields,
        _ => unreachable!("darling only accepts structs with named fields"),
    };

    let marked: Vec<_> = fields.iter().filter(|f| f.source).collect();
    let source_field = match marked.as_slice() {
        [field] => field.ident.clone(),
        [] => fields
            .iter()
            .find(|f| f.ident.as_ref().is_some_and(|i| i == "observable"))
            .and_then(|f| f.ident.clone()),
        [_, second, ..] => {
            return syn::Error::new_spanned(
                second.ident.as_ref(),
                "only one field can be marked #[notify(source)]",
            )
            .to_compile_error()
            .into();
        }
    };

    let Some(source_field) = source_field else {
        return syn::Error::new_spanned(
            name,
            "NotifyPropertyChanged needs a field marked #[notify(source)] or a field named `observable`",
        )
        .to_compile_error()
        .into();
    };

    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics mvvm_kit::NotifyPropertyChanged for #name #ty_generics #where_clause {
            fn observable(&self) -> &mvvm_kit::ObservableObject {
                &self.#source_field
            }
        }
    };

    TokenStream::from(expanded)
}
