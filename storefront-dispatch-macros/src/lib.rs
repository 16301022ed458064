//! Procedural macros for storefront-dispatch

use darling::{FromDeriveInput, FromVariant};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Container-level attributes for #[derive(Action)]
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(action), supports(enum_any))]
struct ActionOpts {
    ident: syn::Ident,
    generics: syn::Generics,
    data: darling::ast::Data<ActionVariant, ()>,

    /// Also implement `ActionSummary` with the `Debug` summary
    #[darling(default)]
    summary: bool,
}

/// Variant-level attributes
#[derive(Debug, FromVariant)]
#[darling(attributes(action))]
struct ActionVariant {
    ident: syn::Ident,
    fields: darling::ast::Fields<syn::Type>,

    /// Explicit phase override: intent, success, failure or reset
    #[darling(default)]
    phase: Option<String>,

    /// Delegate name() and phase() to the wrapped action
    #[darling(default)]
    forward: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Intent,
    Success,
    Failure,
    Reset,
}

impl Phase {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "intent" => Some(Phase::Intent),
            "success" => Some(Phase::Success),
            "failure" => Some(Phase::Failure),
            "reset" => Some(Phase::Reset),
            _ => None,
        }
    }

    fn tokens(self) -> TokenStream2 {
        match self {
            Phase::Intent => quote!(storefront_dispatch::ActionPhase::Intent),
            Phase::Success => quote!(storefront_dispatch::ActionPhase::Success),
            Phase::Failure => quote!(storefront_dispatch::ActionPhase::Failure),
            Phase::Reset => quote!(storefront_dispatch::ActionPhase::Reset),
        }
    }
}

/// Split a PascalCase string into parts
fn split_pascal_case(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            parts.push(current);
            current = String::new();
        }
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Infer the phase from the `Load<Noun>Success` / `Reset<Noun>State` vocabulary
fn infer_phase(name: &str) -> Phase {
    let parts = split_pascal_case(name);
    match (parts.first().map(String::as_str), parts.last().map(String::as_str)) {
        (_, Some("Success")) if parts.len() > 1 => Phase::Success,
        (_, Some("Failure")) if parts.len() > 1 => Phase::Failure,
        (Some("Reset"), _) => Phase::Reset,
        _ => Phase::Intent,
    }
}

/// Derive macro for the Action trait
///
/// Generates `name()` returning the variant name and `phase()` following the
/// result-action vocabulary:
///
/// - `...Success` → `ActionPhase::Success`
/// - `...Failure` → `ActionPhase::Failure`
/// - `Reset...` → `ActionPhase::Reset`
/// - anything else → `ActionPhase::Intent`
///
/// Variant attributes:
/// - `#[action(phase = "success")]` overrides the inferred phase
/// - `#[action(forward)]` on a single-field tuple variant delegates both
///   methods to the wrapped action (root enums over per-slice enums)
///
/// Container attributes:
/// - `#[action(summary)]` also implements `ActionSummary` using `Debug`
///
/// # Example
/// ```ignore
/// #[derive(Action, Clone, Debug)]
/// enum NewsletterAction {
///     SubscribeNewsletter { email: String },
///     SubscribeNewsletterSuccess { message: String },
///     SubscribeNewsletterFailure { error: String },
///     ResetNewsletterState,
/// }
///
/// #[derive(Action, Clone, Debug)]
/// #[action(summary)]
/// enum Action {
///     #[action(forward)]
///     Newsletter(NewsletterAction),
///     #[action(phase = "reset")]
///     ClearAll,
/// }
///
/// let action = Action::Newsletter(NewsletterAction::ResetNewsletterState);
/// assert_eq!(action.name(), "ResetNewsletterState");
/// assert_eq!(action.phase(), ActionPhase::Reset);
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ActionOpts::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return e.write_errors().into(),
    };

    let name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let variants = match &opts.data {
        darling::ast::Data::Enum(variants) => variants,
        _ => {
            return syn::Error::new_spanned(&input, "Action can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut name_arms = Vec::with_capacity(variants.len());
    let mut phase_arms = Vec::with_capacity(variants.len());

    for v in variants {
        let variant_name = &v.ident;
        let variant_str = variant_name.to_string();

        if v.forward {
            if v.fields.style != darling::ast::Style::Tuple || v.fields.len() != 1 {
                return syn::Error::new_spanned(
                    variant_name,
                    "#[action(forward)] requires a single-field tuple variant",
                )
                .to_compile_error()
                .into();
            }
            if v.phase.is_some() {
                return syn::Error::new_spanned(
                    variant_name,
                    "#[action(forward)] cannot be combined with #[action(phase)]",
                )
                .to_compile_error()
                .into();
            }
            name_arms.push(quote! {
                #name::#variant_name(inner) => storefront_dispatch::Action::name(inner)
            });
            phase_arms.push(quote! {
                #name::#variant_name(inner) => storefront_dispatch::Action::phase(inner)
            });
            continue;
        }

        let phase = match v.phase.as_deref() {
            Some(explicit) => match Phase::parse(explicit) {
                Some(phase) => phase,
                None => {
                    return syn::Error::new_spanned(
                        variant_name,
                        format!(
                            "unknown action phase `{explicit}`, expected intent, success, failure or reset"
                        ),
                    )
                    .to_compile_error()
                    .into();
                }
            },
            None => infer_phase(&variant_str),
        };
        let phase = phase.tokens();

        let pattern = match &v.fields.style {
            darling::ast::Style::Unit => quote!(#name::#variant_name),
            darling::ast::Style::Tuple => quote!(#name::#variant_name(..)),
            darling::ast::Style::Struct => quote!(#name::#variant_name { .. }),
        };
        name_arms.push(quote!(#pattern => #variant_str));
        phase_arms.push(quote!(#pattern => #phase));
    }

    let mut expanded = quote! {
        impl #impl_generics storefront_dispatch::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms),*
                }
            }

            fn phase(&self) -> storefront_dispatch::ActionPhase {
                match self {
                    #(#phase_arms),*
                }
            }
        }
    };

    if opts.summary {
        expanded.extend(quote! {
            impl #impl_generics storefront_dispatch::ActionSummary for #name #ty_generics #where_clause {}
        });
    }

    TokenStream::from(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pascal_case() {
        assert_eq!(split_pascal_case("LoadOffersSuccess"), vec!["Load", "Offers", "Success"]);
        assert_eq!(split_pascal_case("Tick"), vec!["Tick"]);
    }

    #[test]
    fn test_infer_phase() {
        assert_eq!(infer_phase("LoadSlides"), Phase::Intent);
        assert_eq!(infer_phase("LoadSlidesSuccess"), Phase::Success);
        assert_eq!(infer_phase("SubscribeNewsletterFailure"), Phase::Failure);
        assert_eq!(infer_phase("ResetNewsletterState"), Phase::Reset);
        assert_eq!(infer_phase("ToggleSustainableOnly"), Phase::Intent);
        // Whole-word matches only
        assert_eq!(infer_phase("Success"), Phase::Intent);
        assert_eq!(infer_phase("Resettle"), Phase::Intent);
        assert_eq!(infer_phase("LoadSuccessful"), Phase::Intent);
    }

    #[test]
    fn test_parse_phase() {
        assert_eq!(Phase::parse("Failure"), Some(Phase::Failure));
        assert_eq!(Phase::parse("done"), None);
    }
}
