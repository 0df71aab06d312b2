//! Describe derive macro implementation

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::Data;
use syn::DeriveInput;
use syn::Fields;
use syn::Visibility;
use syn::parse_macro_input;

use crate::attributes::RenameRule;
use crate::attributes::TypeOptions;
use crate::attributes::parse_field_options;
use crate::attributes::parse_type_options;

/// Implementation of the Describe derive macro
pub fn derive_describe_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Describe cannot be derived for generic types",
        ));
    }

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Describe can only be derived for structs",
        ));
    };

    let options = parse_type_options(&input.attrs)?;
    let struct_name = &input.ident;
    let type_name = options
        .name
        .clone()
        .unwrap_or_else(|| struct_name.to_string());

    let shape = match &data_struct.fields {
        Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
            let inner = &fields.unnamed[0].ty;
            quote! {
                ::typed_oas::TypeDescriptor::alias(
                    <Self as ::typed_oas::Describe>::type_name(),
                    &::typed_oas::descriptor_of::<#inner>(),
                )
            }
        }
        fields => {
            let fields = record_fields(fields, &options)?;
            quote! {
                ::typed_oas::TypeDescriptor::record(
                    <Self as ::typed_oas::Describe>::type_name(),
                    ::std::vec![#(#fields),*],
                )
            }
        }
    };

    let json = options
        .json
        .as_ref()
        .map(|path| quote! { .with_structured(#path) });
    let text = options.text.as_ref().map(|path| quote! { .with_text(#path) });

    Ok(quote! {
        #[automatically_derived]
        impl ::typed_oas::Describe for #struct_name {
            fn type_name() -> ::std::string::String {
                ::std::string::String::from(#type_name)
            }

            fn describe() -> ::typed_oas::TypeDescriptor {
                #shape #json #text
            }
        }
    })
}

/// One `Field` constructor expression per struct field
fn record_fields(fields: &Fields, options: &TypeOptions) -> syn::Result<Vec<TokenStream2>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let field_options = parse_field_options(&field.attrs)?;
            let ident = field
                .ident
                .as_ref()
                .map_or_else(|| index.to_string(), ToString::to_string);
            let field_type = &field.ty;

            let mut modifiers = Vec::new();
            if !matches!(field.vis, Visibility::Public(_)) {
                modifiers.push(quote! { .private() });
            }
            if field_options.skip {
                modifiers.push(quote! { .skipped() });
            }
            if field_options.embed {
                modifiers.push(quote! { .embedded() });
            }
            if let Some(name) = external_name(
                &ident,
                field_options.rename,
                field_options.embed,
                options.rename_all,
            ) {
                modifiers.push(quote! { .renamed(#name) });
            }

            Ok(quote! {
                ::typed_oas::Field::new(#ident, ::typed_oas::TypeRef::of::<#field_type>())
                    #(#modifiers)*
            })
        })
        .collect()
}

/// Explicit renames always apply; a container rule applies to fields that are
/// not flattened
fn external_name(
    ident: &str,
    rename: Option<String>,
    embed: bool,
    rule: Option<RenameRule>,
) -> Option<String> {
    rename.or_else(|| {
        rule.filter(|_| !embed)
            .map(|rule| rule.apply(ident))
            .filter(|name| name != ident)
    })
}
