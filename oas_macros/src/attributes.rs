//! Parsing of `#[describe(..)]` and the subset of `#[serde(..)]` that shapes
//! the encoded form

use heck::ToKebabCase;
use heck::ToLowerCamelCase;
use heck::ToShoutySnakeCase;
use heck::ToSnakeCase;
use heck::ToUpperCamelCase;
use syn::Attribute;
use syn::LitStr;
use syn::Path;
use syn::Token;
use syn::meta::ParseNestedMeta;

/// Type-level options
#[derive(Default)]
pub struct TypeOptions {
    pub name:       Option<String>,
    pub json:       Option<Path>,
    pub text:       Option<Path>,
    pub rename_all: Option<RenameRule>,
}

/// Field-level options
#[derive(Default)]
pub struct FieldOptions {
    pub rename: Option<String>,
    pub skip:   bool,
    pub embed:  bool,
}

/// Case conversions accepted by `rename_all`
#[derive(Clone, Copy)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    fn parse(rule: &LitStr) -> syn::Result<Self> {
        match rule.value().as_str() {
            "lowercase" => Ok(Self::Lower),
            "UPPERCASE" => Ok(Self::Upper),
            "PascalCase" => Ok(Self::Pascal),
            "camelCase" => Ok(Self::Camel),
            "snake_case" => Ok(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnake),
            "kebab-case" => Ok(Self::Kebab),
            other => Err(syn::Error::new_spanned(
                rule,
                format!("unsupported rename rule {other:?}"),
            )),
        }
    }

    pub fn apply(self, ident: &str) -> String {
        match self {
            Self::Lower => ident.to_lowercase(),
            Self::Upper => ident.to_uppercase(),
            Self::Pascal => ident.to_upper_camel_case(),
            Self::Camel => ident.to_lower_camel_case(),
            Self::Snake => ident.to_snake_case(),
            Self::ScreamingSnake => ident.to_shouty_snake_case(),
            Self::Kebab => ident.to_kebab_case(),
        }
    }
}

/// Collect type options from the container attributes
pub fn parse_type_options(attrs: &[Attribute]) -> syn::Result<TypeOptions> {
    let mut options = TypeOptions::default();
    for attr in attrs {
        if attr.path().is_ident("describe") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    options.name = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else if meta.path.is_ident("json") {
                    options.json = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("text") {
                    options.text = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported describe attribute"))
                }
            })?;
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    options.rename_all = Some(parse_rename_all(&meta)?);
                    Ok(())
                } else {
                    skip_meta(&meta)
                }
            })?;
        }
    }
    Ok(options)
}

/// Collect field options from the field attributes
pub fn parse_field_options(attrs: &[Attribute]) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in attrs {
        if attr.path().is_ident("describe") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    options.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                    Ok(())
                } else if meta.path.is_ident("embed") {
                    options.embed = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported describe attribute"))
                }
            })?;
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Some(name) = parse_serialize_name(&meta)? {
                        options.rename = Some(name);
                    }
                    Ok(())
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    options.skip = true;
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    options.embed = true;
                    Ok(())
                } else {
                    skip_meta(&meta)
                }
            })?;
        }
    }
    Ok(options)
}

/// `rename_all = ".."` or `rename_all(serialize = "..")`
fn parse_rename_all(meta: &ParseNestedMeta) -> syn::Result<RenameRule> {
    if meta.input.peek(Token![=]) {
        return RenameRule::parse(&meta.value()?.parse()?);
    }
    let mut rule = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            rule = Some(RenameRule::parse(&inner.value()?.parse()?)?);
            Ok(())
        } else {
            skip_meta(&inner)
        }
    })?;
    rule.ok_or_else(|| meta.error("rename_all needs a serialize rule"))
}

/// `rename = ".."` or `rename(serialize = "..")`; only the serialized name
/// matters for the schema
fn parse_serialize_name(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        return Ok(Some(meta.value()?.parse::<LitStr>()?.value()));
    }
    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            name = Some(inner.value()?.parse::<LitStr>()?.value());
            Ok(())
        } else {
            skip_meta(&inner)
        }
    })?;
    Ok(name)
}

/// Consume a serde option that does not affect the schema
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}
