//! Attribute parsing for the Record derive macro.
//!
//! This module provides parsers for the `#[urlfilter(...)]` attributes used
//! on fields and on the struct itself.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    Attribute, Error, Ident, LitStr, Result, Token,
};

/// Attributes from `#[urlfilter(...)]`.
///
/// ```text
/// #[urlfilter("name,required")]        // tag
/// #[urlfilter(tag = ",nowhere")]       // tag, named form
/// #[urlfilter(flatten)]                // embedded record
/// #[urlfilter(skip)]                   // not declared at all
/// #[urlfilter(decode_values)]          // field type decodes the whole input
/// ```
#[derive(Debug, Clone)]
pub struct UrlfilterAttr {
    /// The field tag, e.g. `"name,required"`.
    pub tag: Option<String>,
    /// Flatten an embedded record into the parent.
    pub flatten: bool,
    /// Leave the field out of the declarations.
    pub skip: bool,
    /// Call `DecodeValues::decode_values` with the whole input.
    pub decode_values: bool,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for UrlfilterAttr {
    fn default() -> Self {
        UrlfilterAttr {
            tag: None,
            flatten: false,
            skip: false,
            decode_values: false,
            span: Span::call_site(),
        }
    }
}

impl UrlfilterAttr {
    fn set_tag(&mut self, lit: LitStr) -> Result<()> {
        if self.tag.is_some() {
            return Err(Error::new(lit.span(), "duplicate tag"));
        }
        self.tag = Some(lit.value());
        self.span = lit.span();
        Ok(())
    }
}

impl Parse for UrlfilterAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = UrlfilterAttr::default();

        while !input.is_empty() {
            if input.peek(LitStr) {
                // Bare tag: urlfilter("name,required")
                attr.set_tag(input.parse()?)?;
            } else {
                let ident: Ident = input.parse()?;
                match ident.to_string().as_str() {
                    "tag" => {
                        input.parse::<Token![=]>()?;
                        attr.set_tag(input.parse()?)?;
                    }
                    "flatten" => attr.flatten = true,
                    "skip" => attr.skip = true,
                    "decode_values" => attr.decode_values = true,
                    other => {
                        return Err(Error::new(
                            ident.span(),
                            format!(
                                "unknown urlfilter attribute: '{}'. Expected a tag string, tag = \"...\", flatten, skip or decode_values",
                                other
                            ),
                        ))
                    }
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        if attr.skip && (attr.flatten || attr.decode_values) {
            return Err(Error::new(
                input.span(),
                "skip cannot be combined with flatten or decode_values",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[urlfilter(...)]` attributes from a list of attributes.
pub fn parse_urlfilter_attrs(attrs: &[Attribute]) -> Result<UrlfilterAttr> {
    for attr in attrs {
        if attr.path().is_ident("urlfilter") {
            return attr.parse_args::<UrlfilterAttr>();
        }
    }
    Ok(UrlfilterAttr::default())
}

/// Extract the struct-level `#[urlfilter(...)]` attribute.
///
/// Only `decode_values` is meaningful on the struct.
pub fn parse_struct_attrs(attrs: &[Attribute]) -> Result<UrlfilterAttr> {
    let attr = parse_urlfilter_attrs(attrs)?;
    if attr.tag.is_some() || attr.flatten || attr.skip {
        return Err(Error::new(
            attr.span,
            "only decode_values is supported on the struct",
        ));
    }
    Ok(attr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_attr(tokens: &str) -> Result<UrlfilterAttr> {
        syn::parse_str::<UrlfilterAttr>(tokens)
    }

    #[test]
    fn test_bare_tag() {
        let attr = parse_attr(r#""name,required""#).unwrap();
        assert_eq!(attr.tag.as_deref(), Some("name,required"));
        assert!(!attr.flatten);
        assert!(!attr.skip);
    }

    #[test]
    fn test_named_tag() {
        let attr = parse_attr(r#"tag = ",nowhere""#).unwrap();
        assert_eq!(attr.tag.as_deref(), Some(",nowhere"));
    }

    #[test]
    fn test_flags() {
        let attr = parse_attr("flatten").unwrap();
        assert!(attr.flatten);

        let attr = parse_attr("skip").unwrap();
        assert!(attr.skip);

        let attr = parse_attr("decode_values").unwrap();
        assert!(attr.decode_values);
    }

    #[test]
    fn test_tag_with_flag() {
        let attr = parse_attr(r#""-", decode_values"#).unwrap();
        assert_eq!(attr.tag.as_deref(), Some("-"));
        assert!(attr.decode_values);
    }

    #[test]
    fn test_trailing_comma() {
        let attr = parse_attr("flatten,").unwrap();
        assert!(attr.flatten);
    }

    #[test]
    fn test_duplicate_tag() {
        let result = parse_attr(r#""a", tag = "b""#);
        assert!(result.unwrap_err().to_string().contains("duplicate tag"));
    }

    #[test]
    fn test_unknown_attribute() {
        let result = parse_attr("rename");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown urlfilter attribute"));
    }

    #[test]
    fn test_skip_conflicts() {
        assert!(parse_attr("skip, flatten").is_err());
    }

    #[test]
    fn test_struct_attrs() {
        let attrs: Vec<Attribute> = vec![syn::parse_quote!(#[urlfilter(decode_values)])];
        assert!(parse_struct_attrs(&attrs).unwrap().decode_values);

        let attrs: Vec<Attribute> = vec![syn::parse_quote!(#[urlfilter(flatten)])];
        assert!(parse_struct_attrs(&attrs).is_err());

        assert!(!parse_struct_attrs(&[]).unwrap().decode_values);
    }
}
