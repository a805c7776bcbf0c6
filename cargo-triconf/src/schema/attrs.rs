//! Attribute helpers: documentation lines and serde renames.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, ExprLit, Lit, LitStr, Meta, Token, parenthesized};

/// Documentation lines in source order, as written after `///`.
pub(crate) fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// Split documentation into directive lines and the remaining prose.
pub(crate) fn split_doc(lines: &[String]) -> (Vec<String>, String) {
    let (annotations, prose): (Vec<&String>, Vec<&String>) = lines
        .iter()
        .partition(|line| triconf::annotation::strip_prefix(line).is_some());
    let doc = prose
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (
        annotations.into_iter().map(|l| l.trim().to_owned()).collect(),
        doc,
    )
}

fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Parse `#[serde(rename = "...")]` and `rename(deserialize = "...")` from
/// field attributes.
pub(crate) fn serde_rename(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut out = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("rename") {
                return discard_unknown(&meta);
            }
            if meta.input.peek(Token![=]) {
                out = Some(meta.value()?.parse::<LitStr>()?.value());
                return Ok(());
            }
            if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|nested| {
                    if nested.path.is_ident("deserialize") {
                        out = Some(nested.value()?.parse::<LitStr>()?.value());
                        Ok(())
                    } else {
                        discard_unknown(&nested)
                    }
                })?;
            }
            Ok(())
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::ensure;
    use syn::parse_quote;

    #[test]
    fn doc_lines_keep_order_and_text() {
        let field: syn::Field = parse_quote! {
            /// Port to listen on.
            /// triconf:pflag port p
            #[serde(default)]
            pub port: u16
        };
        let lines = doc_lines(&field.attrs);
        assert_eq!(lines, [" Port to listen on.", " triconf:pflag port p"]);
        let (annotations, doc) = split_doc(&lines);
        assert_eq!(annotations, ["triconf:pflag port p"]);
        assert_eq!(doc, "Port to listen on.");
    }

    #[test]
    fn renames_are_read_from_serde() -> anyhow::Result<()> {
        let plain: syn::Field = parse_quote! { #[serde(default, rename = "listen_port")] pub port: u16 };
        ensure!(serde_rename(&plain.attrs)?.as_deref() == Some("listen_port"));
        let split: syn::Field = parse_quote! {
            #[serde(rename(serialize = "out", deserialize = "in"))] pub port: u16
        };
        ensure!(serde_rename(&split.attrs)?.as_deref() == Some("in"));
        let none: syn::Field = parse_quote! { #[serde(skip_serializing_if = "Option::is_none")] pub port: u16 };
        ensure!(serde_rename(&none.attrs)?.is_none());
        Ok(())
    }
}
