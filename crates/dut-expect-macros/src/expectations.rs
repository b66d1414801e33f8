//! Expectation list macro implementation.
//!
//! This module implements `expectations!`, which declares an ordered list
//! of expectations with compile-time validated patterns.

use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Ident, LitStr, Result, Token, bracketed};

use crate::timeout::DurationSpec;

mod kw {
    syn::custom_keyword!(within);
}

/// How the pattern text is interpreted.
pub enum PatternKind {
    /// Substring containment.
    Literal(LitStr),
    /// Regular expression search.
    Regex(LitStr),
    /// Glob with `*` and `?`.
    Glob(LitStr),
}

/// One entry: `[name:] pattern [within <duration>]`.
pub struct ExpectationDef {
    /// Optional label.
    pub name: Option<Ident>,
    /// The pattern.
    pub kind: PatternKind,
    /// Optional per-expectation timeout.
    pub within: Option<DurationSpec>,
}

impl Parse for PatternKind {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            return Ok(Self::Literal(input.parse()?));
        }

        let kind: Ident = input.parse()?;
        let content;
        syn::parenthesized!(content in input);
        let lit: LitStr = content.parse()?;

        match kind.to_string().as_str() {
            "regex" | "re" => Ok(Self::Regex(lit)),
            "glob" => Ok(Self::Glob(lit)),
            "literal" | "lit" => Ok(Self::Literal(lit)),
            other => Err(syn::Error::new(
                kind.span(),
                format!("unknown pattern kind `{other}`, expected `regex`, `glob` or `literal`"),
            )),
        }
    }
}

impl Parse for ExpectationDef {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = if input.peek(Ident) && input.peek2(Token![:]) {
            let name: Ident = input.parse()?;
            let _: Token![:] = input.parse()?;
            Some(name)
        } else {
            None
        };

        let kind = input.parse()?;

        let within = if input.peek(kw::within) {
            let _: kw::within = input.parse()?;
            Some(input.parse()?)
        } else {
            None
        };

        Ok(Self { name, kind, within })
    }
}

/// The expectations! macro input.
pub struct ExpectationsInput {
    /// Entries in declaration order.
    pub entries: Punctuated<ExpectationDef, Token![,]>,
}

impl Parse for ExpectationsInput {
    fn parse(input: ParseStream) -> Result<Self> {
        // Accept both `expectations!(a, b)` and `expectations!([a, b])`.
        let entries = if input.peek(syn::token::Bracket) {
            let content;
            bracketed!(content in input);
            Punctuated::parse_terminated(&content)?
        } else {
            Punctuated::parse_terminated(input)?
        };

        if entries.is_empty() {
            return Err(syn::Error::new(
                input.span(),
                "expectations! needs at least one expectation",
            ));
        }

        Ok(Self { entries })
    }
}

fn pattern_tokens(kind: &PatternKind) -> TokenStream {
    match kind {
        PatternKind::Literal(lit) => quote! { ::dut_expect::Pattern::literal(#lit) },
        PatternKind::Regex(lit) => {
            if let Err(e) = regex::Regex::new(&lit.value()) {
                return syn::Error::new(lit.span(), format!("invalid regex: {e}"))
                    .to_compile_error();
            }
            quote! {
                ::dut_expect::Pattern::regex(#lit).expect("regex was validated at compile time")
            }
        }
        PatternKind::Glob(lit) => {
            if let Err(e) = regex::Regex::new(&glob_expr(&lit.value())) {
                return syn::Error::new(lit.span(), format!("invalid glob: {e}"))
                    .to_compile_error();
            }
            quote! {
                ::dut_expect::Pattern::glob(#lit).expect("glob was validated at compile time")
            }
        }
    }
}

/// The regex a glob compiles to at runtime; kept in step with
/// `dut_expect::Pattern::glob`.
fn glob_expr(glob: &str) -> String {
    let mut expr = String::with_capacity(glob.len() * 2);
    let mut literal = [0u8; 4];
    for c in glob.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            _ => expr.push_str(&regex::escape(c.encode_utf8(&mut literal))),
        }
    }
    expr
}

/// Generate code for the expectations! macro.
pub fn expand(input: ExpectationsInput) -> TokenStream {
    let entries = input.entries.iter().map(|def| {
        let pattern = pattern_tokens(&def.kind);
        let name = def.name.as_ref().map(|name| {
            let label = name.to_string();
            quote! { .named(#label) }
        });
        let within = def.within.as_ref().map(|spec| {
            let duration = spec.to_tokens();
            quote! { .within(#duration) }
        });

        quote! {
            ::dut_expect::Expectation::new(#pattern) #name #within
        }
    });

    quote! {
        ::std::vec![#(#entries),*]
    }
}
