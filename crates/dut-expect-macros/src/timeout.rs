//! Human-readable duration parsing.
//!
//! Shared by `timeout!` and the `within` clause of `expectations!`. A
//! duration is one or more `<integer> <unit>` terms joined by `+`. The unit
//! may be written as a separate identifier (`5 s`) or as the literal suffix
//! (`5s`, `250ms`).

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Ident, LitInt, Result, Token};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// A parsed duration, resolved to nanoseconds at expansion time.
pub struct DurationSpec {
    nanos: u128,
    span: Span,
}

/// Nanoseconds per unit, or `None` for an unknown unit name.
fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" | "nanos" | "nanoseconds" => 1,
        "us" | "micros" | "microseconds" => 1_000,
        "ms" | "millis" | "milliseconds" => 1_000_000,
        "s" | "sec" | "secs" | "seconds" => NANOS_PER_SEC,
        "m" | "min" | "mins" | "minutes" => 60 * NANOS_PER_SEC,
        "h" | "hr" | "hrs" | "hours" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(nanos)
}

fn parse_term(input: ParseStream) -> Result<u128> {
    let value: LitInt = input.parse()?;
    let amount: u128 = value.base10_parse()?;

    let (unit, span) = if value.suffix().is_empty() {
        let ident: Ident = input.parse()?;
        (ident.to_string(), ident.span())
    } else {
        (value.suffix().to_string(), value.span())
    };

    let per_unit = unit_nanos(&unit)
        .ok_or_else(|| syn::Error::new(span, format!("unknown time unit: {unit}")))?;
    amount
        .checked_mul(per_unit)
        .ok_or_else(|| syn::Error::new(span, "duration overflows"))
}

impl Parse for DurationSpec {
    fn parse(input: ParseStream) -> Result<Self> {
        let span = input.span();
        let mut nanos = parse_term(input)?;

        while input.peek(Token![+]) {
            let _: Token![+] = input.parse()?;
            nanos = nanos
                .checked_add(parse_term(input)?)
                .ok_or_else(|| syn::Error::new(span, "duration overflows"))?;
        }

        Ok(Self { nanos, span })
    }
}

impl DurationSpec {
    /// Total length in nanoseconds.
    pub const fn nanos(&self) -> u128 {
        self.nanos
    }

    /// Emit a `std::time::Duration` constructor expression.
    pub fn to_tokens(&self) -> TokenStream {
        let Ok(secs) = u64::try_from(self.nanos / NANOS_PER_SEC) else {
            return syn::Error::new(self.span, "duration exceeds u64 seconds").to_compile_error();
        };
        let subsec = (self.nanos % NANOS_PER_SEC) as u32;

        quote! {
            ::std::time::Duration::new(#secs, #subsec)
        }
    }
}

/// Generate code for the timeout! macro.
pub fn expand(input: DurationSpec) -> TokenStream {
    input.to_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn parse_spaced_unit() {
        let spec: DurationSpec = parse_quote!(5 s);
        assert_eq!(spec.nanos(), 5 * NANOS_PER_SEC);
    }

    #[test]
    fn parse_suffixed_unit() {
        let spec: DurationSpec = parse_quote!(250ms);
        assert_eq!(spec.nanos(), 250_000_000);
    }

    #[test]
    fn parse_compound() {
        let spec: DurationSpec = parse_quote!(1 m + 30 s + 500ms);
        assert_eq!(spec.nanos(), 90 * NANOS_PER_SEC + 500_000_000);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let result: Result<DurationSpec> = syn::parse_str("5 fortnights");
        assert!(result.is_err());
    }

    #[test]
    fn expands_to_duration_new() {
        let spec: DurationSpec = parse_quote!(1500 ms);
        let tokens = spec.to_tokens().to_string();
        assert!(tokens.contains("Duration :: new"));
        assert!(tokens.contains("1u64"));
        assert!(tokens.contains("500000000u32"));
    }
}
