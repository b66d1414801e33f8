//! dut-expect-macros: Procedural macros for dut-expect
//!
//! - [`expectations!`] - Declare an ordered expectation list
//! - [`timeout!`] - Parse a human-readable duration
//!
//! Both are re-exported by `dut-expect`; depend on that crate rather than
//! on this one directly.
//!
//! # Example: Boot Log Expectations
//!
//! ```ignore
//! use dut_expect::expectations;
//!
//! let boot = expectations![
//!     "IR_main: create RMT RX channel",
//!     tx: "IR_main: create RMT TX channel" within 10 s,
//!     frame: regex(r"Address=([0-9A-F]{4}), Command=([0-9A-F]{4})"),
//! ];
//! ```

// In proc-macro crates, passing parsed input by value is idiomatic
#![allow(clippy::needless_pass_by_value)]

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod expectations;
mod timeout;

/// Declare an ordered list of expectations.
///
/// Expands to a `Vec<dut_expect::Expectation>`. Regex and glob patterns are checked
/// at compile time and an empty list is rejected.
///
/// # Syntax
///
/// ```ignore
/// expectations![
///     "literal substring",
///     name: "named literal",
///     regex(r"regex\s+pattern"),
///     glob("glob*pattern?"),
///     "with its own timeout" within 5 s,
///     slow: re(r"^done$") within 1 m + 30 s,
/// ]
/// ```
///
/// Entries without `within` use the matcher's default timeout.
#[proc_macro]
pub fn expectations(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as expectations::ExpectationsInput);
    expectations::expand(input).into()
}

/// Parse a human-readable duration into a `std::time::Duration`.
///
/// # Supported Units
///
/// - `ns`, `nanos`, `nanoseconds`
/// - `us`, `micros`, `microseconds`
/// - `ms`, `millis`, `milliseconds`
/// - `s`, `sec`, `secs`, `seconds`
/// - `m`, `min`, `mins`, `minutes`
/// - `h`, `hr`, `hrs`, `hours`
///
/// # Examples
///
/// ```ignore
/// use dut_expect::timeout;
///
/// let short = timeout!(100 ms);
/// let suffixed = timeout!(250ms);
/// let compound = timeout!(1 m + 30 s);
/// ```
#[proc_macro]
pub fn timeout(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as timeout::DurationSpec);
    timeout::expand(input).into()
}
