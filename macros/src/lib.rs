mod expand;
mod log;
mod parse;

use crate::expand::Flavor;
use crate::parse::EntryEnum;
use proc_macro::TokenStream;
use syn::parse_macro_input;

/// Emits a `loggable!`/`traceable!` value through `tracing` at the level the
/// variant declares. An optional second argument is attached as `context`.
#[proc_macro]
pub fn log(input: TokenStream) -> TokenStream {
    log::log_impl(input)
}

/// Declares an informational entry enum: every variant carries a message and
/// a `tracing::Level`.
#[proc_macro]
pub fn loggable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as EntryEnum);
    expand::expand(&input, Flavor::Loggable).into()
}

/// Declares an error enum. Variants capture the rendered source error in an
/// `err` field unless marked `#[no_source]`, and get a constructor function
/// named after the variant.
#[proc_macro]
pub fn traceable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as EntryEnum);
    expand::expand(&input, Flavor::Traceable).into()
}
