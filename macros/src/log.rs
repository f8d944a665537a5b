use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Token, parse_macro_input};

struct LogInput {
    entry: Expr,
    context: Option<Expr>,
}

impl Parse for LogInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let entry = input.parse::<Expr>()?;

        let context = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            Some(input.parse::<Expr>()?)
        } else {
            None
        };

        Ok(LogInput { entry, context })
    }
}

fn dispatch(fields: TokenStream2) -> TokenStream2 {
    quote! {
        match level {
            tracing::Level::ERROR => tracing::error!(#fields),
            tracing::Level::WARN => tracing::warn!(#fields),
            tracing::Level::INFO => tracing::info!(#fields),
            tracing::Level::DEBUG => tracing::debug!(#fields),
            tracing::Level::TRACE => tracing::trace!(#fields),
        }
    }
}

pub fn log_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as LogInput);
    let entry = &input.entry;

    let (binding, fields) = match &input.context {
        Some(context) => (
            quote! { let context = #context; },
            quote! { message = %message, context = ?context },
        ),
        None => (quote! {}, quote! { "{}", message }),
    };
    let dispatch = dispatch(fields);

    quote! {
        {
            let entry = &#entry;
            let level = entry.level();
            let message = entry.to_string();
            #binding
            #dispatch
        }
    }
    .into()
}
