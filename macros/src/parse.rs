use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Attribute, Error, Expr, Ident, LitStr, Result, Token, Type, braced};

pub struct EntryEnum {
    pub name: Ident,
    pub variants: Vec<EntryVariant>,
}

pub struct EntryVariant {
    pub docs: Vec<Attribute>,
    pub message: LitStr,
    pub no_source: bool,
    pub name: Ident,
    pub fields: Vec<(Ident, Type)>,
    pub level: Expr,
}

impl EntryVariant {
    pub fn is_unit(&self, with_source: bool) -> bool {
        self.fields.is_empty() && !with_source
    }
}

impl Parse for EntryEnum {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse::<Ident>()?;

        let content;
        braced!(content in input);

        let mut variants = Vec::new();
        while !content.is_empty() {
            variants.push(content.parse::<EntryVariant>()?);
            if content.peek(Token![,]) {
                content.parse::<Token![,]>()?;
            }
        }

        Ok(EntryEnum { name, variants })
    }
}

impl Parse for EntryVariant {
    fn parse(input: ParseStream) -> Result<Self> {
        let attributes = input.call(Attribute::parse_outer)?;

        let mut docs = Vec::new();
        let mut message = None;
        let mut no_source = false;
        for attribute in attributes {
            let path = attribute.path();
            if path.is_ident("error") {
                message = Some(attribute.parse_args::<LitStr>()?);
            } else if path.is_ident("no_source") {
                no_source = true;
            } else if path.is_ident("doc") {
                docs.push(attribute);
            } else {
                return Err(Error::new(attribute.span(), "Unsupported attribute"));
            }
        }
        let message =
            message.ok_or_else(|| Error::new(input.span(), "Missing #[error(...)] attribute"))?;

        let name = input.parse::<Ident>()?;

        let mut fields = Vec::new();
        if input.peek(syn::token::Brace) {
            let field_content;
            braced!(field_content in input);
            while !field_content.is_empty() {
                let field_name = field_content.parse::<Ident>()?;
                field_content.parse::<Token![:]>()?;
                let field_type = field_content.parse::<Type>()?;
                fields.push((field_name, field_type));
                if field_content.peek(Token![,]) {
                    field_content.parse::<Token![,]>()?;
                }
            }
        }

        input.parse::<Token![=>]>()?;
        let level = input.parse::<Expr>()?;

        Ok(EntryVariant {
            docs,
            message,
            no_source,
            name,
            fields,
            level,
        })
    }
}
