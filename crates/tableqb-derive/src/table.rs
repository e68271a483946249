//! Table derive macro implementation

use crate::sql_ident::{parse_sql_ident, parse_sql_ident_with_span};
use heck::ToUpperCamelCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Result, Type};

struct TableAttrs {
    name: String,
    schema: Option<Type>,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let vis = &input.vis;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let attrs = get_table_attrs(&input)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Table can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Table can only be derived for structs",
            ));
        }
    };

    let column_enum = format_ident!("{}Column", name);
    let mut variants: Vec<Ident> = Vec::new();
    let mut column_names: Vec<String> = Vec::new();
    let mut seen_variants = HashSet::new();
    let mut seen_columns = HashSet::new();

    for field in fields {
        let field_ident = field.ident.as_ref().expect("named field");
        let raw = field_ident.to_string();
        let field_name = raw.strip_prefix("r#").unwrap_or(&raw);

        let column = match get_column_override(field)? {
            Some(column) => column,
            None => parse_sql_ident_with_span(field_name, field_ident.span(), "column name")?,
        };
        if !seen_columns.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                field_ident,
                format!("duplicate column '{column}'"),
            ));
        }

        let variant = format_ident!("{}", field_name.to_upper_camel_case(), span = field_ident.span());
        if !seen_variants.insert(variant.to_string()) {
            return Err(syn::Error::new_spanned(
                field_ident,
                format!("fields map to the same column variant '{variant}'"),
            ));
        }

        variants.push(variant);
        column_names.push(column);
    }

    let table_name = &attrs.name;
    let schema = match &attrs.schema {
        Some(ty) => quote! { #ty },
        None => quote! { () },
    };
    let doc = format!("Columns of the `{table_name}` table.");

    Ok(quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #vis enum #column_enum {
            #(#variants),*
        }

        impl #column_enum {
            /// Every column, in field order.
            pub const ALL: &'static [Self] = &[#(Self::#variants),*];
        }

        impl ::tableqb::Column for #column_enum {
            fn name(self) -> &'static str {
                match self {
                    #(Self::#variants => #column_names),*
                }
            }
        }

        impl #impl_generics ::tableqb::Table for #name #ty_generics #where_clause {
            const NAME: &'static str = #table_name;
            type Row = Self;
            type Column = #column_enum;
            type Schema = #schema;
        }
    })
}

fn get_table_attrs(input: &DeriveInput) -> Result<TableAttrs> {
    let mut name: Option<String> = None;
    let mut schema: Option<Type> = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("table") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(parse_sql_ident(&lit, "table name")?);
                Ok(())
            } else if meta.path.is_ident("schema") {
                schema = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unsupported table attribute (expected `name` or `schema`)"))
            }
        })?;
    }

    let Some(name) = name else {
        return Err(syn::Error::new_spanned(
            input,
            "Table requires #[table(name = \"table_name\")] attribute",
        ));
    };
    Ok(TableAttrs { name, schema })
}

fn get_column_override(field: &syn::Field) -> Result<Option<String>> {
    let mut column = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("table") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                column = Some(parse_sql_ident(&lit, "column name")?);
                Ok(())
            } else {
                Err(meta.error("unsupported field attribute (expected `column`)"))
            }
        })?;
    }
    Ok(column)
}
