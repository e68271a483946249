//! Derive macros for tableqb
//!
//! Provides `#[derive(Table)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod sql_ident;
mod table;

/// Derive `Table` for a row struct.
///
/// # Example
///
/// ```ignore
/// use tableqb::Table;
///
/// #[derive(serde::Deserialize, Table)]
/// #[table(name = "users")]
/// struct User {
///     id: u64,
///     #[table(column = "email_address")]
///     #[serde(rename = "email_address")]
///     email: String,
/// }
/// ```
///
/// # Generated
///
/// - `impl tableqb::Table for User` with `Row = Self` and `Column = UserColumn`
/// - `enum UserColumn { Id, Email }` implementing `tableqb::Column`
/// - `UserColumn::ALL` listing every column in field order
///
/// # Attributes
///
/// - `#[table(name = "name")]` - Table name (required)
/// - `#[table(schema = path::Marker)]` - Schema marker type (default `()`)
/// - `#[table(column = "name")]` - Map field to a different column name
#[proc_macro_derive(Table, attributes(table))]
pub fn derive_table(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    table::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
