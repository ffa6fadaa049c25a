//! Contains a derive macro for [`TryFromRow`] which converts from an orapig_core Row
//!
//! Field `n` of the struct is read from column `n` of the row, so the field order must follow the select list of the query it decodes
//!
//! [`TryFromRow`]: https://docs.rs/orapig_core/0.1.0/orapig_core/trait.TryFromRow.html

extern crate proc_macro;

use proc_macro2::{
	Span,
	TokenStream,
};

use quote::quote;

use syn::{
	parse_macro_input,
	DeriveInput,
};

#[proc_macro_derive(TryFromRow)]
/// A derive macro for [`TryFromRow`] which converts from an orapig_core Row
///
/// [`TryFromRow`]: https://docs.rs/orapig_core/0.1.0/orapig_core/trait.TryFromRow.html
pub fn try_from_catalog_row(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);

	// get the name of the type we want to implement the trait for
	let name = &input.ident;
	let generics = input.generics;
	let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

	let fields = match input.data {
		syn::Data::Struct(x) => x.fields,
		syn::Data::Enum(_) | syn::Data::Union(_) => {
			return syn::Error::new(Span::call_site(), "TryFromRow can only be derived for structs")
				.to_compile_error()
				.into();
		},
	};

	let from_row_code = match fields {
		syn::Fields::Named(ref named) => {
			let tmp : TokenStream = named.named
				.iter()
				.filter_map(|v| v.ident.as_ref())
				.enumerate()
				.map(|(i,v)| {
					quote!{ #v : row.try_get(#i)?, }
				}).collect();
			quote!{ Ok(Self { #tmp }) }
		},
		syn::Fields::Unnamed(ref unnamed) => {
			let tmp : TokenStream = unnamed.unnamed
				.iter()
				.enumerate()
				.map(|(i,_v)| {
					quote!{ row.try_get(#i)?, }
				}).collect();
			quote!{ Ok(Self ( #tmp )) }
		},
		syn::Fields::Unit => quote!{ let _ = row; Ok(Self) },
	};

	let expanded = quote! {
		impl #impl_generics ::orapig_core::TryFromRow for #name #ty_generics #where_clause {
			fn from_row(row: &::orapig_core::Row) -> ::core::result::Result<Self, ::orapig_core::SqlError> {
				#from_row_code
			}
		}
	};

	expanded.into()
}
